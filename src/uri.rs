//! Request-target construction for outbound API calls.

use urlencoding::encode;

/// Builds `<base>/<resource>`, appending a query string when `params` is
/// non-empty.
///
/// Parameters are emitted in slice order, so callers control the ordering
/// by construction. Values are percent-encoded individually; keys are used
/// verbatim.
pub fn build_uri(base: &str, resource: &str, params: &[(&str, String)]) -> String {
    let mut uri = format!("{base}/{resource}");
    for (index, (key, value)) in params.iter().enumerate() {
        uri.push(if index == 0 { '?' } else { '&' });
        uri.push_str(key);
        uri.push('=');
        uri.push_str(&encode(value));
    }
    uri
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_params_yields_no_query_string() {
        let uri = build_uri("https://api.telegram.org/botTOKEN", "getMe", &[]);
        assert_eq!(uri, "https://api.telegram.org/botTOKEN/getMe");
    }

    #[test]
    fn params_keep_insertion_order() {
        let params = [
            ("chat_id", "42".to_string()),
            ("text", "hi".to_string()),
        ];
        let uri = build_uri("base", "sendMessage", &params);
        assert_eq!(uri, "base/sendMessage?chat_id=42&text=hi");
    }

    #[test]
    fn values_are_percent_encoded_keys_are_not() {
        let params = [("url", "https://example.com/webhook".to_string())];
        let uri = build_uri("base", "setWebhook", &params);
        assert_eq!(
            uri,
            "base/setWebhook?url=https%3A%2F%2Fexample.com%2Fwebhook"
        );
    }

    #[test]
    fn spaces_are_encoded_in_values() {
        let params = [("text", "hello world".to_string())];
        let uri = build_uri("base", "sendMessage", &params);
        assert_eq!(uri, "base/sendMessage?text=hello%20world");
    }
}
