//! Simple echo command which repeats what you said to it.

use log::warn;

use crate::api::{self, SendMessageOptions};
use crate::dispatch::Bot;
use crate::error::BotError;
use crate::registry::CommandContext;

pub fn register(bot: &mut Bot) -> Result<(), BotError> {
    bot.register_command("echo", handle)
}

async fn handle(ctx: CommandContext) {
    let chat_id = ctx.chat.id;

    // Show the typing indicator while the reply is assembled; nobody waits
    // on this call.
    let action_api = ctx.api.clone();
    api::detach(async move { action_api.send_chat_action(chat_id, "typing").await });

    let mut reply = format!("I received a command from {}", ctx.from.first_name);
    if let Some(last_name) = &ctx.from.last_name {
        reply.push(' ');
        reply.push_str(last_name);
    }
    reply.push_str(".\n");

    if !ctx.args.is_empty() {
        reply.push_str("Arguments:\n");
        for (index, arg) in ctx.args.iter().enumerate() {
            reply.push_str(&format!("{index} > {arg}\n"));
        }
    }

    if let Err(e) = ctx
        .api
        .send_message(chat_id, &reply, &SendMessageOptions::default())
        .await
    {
        warn!("echo reply to chat {chat_id} failed: {e}");
    }
}
