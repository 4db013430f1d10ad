use chrono::{DateTime, Utc};
use engine::IncomingMessage;
use teloxide::prelude::*;

use crate::ConfigParameters;

pub(crate) async fn handle_message(
    bot: Bot,
    msg: Message,
    cfg: ConfigParameters,
) -> ResponseResult<()> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    if !is_allowed(cfg.allowed_users.as_deref(), from.id) {
        tracing::debug!(user_id = from.id.0, "ignoring message from unknown user");
        return Ok(());
    }
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let incoming = incoming_message(text, from.id, msg.date);
    let reply = cfg.dispatcher.dispatch(&incoming).await;
    bot.send_message(msg.chat.id, reply).await?;

    Ok(())
}

fn is_allowed(allowed_users: Option<&[UserId]>, from: UserId) -> bool {
    match allowed_users {
        None => true,
        Some(ids) => ids.contains(&from),
    }
}

fn incoming_message(text: &str, user_id: UserId, received_at: DateTime<Utc>) -> IncomingMessage {
    IncomingMessage {
        text: normalize_text(text),
        user_id: format!("tg:{}", user_id.0),
        received_at,
    }
}

/// Telegram clients send commands as `/help` or `/help@botname`; `/start` is
/// answered with the help text.
fn normalize_text(text: &str) -> String {
    let trimmed = text.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return trimmed.to_string();
    };

    let mut parts = command.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let name = name.split('@').next().unwrap_or(name);
    let rest = parts.next().unwrap_or("").trim();

    if name.eq_ignore_ascii_case("start") {
        return "help".to_string();
    }
    if rest.is_empty() {
        name.to_string()
    } else {
        format!("{name} {rest}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use teloxide::types::UserId;

    use super::*;

    #[test]
    fn allowed_users_filter() {
        assert!(is_allowed(None, UserId(1)));
        assert!(is_allowed(Some(&[UserId(1)]), UserId(1)));
        assert!(!is_allowed(Some(&[UserId(2)]), UserId(1)));
    }

    #[test]
    fn slash_commands_are_unwrapped() {
        assert_eq!(normalize_text("/help"), "help");
        assert_eq!(normalize_text("/help@kakeibo_bot"), "help");
        assert_eq!(normalize_text("/start"), "help");
        assert_eq!(normalize_text("/lf"), "lf");
        assert_eq!(normalize_text("/F 100"), "F 100");
        assert_eq!(normalize_text("  F 100 "), "F 100");
    }

    #[test]
    fn sender_is_prefixed() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let incoming = incoming_message("lf", UserId(42), at);
        assert_eq!(incoming.user_id, "tg:42");
        assert_eq!(incoming.received_at, at);
    }
}
