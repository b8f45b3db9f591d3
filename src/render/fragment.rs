#[cfg(test)]
#[path = "fragment_test.rs"]
mod tests;

use chrono::{DateTime, FixedOffset, Utc};

use crate::models::Message;

const ADMIN_BADGE: &str = r#"<span class="text-xs font-medium bg-pink-500/20 text-pink-300 px-2 py-0.5 rounded-full">Administrator</span>"#;
const USER_BADGE: &str = r#"<span class="text-xs font-medium bg-blue-500/20 text-blue-300 px-2 py-0.5 rounded-full">User</span>"#;

/// Settings shared by every fragment of a page.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub default_avatar: String,
    pub timestamp_format: String,
    pub offset: FixedOffset,
}

impl RenderOptions {
    pub fn format_timestamp(&self, timestamp: DateTime<Utc>) -> String {
        timestamp
            .with_timezone(&self.offset)
            .format(&self.timestamp_format)
            .to_string()
    }
}

/// Escapes `<` and `>` so message bodies can never open an element.
pub fn escape_markup(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

pub fn render_message(message: &Message, options: &RenderOptions) -> String {
    let avatar = message
        .author_avatar()
        .unwrap_or(options.default_avatar.as_str());

    let (author, badge) = if message.is_admin() {
        (
            format!(
                r#"<span class="font-semibold text-[var(--accent)]">{}</span>"#,
                message.author_name()
            ),
            ADMIN_BADGE,
        )
    } else {
        (
            format!(
                r#"<span class="font-semibold">{}</span>"#,
                message.author_name()
            ),
            USER_BADGE,
        )
    };

    format!(
        r#"
            <div class="flex gap-4">
                <img src="{avatar}" alt="Avatar" class="h-10 w-10 rounded-full bg-white/10 flex-shrink-0">
                <div class="w-full">
                    <div class="flex items-baseline gap-2 flex-wrap">
                        {author}
                        {badge}
                        <span class="text-xs text-white/50">{timestamp}</span>
                    </div>
                    <div class="mt-1 text-white/90 bg-white/5 p-3 rounded-lg break-words">
                        <p>{content}</p>
                    </div>
                </div>
            </div>"#,
        timestamp = options.format_timestamp(message.timestamp()),
        content = escape_markup(message.content()),
    )
}

pub fn render_messages(messages: &[Message], options: &RenderOptions) -> String {
    messages
        .iter()
        .map(|message| render_message(message, options))
        .collect()
}
