#[cfg(test)]
#[path = "render_test.rs"]
mod tests;

pub mod fragment;
pub mod template;

use chrono::FixedOffset;
use chrono::format::{Item, StrftimeItems};
use eyre::{Context, Result, bail};

use crate::config::RenderConfig;
use crate::models::{Message, Ticket};

pub use fragment::{RenderOptions, escape_markup, render_message, render_messages};
pub use template::{Fields, Template};

pub const BUILTIN_TEMPLATE: &str = include_str!("../../templates/ticket.html");

/// Turns a stored transcript into a complete HTML page.
#[derive(Debug, Clone)]
pub struct Renderer {
    template: Template,
    options: RenderOptions,
}

impl Renderer {
    pub fn new(template: Template, options: RenderOptions) -> Self {
        Self { template, options }
    }

    pub fn from_config(config: &RenderConfig) -> Result<Self> {
        let source = match config.template_path.as_deref() {
            Some(path) => {
                std::fs::read_to_string(path).wrap_err(format!("reading template {}", path))?
            }
            None => BUILTIN_TEMPLATE.to_string(),
        };
        let template = Template::parse(&source).wrap_err("parsing template")?;

        if StrftimeItems::new(&config.timestamp_format).any(|item| matches!(item, Item::Error)) {
            bail!("invalid timestamp format {:?}", config.timestamp_format);
        }
        let offset = config
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt);
        let Some(offset) = offset else {
            bail!("utc offset {} minutes is out of range", config.utc_offset_minutes);
        };

        Ok(Self::new(
            template,
            RenderOptions {
                default_avatar: config.default_avatar.clone(),
                timestamp_format: config.timestamp_format.clone(),
                offset,
            },
        ))
    }

    /// Messages are rendered in the order given, callers pass them sorted
    /// by timestamp.
    pub fn render(&self, ticket: &Ticket, messages: &[Message]) -> String {
        let messages = render_messages(messages, &self.options);
        let created_at = self.options.format_timestamp(ticket.created_at());
        let closed_at = self.options.format_timestamp(ticket.closed_at());

        self.template.render(&Fields {
            short_id: ticket.short_id(),
            topic: ticket.topic(),
            creator: ticket.creator_name(),
            closer: ticket.closed_by_name(),
            created_at: &created_at,
            closed_at: &closed_at,
            messages: &messages,
        })
    }
}
