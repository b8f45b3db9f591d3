#[cfg(test)]
#[path = "payload_test.rs"]
mod tests;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::constants::RESERVED_PATH_SEGMENTS;
use crate::error::{Error, Result};
use crate::models::{Message, Ticket};

/// Body of an ingestion request as sent by the bot. Every field is optional
/// at this level so that missing fields can be reported together instead of
/// failing on the first one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscriptPayload {
    #[serde(default)]
    pub ticket: Option<TicketPayload>,

    #[serde(default)]
    pub messages: Option<Vec<MessagePayload>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TicketPayload {
    pub channel_id: Option<String>,
    pub creator_name: Option<String>,
    pub creator_id: Option<String>,
    pub topic: Option<String>,
    pub transcript_id: Option<String>,
    pub created_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    pub closed_by_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePayload {
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,
    pub is_admin: Option<bool>,
    pub content: Option<String>,
    pub timestamp: Option<Timestamp>,
}

/// Timestamps arrive either as RFC 3339 strings or as epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

impl Timestamp {
    /// Parses the value, truncated to millisecond precision which is what
    /// the store keeps.
    fn parse(&self) -> Option<DateTime<Utc>> {
        let millis = match self {
            Timestamp::Millis(millis) => *millis,
            Timestamp::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .ok()?
                .timestamp_millis(),
        };
        DateTime::from_timestamp_millis(millis)
    }
}

impl TranscriptPayload {
    pub fn parse(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|err| Error::InvalidPayload(err.to_string()))
    }

    /// Checks every required field and converts the payload into the ticket
    /// and messages to store. Message order is preserved.
    pub fn into_transcript(self) -> Result<(Ticket, Vec<Message>)> {
        let mut problems = Problems::default();

        let (Some(ticket), Some(messages)) = (self.ticket, self.messages) else {
            return Err(Error::InvalidPayload(
                "both ticket and messages are required".to_string(),
            ));
        };
        if messages.is_empty() {
            return Err(Error::InvalidPayload(
                "messages must not be empty".to_string(),
            ));
        }

        let channel_id = problems.required("ticket.channel_id", ticket.channel_id);
        let creator_name = problems.required("ticket.creator_name", ticket.creator_name);
        let creator_id = problems.required("ticket.creator_id", ticket.creator_id);
        let topic = problems.required("ticket.topic", ticket.topic);
        let transcript_id = problems.required("ticket.transcript_id", ticket.transcript_id);
        let created_at = problems.timestamp("ticket.created_at", ticket.created_at);
        let closed_at = problems.timestamp("ticket.closed_at", ticket.closed_at);
        let closed_by_name = problems.required("ticket.closed_by_name", ticket.closed_by_name);

        if let Some(id) = transcript_id.as_deref() {
            if let Err(problem) = check_transcript_id(id) {
                problems.push(format!("ticket.transcript_id {problem}"));
            }
        }

        let mut converted = Vec::with_capacity(messages.len());
        for (idx, message) in messages.into_iter().enumerate() {
            let author_name =
                problems.required(&format!("messages[{idx}].author_name"), message.author_name);
            let is_admin = problems.required(&format!("messages[{idx}].is_admin"), message.is_admin);
            let content = problems.required(&format!("messages[{idx}].content"), message.content);
            let timestamp =
                problems.timestamp(&format!("messages[{idx}].timestamp"), message.timestamp);

            if let (Some(author_name), Some(is_admin), Some(content), Some(timestamp)) =
                (author_name, is_admin, content, timestamp)
            {
                converted.push(
                    Message::new(author_name, content)
                        .with_avatar(message.author_avatar.filter(|avatar| !avatar.is_empty()))
                        .with_admin(is_admin)
                        .with_timestamp(timestamp),
                );
            }
        }

        match (
            channel_id,
            creator_name,
            creator_id,
            topic,
            transcript_id,
            created_at,
            closed_at,
            closed_by_name,
        ) {
            (
                Some(channel_id),
                Some(creator_name),
                Some(creator_id),
                Some(topic),
                Some(transcript_id),
                Some(created_at),
                Some(closed_at),
                Some(closed_by_name),
            ) if problems.is_empty() => {
                let ticket = Ticket::default()
                    .with_channel_id(channel_id)
                    .with_creator(creator_name, creator_id)
                    .with_topic(topic)
                    .with_transcript_id(transcript_id)
                    .with_created_at(created_at)
                    .with_closed_at(closed_at)
                    .with_closed_by_name(closed_by_name);
                Ok((ticket, converted))
            }
            _ => Err(problems.into_error()),
        }
    }
}

/// Transcript ids become the single path segment the page is served under,
/// so they are limited to URL-safe characters and must not shadow another
/// route.
fn check_transcript_id(id: &str) -> std::result::Result<(), String> {
    if id.trim().is_empty() {
        return Err("must not be blank".to_string());
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
    {
        return Err("may only contain letters, digits, '-', '_', '.' and '~'".to_string());
    }
    if id == "." || id == ".." || RESERVED_PATH_SEGMENTS.contains(&id) {
        return Err(format!("{id:?} is reserved"));
    }
    Ok(())
}

#[derive(Default)]
struct Problems(Vec<String>);

impl Problems {
    fn required<T>(&mut self, field: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(format!("missing {field}"));
        }
        value
    }

    fn timestamp(&mut self, field: &str, value: Option<Timestamp>) -> Option<DateTime<Utc>> {
        let value = self.required(field, value)?;
        let parsed = value.parse();
        if parsed.is_none() {
            self.push(format!("invalid timestamp in {field}"));
        }
        parsed
    }

    fn push(&mut self, problem: String) {
        self.0.push(problem);
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_error(self) -> Error {
        Error::InvalidPayload(self.0.join(", "))
    }
}
