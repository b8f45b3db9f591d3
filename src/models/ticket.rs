use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::constants::SHORT_ID_LEN;

/// One closed support conversation. Rows are written once by ingestion and
/// never updated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ticket {
    id: i64,
    channel_id: String,
    creator_name: String,
    creator_id: String,
    topic: String,
    transcript_id: String,
    created_at: DateTime<Utc>,
    closed_at: DateTime<Utc>,
    closed_by_name: String,
}

impl Ticket {
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = channel_id.into();
        self
    }

    pub fn with_creator(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.creator_name = name.into();
        self.creator_id = id.into();
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_transcript_id(mut self, transcript_id: impl Into<String>) -> Self {
        self.transcript_id = transcript_id.into();
        self
    }

    pub fn with_created_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.created_at = timestamp;
        self
    }

    pub fn with_closed_at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.closed_at = timestamp;
        self
    }

    pub fn with_closed_by_name(mut self, name: impl Into<String>) -> Self {
        self.closed_by_name = name.into();
        self
    }

    /// Store assigned identity, 0 until the ticket has been persisted.
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn creator_name(&self) -> &str {
        &self.creator_name
    }

    pub fn creator_id(&self) -> &str {
        &self.creator_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    /// First characters of the transcript id, used as the human facing
    /// ticket number.
    pub fn short_id(&self) -> &str {
        match self.transcript_id.char_indices().nth(SHORT_ID_LEN) {
            Some((idx, _)) => &self.transcript_id[..idx],
            None => &self.transcript_id,
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn closed_at(&self) -> DateTime<Utc> {
        self.closed_at
    }

    pub fn closed_by_name(&self) -> &str {
        &self.closed_by_name
    }

    /// Public path the transcript is served under.
    pub fn view_path(&self) -> String {
        format!("/{}", self.transcript_id)
    }
}
