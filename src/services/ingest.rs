use crate::error::{Error, Result};
use crate::models::TranscriptPayload;
use crate::storage::ArcStorage;

/// Validates and stores transcripts submitted by the bot.
#[derive(Clone)]
pub struct IngestService {
    storage: ArcStorage,
}

impl IngestService {
    pub fn new(storage: ArcStorage) -> Self {
        Self { storage }
    }

    /// Stores the payload and returns the path the transcript is served
    /// under. Validation happens before anything is written; a storage
    /// failure leaves no trace of the transcript.
    pub async fn ingest(&self, payload: TranscriptPayload) -> Result<String> {
        let (ticket, messages) = payload.into_transcript()?;
        let transcript_id = ticket.transcript_id().to_string();
        let view_path = ticket.view_path();
        let message_count = messages.len();

        let ticket_id = self
            .storage
            .insert_transcript(ticket, messages)
            .await
            .map_err(Error::from_report)?;

        log::info!(
            "Stored transcript {transcript_id} as ticket {ticket_id} with {message_count} messages"
        );
        Ok(view_path)
    }
}
