use std::sync::Arc;

use crate::error::{Error, Result};
use crate::render::Renderer;
use crate::storage::ArcStorage;

/// Serves stored transcripts as HTML pages.
#[derive(Clone)]
pub struct TranscriptService {
    storage: ArcStorage,
    renderer: Arc<Renderer>,
}

impl TranscriptService {
    pub fn new(storage: ArcStorage, renderer: Renderer) -> Self {
        Self {
            storage,
            renderer: Arc::new(renderer),
        }
    }

    pub async fn render(&self, transcript_id: &str) -> Result<String> {
        let ticket = self
            .storage
            .get_ticket_by_transcript_id(transcript_id)
            .await
            .map_err(Error::from_report)?
            .ok_or_else(|| Error::NotFound(transcript_id.to_string()))?;

        let messages = self
            .storage
            .get_messages_by_ticket_id(ticket.id())
            .await
            .map_err(Error::from_report)?;

        Ok(self.renderer.render(&ticket, &messages))
    }
}
