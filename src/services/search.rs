use crate::error::{Error, Result};
use crate::models::{FilterTicket, Ticket};
use crate::storage::ArcStorage;

/// Ticket listing for the admin pages.
#[derive(Clone)]
pub struct SearchService {
    storage: ArcStorage,
}

impl SearchService {
    pub fn new(storage: ArcStorage) -> Self {
        Self { storage }
    }

    /// Ticket summaries without messages, most recently closed first.
    pub async fn list(&self, filter: FilterTicket) -> Result<Vec<Ticket>> {
        self.storage
            .list_tickets(filter)
            .await
            .map_err(Error::from_report)
    }
}
