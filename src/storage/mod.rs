pub mod sqlite;

use std::sync::Arc;

use crate::{
    config::StorageConfig,
    models::{FilterTicket, Message, Ticket},
};
use async_trait::async_trait;
use eyre::Result;
use sqlite::Sqlite;

/// Persistence for tickets and their messages.
///
/// A duplicate transcript id is reported as
/// [`crate::error::Error::ConstraintViolation`] inside the returned report.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage {
    /// Inserts the ticket and all of its messages as one atomic unit and
    /// returns the id assigned to the ticket. Messages are written in the
    /// order given.
    async fn insert_transcript(&self, ticket: Ticket, messages: Vec<Message>) -> Result<i64>;
    async fn get_ticket_by_transcript_id(&self, transcript_id: &str) -> Result<Option<Ticket>>;
    /// Messages of a ticket, oldest first.
    async fn get_messages_by_ticket_id(&self, ticket_id: i64) -> Result<Vec<Message>>;
    /// Ticket summaries, most recently closed first.
    async fn list_tickets(&self, filter: FilterTicket) -> Result<Vec<Ticket>>;
}

pub type ArcStorage = Arc<dyn Storage + Send + Sync>;

pub async fn new_storage(config: &StorageConfig) -> Result<ArcStorage> {
    let storage = match config {
        StorageConfig::Sqlite(sqlite_config) => Arc::new(
            Sqlite::open(sqlite_config.path.as_deref(), sqlite_config.schema_errors_fatal).await?,
        ),
    };
    Ok(storage)
}
