#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use tokio_rusqlite::{
    Connection, OpenFlags, ToSql, Transaction, ffi, named_params, params, params_from_iter,
};

use crate::error::Error;
use crate::models::{FilterTicket, Message, Ticket};
use crate::storage::Storage;

use super::migration::{MIGRATIONS, PRAGMAS};

const TICKET_COLUMNS: &str = "id, channel_id, creator_name, creator_id, topic, transcript_id, created_at, closed_at, closed_by_name";

pub struct Sqlite {
    conn: Connection,
}

impl Sqlite {
    /// Opens the database and makes sure the schema exists. A `None` path
    /// opens a private in-memory database.
    pub async fn open(path: Option<&str>, schema_errors_fatal: bool) -> Result<Self> {
        let ret = Self::new(path).await?;
        if let Err(err) = ret.run_migration().await {
            if schema_errors_fatal {
                return Err(err.wrap_err("running migration"));
            }
            log::error!("Schema is incomplete, continuing anyway: {err:#}");
        }
        Ok(ret)
    }

    pub async fn new(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(path) => Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
            )
            .await
            .wrap_err(format!("opening database path: {}", path))?,
            None => Connection::open_in_memory()
                .await
                .wrap_err("opening in-memory database")?,
        };

        conn.call(|conn| Ok(conn.execute_batch(PRAGMAS)?))
            .await
            .wrap_err("configuring connection")?;

        Ok(Self { conn })
    }

    /// Creates every relation that does not exist yet. Each relation is
    /// attempted even if an earlier one failed; the first failure is
    /// returned.
    pub async fn run_migration(&self) -> Result<()> {
        let mut first_err = None;
        for (name, sql) in MIGRATIONS {
            let res = self
                .conn
                .call(move |conn| Ok(conn.execute_batch(sql)?))
                .await
                .wrap_err(format!("creating relation {name}"));
            match res {
                Ok(()) => log::debug!("Relation {name} is ready"),
                Err(err) => {
                    log::error!("Failed to create relation {name}: {err:#}");
                    first_err.get_or_insert(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Storage for Sqlite {
    async fn insert_transcript(&self, ticket: Ticket, messages: Vec<Message>) -> Result<i64> {
        let transcript_id = ticket.transcript_id().to_string();
        let inserted = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let ticket_id = match insert_ticket(&tx, &ticket) {
                    Ok(id) => id,
                    // Dropping the transaction rolls it back
                    Err(err) if is_unique_violation(&err) => return Ok(None),
                    Err(err) => return Err(err),
                };
                insert_messages(&tx, ticket_id, &messages)?;
                tx.commit()?;
                Ok(Some(ticket_id))
            })
            .await
            .wrap_err(format!("inserting transcript {transcript_id}"))?;

        match inserted {
            Some(ticket_id) => Ok(ticket_id),
            None => Err(Error::ConstraintViolation(transcript_id).into()),
        }
    }

    async fn get_ticket_by_transcript_id(&self, transcript_id: &str) -> Result<Option<Ticket>> {
        let transcript_id = transcript_id.to_string();
        let ticket = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {TICKET_COLUMNS} FROM tickets WHERE transcript_id = ?"
                ))?;
                let mut rows = stmt.query(params![transcript_id])?;
                match rows.next()? {
                    Some(row) => Ok(Some(ticket_from_row(row)?)),
                    None => Ok(None),
                }
            })
            .await
            .wrap_err("getting ticket")?;
        Ok(ticket)
    }

    async fn get_messages_by_ticket_id(&self, ticket_id: i64) -> Result<Vec<Message>> {
        let messages = self.conn.call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, ticket_id, author_name, author_avatar, is_admin, content, timestamp FROM messages WHERE ticket_id = ? ORDER BY timestamp ASC, id ASC",
            )?;

            let mut rows = stmt.query(params![ticket_id])?;
            let mut messages = vec![];
            while let Some(row) = rows.next()? {
                let id: i64 = row.get(0)?;
                let ticket_id: i64 = row.get(1)?;
                let author_name: String = row.get(2)?;
                let author_avatar: Option<String> = row.get(3)?;
                let is_admin: i32 = row.get(4)?;
                let content: String = row.get(5)?;
                let timestamp = timestamp_from_millis(row.get(6)?, "timestamp")?;

                messages.push(
                    Message::new(author_name, content)
                        .with_id(id)
                        .with_ticket_id(ticket_id)
                        .with_avatar(author_avatar)
                        .with_admin(is_admin == 1)
                        .with_timestamp(timestamp),
                );
            }
            Ok(messages)
        })
        .await
        .wrap_err("getting messages")?;
        Ok(messages)
    }

    async fn list_tickets(&self, filter: FilterTicket) -> Result<Vec<Ticket>> {
        let tickets = self
            .conn
            .call(move |conn| {
                let (query, params) = filter_to_query(&filter);
                let mut stmt = conn.prepare(&query)?;
                let mut rows = stmt.query(params_from_iter(params.iter().map(|p| p.as_ref())))?;

                let mut tickets = vec![];
                while let Some(row) = rows.next()? {
                    tickets.push(ticket_from_row(row)?);
                }
                Ok(tickets)
            })
            .await
            .wrap_err("listing tickets")?;
        Ok(tickets)
    }
}

fn insert_ticket(tx: &Transaction, ticket: &Ticket) -> tokio_rusqlite::Result<i64> {
    tx.execute(
        r#"INSERT INTO tickets (channel_id, creator_name, creator_id, topic, transcript_id, created_at, closed_at, closed_by_name)
        VALUES (:channel_id, :creator_name, :creator_id, :topic, :transcript_id, :created_at, :closed_at, :closed_by_name)"#,
        named_params! {
            ":channel_id": ticket.channel_id(),
            ":creator_name": ticket.creator_name(),
            ":creator_id": ticket.creator_id(),
            ":topic": ticket.topic(),
            ":transcript_id": ticket.transcript_id(),
            ":created_at": ticket.created_at().timestamp_millis(),
            ":closed_at": ticket.closed_at().timestamp_millis(),
            ":closed_by_name": ticket.closed_by_name(),
        },
    )?;
    Ok(tx.last_insert_rowid())
}

fn insert_messages(
    tx: &Transaction,
    ticket_id: i64,
    messages: &[Message],
) -> tokio_rusqlite::Result<()> {
    let mut stmt = tx.prepare(
        r#"INSERT INTO messages (ticket_id, author_name, author_avatar, is_admin, content, timestamp)
        VALUES (:ticket_id, :author_name, :author_avatar, :is_admin, :content, :timestamp)"#,
    )?;
    for message in messages {
        stmt.execute(named_params! {
            ":ticket_id": ticket_id,
            ":author_name": message.author_name(),
            ":author_avatar": message.author_avatar(),
            ":is_admin": message.is_admin() as i32,
            ":content": message.content(),
            ":timestamp": message.timestamp().timestamp_millis(),
        })?;
    }
    Ok(())
}

fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
    match err {
        tokio_rusqlite::Error::Rusqlite(err) => err
            .sqlite_error()
            .is_some_and(|err| err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE),
        _ => false,
    }
}

fn ticket_from_row(row: &tokio_rusqlite::Row<'_>) -> tokio_rusqlite::Result<Ticket> {
    let creator_name: String = row.get(2)?;
    let creator_id: String = row.get(3)?;
    Ok(Ticket::default()
        .with_id(row.get(0)?)
        .with_channel_id(row.get::<_, String>(1)?)
        .with_creator(creator_name, creator_id)
        .with_topic(row.get::<_, String>(4)?)
        .with_transcript_id(row.get::<_, String>(5)?)
        .with_created_at(timestamp_from_millis(row.get(6)?, "created_at")?)
        .with_closed_at(timestamp_from_millis(row.get(7)?, "closed_at")?)
        .with_closed_by_name(row.get::<_, String>(8)?))
}

fn timestamp_from_millis(millis: i64, column: &str) -> tokio_rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(tokio_rusqlite::Error::Other(
        eyre::eyre!("invalid {column}").into(),
    ))
}

fn filter_to_query(filter: &FilterTicket) -> (String, Vec<Box<dyn ToSql>>) {
    let mut query = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE 1=1");
    let mut params: Vec<Box<dyn ToSql>> = vec![];

    if let Some(creator_name) = filter.creator_name() {
        // instr is case sensitive, unlike LIKE
        query.push_str(" AND instr(creator_name, ?) > 0");
        params.push(Box::new(creator_name.to_string()));
    }

    query.push_str(" ORDER BY closed_at DESC, id DESC");
    (query, params)
}
