pub(crate) const PRAGMAS: &str = r#"
    PRAGMA foreign_keys = ON;
"#;

pub(crate) const TICKETS: &str = r#"
    CREATE TABLE IF NOT EXISTS tickets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        channel_id TEXT NOT NULL,
        creator_name TEXT NOT NULL,
        creator_id TEXT NOT NULL,
        topic TEXT NOT NULL,
        transcript_id TEXT NOT NULL UNIQUE,
        created_at INTEGER NOT NULL,
        closed_at INTEGER NOT NULL,
        closed_by_name TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS tickets_closed_at ON tickets (closed_at);
"#;

pub(crate) const MESSAGES: &str = r#"
    CREATE TABLE IF NOT EXISTS messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        ticket_id INTEGER NOT NULL,
        author_name TEXT NOT NULL,
        author_avatar TEXT,
        is_admin INTEGER NOT NULL,
        content TEXT NOT NULL,
        timestamp INTEGER NOT NULL,
        FOREIGN KEY (ticket_id) REFERENCES tickets (id)
    );

    CREATE INDEX IF NOT EXISTS messages_ticket_timestamp ON messages (ticket_id, timestamp);
"#;

/// Relations created on every start, in dependency order.
pub(crate) const MIGRATIONS: &[(&str, &str)] = &[("tickets", TICKETS), ("messages", MESSAGES)];
