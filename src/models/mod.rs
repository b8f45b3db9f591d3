pub mod message;
pub mod payload;
pub mod storage;
pub mod ticket;

pub use message::Message;
pub use payload::TranscriptPayload;
pub use storage::FilterTicket;
pub use ticket::Ticket;
