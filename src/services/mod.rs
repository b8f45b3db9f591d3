#[cfg(test)]
#[path = "services_test.rs"]
mod tests;

pub mod ingest;
pub mod search;
pub mod transcript;

pub use ingest::IngestService;
pub use search::SearchService;
pub use transcript::TranscriptService;
