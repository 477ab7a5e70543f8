pub mod ingest;
pub mod query;
pub mod status;
