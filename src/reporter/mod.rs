pub mod aggregator;
pub mod console;
pub mod events;
pub mod ingest;
pub mod replay;
