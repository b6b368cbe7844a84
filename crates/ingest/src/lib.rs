// Log ingestion tool: discovery, reading, storage and reporting around the engine.

pub mod cli;
pub mod commands;
pub mod discover;
pub mod logging;
pub mod report;
pub mod settings;
pub mod source;
pub mod store;
