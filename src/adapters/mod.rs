// Adapters layer: concrete implementations of the domain ports (log file, http, telegram, stdout).

pub mod csv_log;
pub mod csv_parser;
pub mod export;
pub mod fetchers;
pub mod senders;

pub use csv_log::{CsvImporter, CsvSaver};
pub use csv_parser::CsvParser;
pub use fetchers::{DummyFetcher, HttpFetcher};
pub use senders::{StdoutSender, TelegramSender};
