use crate::domain::model::Menu;
use crate::domain::outcome::Outcome;
use crate::domain::ports::{Fetcher, Importer, Parser, Saver, Sender};
use crate::report::formatter::Formatter;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

/// Wires the write path (fetch, parse, save) and the report path
/// (import, format, send) around one log file.
pub struct MenuBot<F, P, S, I, Se> {
    fetcher: F,
    parser: P,
    saver: S,
    log_file: PathBuf,
    importer: I,
    sender: Se,
}

impl<F, P, S, I, Se> MenuBot<F, P, S, I, Se>
where
    F: Fetcher,
    P: Parser,
    S: Saver,
    I: Importer,
    Se: Sender,
{
    pub fn new(
        fetcher: F,
        parser: P,
        saver: S,
        log_file: impl Into<PathBuf>,
        importer: I,
        sender: Se,
    ) -> Self {
        Self {
            fetcher,
            parser,
            saver,
            log_file: log_file.into(),
            importer,
            sender,
        }
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// Fetches the current menu and appends it to the log.
    pub async fn retrieve_data(&self) -> Option<String> {
        tracing::info!("Fetching current menu...");
        let fetched = self.fetcher.fetch_current_data().await;

        let error = fetched
            .flat_map(|raw| self.parser.parse(&raw))
            .try_to_consume(|menu| self.saver.log(&self.log_file, &menu));

        match &error {
            Some(e) => tracing::warn!("Retrieving data failed: {}", e),
            None => tracing::info!("Log {} updated", self.log_file.display()),
        }
        error
    }

    fn open_log(&self) -> Outcome<BufReader<File>> {
        match File::open(&self.log_file) {
            Ok(file) => Outcome::of(BufReader::new(file)),
            Err(e) if e.kind() == ErrorKind::NotFound => Outcome::of_msg("File not found!"),
            Err(e) => Outcome::of_msg(format!("Log file could not be opened: {}", e)),
        }
    }

    pub fn latest_menu(&self) -> Outcome<Menu> {
        self.open_log()
            .flat_map(|reader| self.importer.get_latest(reader))
    }

    pub fn all_menus(&self) -> Outcome<Vec<Menu>> {
        self.open_log().flat_map(|reader| self.importer.get_all(reader))
    }

    /// Formats the latest menu. The full log is only read if the formatter asks for it.
    pub fn render(&self, formatter: &dyn Formatter) -> Outcome<String> {
        tracing::debug!("Rendering report with {}", formatter.name());
        self.latest_menu()
            .flat_map(|latest| formatter.format(&latest, &|| self.all_menus()))
    }

    pub async fn send(&self, formatter: &dyn Formatter) -> Option<String> {
        let report = match self.render(formatter) {
            Outcome::Value(report) => report,
            Outcome::Message(message) => {
                tracing::warn!("Report could not be created: {}", message);
                return Some(message);
            }
        };

        let error = self.sender.send(&report).await;
        if error.is_none() {
            tracing::info!("Report sent using {}", formatter.name());
        }
        error
    }
}
