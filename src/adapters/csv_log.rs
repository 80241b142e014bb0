use crate::adapters::csv_parser::CsvParser;
use crate::domain::model::Menu;
use crate::domain::outcome::Outcome;
use crate::domain::ports::{Importer, Parser, Saver};
use crate::utils::error::{MenuError, Result};
use std::fs::{self, OpenOptions};
use std::io::BufRead;
use std::path::Path;

/// Prepends menus to a flat log file whose dates strictly decrease from top to bottom.
///
/// Only the current top line is checked before writing. The read and the
/// rewrite are not atomic, so concurrent writers on one path can lose updates.
#[derive(Debug, Clone, Default)]
pub struct CsvSaver<P: Parser = CsvParser> {
    parser: P,
}

impl<P: Parser> CsvSaver<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<P: Parser> Saver for CsvSaver<P> {
    fn log(&self, path: &Path, new_menu: &Menu) -> Result<()> {
        // 檔案不存在時建立空檔
        OpenOptions::new().create(true).append(true).open(path)?;

        let content = fs::read_to_string(path)?;
        let previous: Vec<&str> = content.lines().collect();

        if let Some(top) = previous.first() {
            let latest = match self.parser.parse(top) {
                Outcome::Value(latest) => latest,
                Outcome::Message(message) => {
                    tracing::warn!("Top line of {} is unreadable: {}", path.display(), message);
                    return Err(MenuError::InvalidLogEntry);
                }
            };

            if latest.date() >= new_menu.date() {
                return Err(MenuError::OutOfOrder {
                    latest: latest.date(),
                    new: new_menu.date(),
                });
            }
        }

        let mut updated = String::with_capacity(content.len() + 128);
        updated.push_str(&new_menu.to_csv_line());
        updated.push('\n');
        for line in &previous {
            updated.push_str(line);
            updated.push('\n');
        }
        fs::write(path, updated)?;

        tracing::info!(
            "Logged menu of {} with {} meals ({} entries in log)",
            new_menu.date(),
            new_menu.meals().len(),
            previous.len() + 1
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CsvImporter<P: Parser = CsvParser> {
    parser: P,
}

impl<P: Parser> CsvImporter<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }
}

impl<P: Parser> Importer for CsvImporter<P> {
    fn get_latest<R: BufRead>(&self, reader: R) -> Outcome<Menu> {
        match reader.lines().next() {
            Some(Ok(line)) => self.parser.parse(&line),
            Some(Err(e)) => Outcome::of_msg(format!("Import failure - File could not be read: {}", e)),
            None => Outcome::of_msg("Import failure - log is empty"),
        }
    }

    /// Every line must parse; all failures are reported together.
    fn get_all<R: BufRead>(&self, reader: R) -> Outcome<Vec<Menu>> {
        let menus = Outcome::sequence(reader.lines().enumerate().map(|(index, line)| {
            match line {
                Ok(line) => self.parser.parse(&line),
                Err(e) => Outcome::of_msg(format!("Line {}: could not be read: {}", index + 1, e)),
            }
        }));

        match &menus {
            Outcome::Value(menus) => tracing::debug!("Imported {} menus", menus.len()),
            Outcome::Message(message) => tracing::warn!("Import failed:\n{}", message),
        }
        menus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Meal;
    use chrono::NaiveDate;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn menu(y: i32, m: u32, d: u32, meals: &[(&str, i64)]) -> Menu {
        Menu::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            meals.iter().map(|(name, price)| Meal::new(*name, *price).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_log_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        let saver = CsvSaver::<CsvParser>::default();

        saver
            .log(&path, &menu(2024, 1, 8, &[("Soup", 150)]))
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "2024-01-08;Soup_150\n");
    }

    #[test]
    fn test_log_prepends_newer_menu() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        let saver = CsvSaver::<CsvParser>::default();

        saver.log(&path, &menu(2024, 1, 8, &[("Soup", 150)])).unwrap();
        saver.log(&path, &menu(2024, 1, 9, &[("Curry", 390)])).unwrap();
        saver
            .log(&path, &menu(2024, 1, 12, &[("Fish", 450), ("Rice", 120)]))
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "2024-01-12;Fish_450;Rice_120\n2024-01-09;Curry_390\n2024-01-08;Soup_150\n"
        );
    }

    #[test]
    fn test_log_refuses_same_or_older_date() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        fs::write(&path, "2024-01-09;Curry_390\n2024-01-08;Soup_150\n").unwrap();
        let saver = CsvSaver::<CsvParser>::default();

        let same_day = saver.log(&path, &menu(2024, 1, 9, &[("Pasta", 300)]));
        assert!(matches!(same_day, Err(MenuError::OutOfOrder { .. })));

        let older = saver.log(&path, &menu(2024, 1, 1, &[("Pasta", 300)]));
        assert!(matches!(older, Err(MenuError::OutOfOrder { .. })));

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "2024-01-09;Curry_390\n2024-01-08;Soup_150\n"
        );
    }

    #[test]
    fn test_log_refuses_to_build_on_corrupt_top_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        fs::write(&path, "garbage\n2024-01-08;Soup_150\n").unwrap();
        let saver = CsvSaver::<CsvParser>::default();

        let result = saver.log(&path, &menu(2024, 2, 1, &[("Pasta", 300)]));
        assert!(matches!(result, Err(MenuError::InvalidLogEntry)));
        assert_eq!(result.unwrap_err().to_string(), "Latest log entry is invalid");
    }

    #[test]
    fn test_log_only_checks_the_top_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.csv");
        fs::write(&path, "2024-01-09;Curry_390\nnot a menu\n").unwrap();
        let saver = CsvSaver::<CsvParser>::default();

        saver.log(&path, &menu(2024, 1, 10, &[("Pasta", 300)])).unwrap();
        assert!(fs::read_to_string(&path).unwrap().ends_with("not a menu\n"));
    }

    #[test]
    fn test_log_reports_io_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("log.csv");
        let saver = CsvSaver::<CsvParser>::default();

        let result = saver.log(&path, &menu(2024, 1, 8, &[("Soup", 150)]));
        assert!(matches!(result, Err(MenuError::IoError(_))));
    }

    #[test]
    fn test_get_latest_reads_only_the_first_line() {
        let importer = CsvImporter::<CsvParser>::default();
        let log = Cursor::new("2024-01-09;Curry_390\nbroken line\n");

        let latest = importer.get_latest(log).into_result().unwrap();
        assert_eq!(latest.date(), NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
    }

    #[test]
    fn test_get_latest_on_empty_log() {
        let importer = CsvImporter::<CsvParser>::default();
        let outcome = importer.get_latest(Cursor::new(""));
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_get_all_in_log_order() {
        let importer = CsvImporter::<CsvParser>::default();
        let log = Cursor::new("2024-01-09;Curry_390\n2024-01-08;Soup_150;Bread_50\n");

        let menus = importer.get_all(log).into_result().unwrap();
        assert_eq!(menus.len(), 2);
        assert_eq!(menus[0].date(), NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(menus[1].meals().len(), 2);
    }

    #[test]
    fn test_get_all_aggregates_every_bad_line() {
        let importer = CsvImporter::<CsvParser>::default();
        let log = Cursor::new("2024-01-09;Curry_390\nfirst bad\n2024-01-07;Soup_150\nsecond bad\n");

        let outcome = importer.get_all(log);
        let message = outcome.get_message().unwrap();
        assert_eq!(
            message,
            "Input does not match! Input was: 'first bad'\nInput does not match! Input was: 'second bad'"
        );
    }
}
