use crate::domain::model::Menu;
use crate::domain::outcome::Outcome;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::io::BufRead;
use std::path::Path;

/// Source of raw encoded menus, one per call.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_current_data(&self) -> Outcome<String>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    async fn fetch_current_data(&self) -> Outcome<String> {
        (**self).fetch_current_data().await
    }
}

pub trait Parser: Send + Sync {
    fn parse(&self, raw: &str) -> Outcome<Menu>;
}

/// Appends menus to the log file.
pub trait Saver: Send + Sync {
    fn log(&self, path: &Path, new_menu: &Menu) -> Result<()>;
}

/// Reads menus back from a log stream.
pub trait Importer: Send + Sync {
    fn get_latest<R: BufRead>(&self, reader: R) -> Outcome<Menu>;
    fn get_all<R: BufRead>(&self, reader: R) -> Outcome<Vec<Menu>>;
}

/// Outbound channel for finished reports. Returns the error text on failure.
#[async_trait]
pub trait Sender: Send + Sync {
    async fn send(&self, message: &str) -> Option<String>;
}

#[async_trait]
impl<S: Sender + ?Sized> Sender for Box<S> {
    async fn send(&self, message: &str) -> Option<String> {
        (**self).send(message).await
    }
}
