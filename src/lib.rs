pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod report;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::TomlConfig;
pub use core::MenuBot;
pub use domain::{
    model::{Meal, Menu},
    outcome::Outcome,
};
pub use utils::error::{MenuError, Result};
