pub mod controller;

pub use controller::MenuBot;
