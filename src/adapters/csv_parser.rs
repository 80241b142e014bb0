use crate::domain::model::{Meal, Menu};
use crate::domain::outcome::Outcome;
use crate::domain::ports::Parser;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(;[^_;]*_[0-9]+)*$").expect("valid menu line pattern")
});

/// Decodes `YYYY-MM-DD;name_price;...` lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_meal(segment: &str) -> Outcome<Meal> {
        let Some((name, price)) = segment.split_once('_') else {
            return Outcome::of_msg(format!("Invalid meal segment '{}'", segment));
        };
        let price = match price.parse::<i64>() {
            Ok(price) => price,
            Err(_) => return Outcome::of_msg(format!("Invalid price in '{}'", segment)),
        };
        Meal::new(name, price).into()
    }
}

impl Parser for CsvParser {
    fn parse(&self, raw: &str) -> Outcome<Menu> {
        if !LINE_PATTERN.is_match(raw) {
            tracing::debug!("Rejected menu line: {:?}", raw);
            return Outcome::of_msg(format!("Input does not match! Input was: '{}'", raw));
        }

        let mut segments = raw.split(';');
        let date = match segments
            .next()
            .map(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d"))
        {
            Some(Ok(date)) => date,
            _ => return Outcome::of_msg("Invalid date"),
        };

        Outcome::sequence(segments.map(Self::parse_meal))
            .flat_map(|meals| Menu::new(date, meals).into())
    }
}
