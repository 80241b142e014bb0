use crate::utils::error::{MenuError, Result};
use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Renders a cent amount as `"<euros>,<cents>€"`, always with two cent digits.
pub fn cent_to_euro(cents: u64) -> String {
    format!("{},{:02}€", cents / 100, cents % 100)
}

/// One named, priced dish.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Meal {
    name: String,
    price_in_cent: u32,
}

impl Meal {
    /// Validating constructor. Names must be non-blank and free of the log's
    /// structural characters (`;`, `_` and line breaks).
    pub fn new(name: impl Into<String>, price_in_cent: i64) -> Result<Self> {
        let name = name.into();

        if name.contains(';') || name.contains('_') {
            return Err(MenuError::invalid_argument(format!(
                "meal name '{}' must not contain '_' or ';'",
                name
            )));
        }
        if name.contains('\n') || name.contains('\r') {
            return Err(MenuError::invalid_argument(
                "meal name must not contain line breaks",
            ));
        }
        if name.trim().is_empty() {
            return Err(MenuError::invalid_argument("meal name must not be blank"));
        }
        if price_in_cent < 0 {
            return Err(MenuError::invalid_argument(format!(
                "price of '{}' must not be negative",
                name
            )));
        }
        let price_in_cent = u32::try_from(price_in_cent).map_err(|_| {
            MenuError::invalid_argument(format!("price of '{}' is out of range", name))
        })?;

        Ok(Self {
            name,
            price_in_cent,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price_in_cent(&self) -> u32 {
        self.price_in_cent
    }

    pub fn price_in_euros(&self) -> String {
        cent_to_euro(u64::from(self.price_in_cent))
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.price_in_euros())
    }
}

/// The dishes offered on one day.
///
/// Two menus are the same entity when they share a date, whatever their meals.
/// Meals keep the order in which they were first given; repeated meals collapse.
#[derive(Debug, Clone)]
pub struct Menu {
    date: NaiveDate,
    meals: Vec<Meal>,
}

impl Menu {
    pub fn new(date: NaiveDate, meals: impl IntoIterator<Item = Meal>) -> Result<Self> {
        // The log line encodes the year with exactly four digits.
        if !(0..=9999).contains(&date.year()) {
            return Err(MenuError::invalid_argument(format!(
                "menu date {} is outside the years 0000 to 9999",
                date
            )));
        }

        let mut unique: Vec<Meal> = Vec::new();
        for meal in meals {
            if !unique.contains(&meal) {
                unique.push(meal);
            }
        }

        if unique.is_empty() {
            return Err(MenuError::invalid_argument(format!(
                "menu of {} must contain at least one meal",
                date
            )));
        }

        Ok(Self {
            date,
            meals: unique,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    /// `YYYY-MM-DD;name_price;name_price...`
    pub fn to_csv_line(&self) -> String {
        let mut line = self.date.format("%Y-%m-%d").to_string();
        for meal in &self.meals {
            line.push(';');
            line.push_str(&meal.name);
            line.push('_');
            line.push_str(&meal.price_in_cent.to_string());
        }
        line
    }
}

impl PartialEq for Menu {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl Eq for Menu {}

impl Hash for Menu {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.date.hash(state);
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_csv_line())
    }
}
