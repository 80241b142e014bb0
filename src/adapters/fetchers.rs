use crate::domain::model::{Meal, Menu};
use crate::domain::outcome::Outcome;
use crate::domain::ports::Fetcher;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::Client;
use std::sync::Mutex;
use std::time::Duration;

const DUMMY_CATALOGUE: &[(&str, i64)] = &[
    ("Tomato Soup", 150),
    ("Spaghetti Bolognese", 320),
    ("Vegetable Curry with Rice", 390),
    ("Chili sin Carne", 405),
    ("Fish and Chips", 450),
    ("Schnitzel with Fries", 480),
    ("Greek Salad", 280),
    ("Potato Gratin", 260),
    ("Lentil Stew", 230),
    ("Apple Strudel", 190),
];

/// Generates a random menu for consecutive days, starting at `start`.
pub struct DummyFetcher {
    next_date: Mutex<NaiveDate>,
}

impl DummyFetcher {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            next_date: Mutex::new(start),
        }
    }

    fn random_meals() -> Vec<Meal> {
        let mut rng = rand::rng();
        let count = rng.random_range(1..=4);
        DUMMY_CATALOGUE
            .choose_multiple(&mut rng, count)
            .filter_map(|(name, price)| Meal::new(*name, *price).ok())
            .collect()
    }
}

#[async_trait]
impl Fetcher for DummyFetcher {
    async fn fetch_current_data(&self) -> Outcome<String> {
        let date = {
            let Ok(mut next_date) = self.next_date.lock() else {
                return Outcome::of_msg("Dummy fetcher state is poisoned");
            };
            let date = *next_date;
            match date.checked_add_days(Days::new(1)) {
                Some(following) => *next_date = following,
                None => return Outcome::of_msg("Dummy fetcher ran out of dates"),
            }
            date
        };

        Outcome::from(Menu::new(date, Self::random_meals())).map(|menu| menu.to_csv_line())
    }
}

/// Fetches the current menu line from an HTTP endpoint.
///
/// The first non-blank line of the response body is taken as the encoded menu.
pub struct HttpFetcher {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    async fn fetch_body(&self) -> Result<String, String> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| format!("Fetching failed: {}", e))?;

        tracing::debug!("API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(format!(
                "Fetching failed with status {}",
                response.status().as_u16()
            ));
        }

        response
            .text()
            .await
            .map_err(|e| format!("Fetching failed: {}", e))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_current_data(&self) -> Outcome<String> {
        Outcome::from(self.fetch_body().await).flat_map(|body| {
            Outcome::of_optional(
                body.lines()
                    .map(str::trim)
                    .find(|line| !line.is_empty())
                    .map(str::to_string),
                "Fetching failed: response body is empty",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::csv_parser::CsvParser;
    use crate::domain::ports::Parser;

    #[tokio::test]
    async fn test_dummy_fetcher_produces_parsable_consecutive_days() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let fetcher = DummyFetcher::new(start);
        let parser = CsvParser::new();

        let mut dates = Vec::new();
        for _ in 0..3 {
            let raw = fetcher.fetch_current_data().await.into_result().unwrap();
            let menu = parser.parse(&raw).into_result().unwrap();
            assert!(!menu.meals().is_empty());
            dates.push(menu.date());
        }

        assert_eq!(
            dates,
            vec![
                start,
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            ]
        );
    }
}
