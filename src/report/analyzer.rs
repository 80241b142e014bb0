//! Statistics over a list of menus.
//!
//! Every analyzer reduces a non-empty slice of menus to one value. The shared
//! [`Analyzer::analyze`] entry point rejects empty input, so implementations only
//! deal with the non-empty case. Unless noted otherwise the meals of all menus
//! are flattened into a single multiset first.

use crate::domain::model::{Meal, Menu};
use crate::domain::outcome::Outcome;
use crate::utils::error::{MenuError, Result};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

pub const INVALID_DATA_MESSAGE: &str = "Invalid data argument!";

pub trait Analyzer: Send + Sync {
    type Output;

    fn name(&self) -> &str;

    /// Called with at least one menu.
    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<Self::Output>;

    fn analyze(&self, data: &[Menu]) -> Outcome<Self::Output> {
        if data.is_empty() {
            return Outcome::of_msg(INVALID_DATA_MESSAGE);
        }
        self.analyze_non_empty(data)
    }

    fn analyze_with<F>(&self, data: &[Menu], convert: F) -> Outcome<String>
    where
        F: FnOnce(Self::Output) -> String,
    {
        self.analyze(data).map(convert)
    }
}

/// Text form of an analysis result as it appears in reports.
pub trait ReportValue {
    fn render(&self) -> String;
}

macro_rules! plain_report_value {
    ($($ty:ty),*) => {
        $(impl ReportValue for $ty {
            fn render(&self) -> String {
                self.to_string()
            }
        })*
    };
}

plain_report_value!(u32, u64, usize, String, Meal);

impl ReportValue for f64 {
    fn render(&self) -> String {
        format!("{:.2}", self)
    }
}

impl<T: ReportValue> ReportValue for Vec<T> {
    fn render(&self) -> String {
        let items: Vec<String> = self.iter().map(ReportValue::render).collect();
        format!("[{}]", items.join(", "))
    }
}

impl<V: ReportValue> ReportValue for BTreeMap<NaiveDate, V> {
    fn render(&self) -> String {
        let entries: Vec<String> = self
            .iter()
            .map(|(date, value)| format!("{}={}", date, value.render()))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }
}

/// Type-erased analyzer whose result is rendered to text, for report composition.
pub trait ReportAnalyzer: Send + Sync {
    fn analyzer_name(&self) -> &str;
    fn analyze_to_string(&self, data: &[Menu]) -> Outcome<String>;
}

impl<A> ReportAnalyzer for A
where
    A: Analyzer,
    A::Output: ReportValue,
{
    fn analyzer_name(&self) -> &str {
        self.name()
    }

    fn analyze_to_string(&self, data: &[Menu]) -> Outcome<String> {
        self.analyze_with(data, |value| value.render())
    }
}

fn all_meals(data: &[Menu]) -> impl Iterator<Item = &Meal> {
    data.iter().flat_map(|menu| menu.meals().iter())
}

/// Stable sort, so equally priced meals keep their log order.
fn meals_sorted_by_price(data: &[Menu]) -> Vec<&Meal> {
    let mut meals: Vec<&Meal> = all_meals(data).collect();
    meals.sort_by_key(|meal| meal.price_in_cent());
    meals
}

fn price_sum<'a>(meals: impl Iterator<Item = &'a Meal>) -> u64 {
    meals.map(|meal| u64::from(meal.price_in_cent())).sum()
}

/// Mean meal price in cents, truncated.
#[derive(Debug, Clone, Copy, Default)]
pub struct AveragePriceAnalyzer;

impl Analyzer for AveragePriceAnalyzer {
    type Output = u64;

    fn name(&self) -> &str {
        "AveragePriceAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<u64> {
        let count = all_meals(data).count() as u64;
        if count == 0 {
            return Outcome::of_msg(INVALID_DATA_MESSAGE);
        }
        Outcome::of(price_sum(all_meals(data)) / count)
    }
}

/// Lower median of the meal prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianPriceAnalyzer;

impl Analyzer for MedianPriceAnalyzer {
    type Output = u32;

    fn name(&self) -> &str {
        "MedianPriceAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<u32> {
        let sorted = meals_sorted_by_price(data);
        let median = sorted
            .len()
            .checked_sub(1)
            .and_then(|last| sorted.get(last / 2))
            .map(|meal| meal.price_in_cent());
        Outcome::of_optional(median, INVALID_DATA_MESSAGE)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MinPriceMealAnalyzer;

impl Analyzer for MinPriceMealAnalyzer {
    type Output = Meal;

    fn name(&self) -> &str {
        "MinPriceMealAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<Meal> {
        let cheapest = meals_sorted_by_price(data).first().map(|meal| (*meal).clone());
        Outcome::of_optional(cheapest, INVALID_DATA_MESSAGE)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaxPriceMealAnalyzer;

impl Analyzer for MaxPriceMealAnalyzer {
    type Output = Meal;

    fn name(&self) -> &str {
        "MaxPriceMealAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<Meal> {
        let priciest = meals_sorted_by_price(data).last().map(|meal| (*meal).clone());
        Outcome::of_optional(priciest, INVALID_DATA_MESSAGE)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TotalPriceAnalyzer;

impl Analyzer for TotalPriceAnalyzer {
    type Output = u64;

    fn name(&self) -> &str {
        "TotalPriceAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<u64> {
        Outcome::of(price_sum(all_meals(data)))
    }
}

/// Mean price in cents of each day's menu, keyed by date.
#[derive(Debug, Clone, Copy, Default)]
pub struct AveragePricePerDayAnalyzer;

impl Analyzer for AveragePricePerDayAnalyzer {
    type Output = BTreeMap<NaiveDate, f64>;

    fn name(&self) -> &str {
        "AveragePricePerDayAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<Self::Output> {
        Outcome::of(
            data.iter()
                .map(|menu| {
                    let total = price_sum(menu.meals().iter()) as f64;
                    (menu.date(), total / menu.meals().len() as f64)
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TotalPricePerDayAnalyzer;

impl Analyzer for TotalPricePerDayAnalyzer {
    type Output = BTreeMap<NaiveDate, u64>;

    fn name(&self) -> &str {
        "TotalPricePerDayAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<Self::Output> {
        Outcome::of(
            data.iter()
                .map(|menu| (menu.date(), price_sum(menu.meals().iter())))
                .collect(),
        )
    }
}

/// Distinct meals, least frequent first. Ties keep first-appearance order.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopularityAnalyzer;

impl Analyzer for PopularityAnalyzer {
    type Output = Vec<Meal>;

    fn name(&self) -> &str {
        "PopularityAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<Vec<Meal>> {
        let mut occurrences: HashMap<&Meal, usize> = HashMap::new();
        let mut distinct: Vec<&Meal> = Vec::new();

        for meal in all_meals(data) {
            let count = occurrences.entry(meal).or_insert(0);
            if *count == 0 {
                distinct.push(meal);
            }
            *count += 1;
        }

        distinct.sort_by_key(|meal| occurrences[meal]);
        Outcome::of(distinct.into_iter().cloned().collect())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AmountOfDishesPerDayAnalyzer;

impl Analyzer for AmountOfDishesPerDayAnalyzer {
    type Output = BTreeMap<NaiveDate, usize>;

    fn name(&self) -> &str {
        "AmountOfDishesPerDayAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<Self::Output> {
        Outcome::of(
            data.iter()
                .map(|menu| (menu.date(), menu.meals().len()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AmountOfDishesAnalyzer;

impl Analyzer for AmountOfDishesAnalyzer {
    type Output = usize;

    fn name(&self) -> &str {
        "AmountOfDishesAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<usize> {
        Outcome::of(data.iter().map(|menu| menu.meals().len()).sum())
    }
}

/// Population standard deviation of the meal prices around the truncated mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDeviationAnalyzer;

impl Analyzer for StandardDeviationAnalyzer {
    type Output = f64;

    fn name(&self) -> &str {
        "StandardDeviationAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<f64> {
        let mean = AveragePriceAnalyzer.analyze(data);
        let count = AmountOfDishesAnalyzer.analyze(data);

        mean.flat_map(|mean| {
            count.map(|count| {
                let squared_deviations: f64 = all_meals(data)
                    .map(|meal| (f64::from(meal.price_in_cent()) - mean as f64).powi(2))
                    .sum();
                (squared_deviations / count as f64).sqrt()
            })
        })
    }
}

pub const MAX_PRICE_RANGES: usize = 10_000;

/// Histogram of meal prices in `number_of_categories` buckets of `size_cent`
/// each, plus one overflow bucket for everything above.
#[derive(Debug, Clone, Copy)]
pub struct PriceRangeAnalyzer {
    number_of_categories: usize,
    size_cent: u32,
}

impl PriceRangeAnalyzer {
    pub fn new(number_of_categories: usize, size_cent: u32) -> Result<Self> {
        if size_cent == 0 {
            return Err(MenuError::invalid_argument(
                "price range size must be at least one cent",
            ));
        }
        // Meal prices fit in a u32, so buckets past that bound would stay empty.
        let max_categories = ((u32::MAX / size_cent) as usize + 1).min(MAX_PRICE_RANGES);
        if number_of_categories > max_categories {
            return Err(MenuError::invalid_argument(format!(
                "at most {} price ranges of {} cent are possible",
                max_categories, size_cent
            )));
        }
        Ok(Self {
            number_of_categories,
            size_cent,
        })
    }
}

impl Analyzer for PriceRangeAnalyzer {
    type Output = Vec<usize>;

    fn name(&self) -> &str {
        "PriceRangeAnalyzer"
    }

    fn analyze_non_empty(&self, data: &[Menu]) -> Outcome<Vec<usize>> {
        let mut buckets = vec![0; self.number_of_categories + 1];
        for meal in all_meals(data) {
            let index = (meal.price_in_cent() / self.size_cent) as usize;
            buckets[index.min(self.number_of_categories)] += 1;
        }
        Outcome::of(buckets)
    }
}
