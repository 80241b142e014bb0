use crate::report::analyzer::{
    AmountOfDishesAnalyzer, AmountOfDishesPerDayAnalyzer, AveragePriceAnalyzer,
    AveragePricePerDayAnalyzer, MaxPriceMealAnalyzer, MedianPriceAnalyzer, MinPriceMealAnalyzer,
    PopularityAnalyzer, PriceRangeAnalyzer, ReportAnalyzer, StandardDeviationAnalyzer,
    TotalPriceAnalyzer, TotalPricePerDayAnalyzer,
};
use crate::report::formatter::{
    ComplexFormatter, FirstWordFormatter, Formatter, HiddenFormatter, PricelessFormatter,
    ShortFormatter, SimpleFormatter, SimpleMealFormatter, SimpleTotalFormatter,
};
use crate::utils::error::{MenuError, Result};

pub const ANALYZER_KEYS: &[&str] = &[
    "average_price",
    "median_price",
    "min_price_meal",
    "max_price_meal",
    "total_price",
    "average_price_per_day",
    "total_price_per_day",
    "popularity",
    "dishes_per_day",
    "dish_count",
    "standard_deviation",
    "price_range:<categories>:<size_cent>",
];

/// Resolves an analyzer key such as `median_price` or `price_range:3:200`.
pub fn analyzer_by_key(key: &str) -> Result<Box<dyn ReportAnalyzer>> {
    let key = key.trim();
    let analyzer: Box<dyn ReportAnalyzer> = match key {
        "average_price" => Box::new(AveragePriceAnalyzer),
        "median_price" => Box::new(MedianPriceAnalyzer),
        "min_price_meal" => Box::new(MinPriceMealAnalyzer),
        "max_price_meal" => Box::new(MaxPriceMealAnalyzer),
        "total_price" => Box::new(TotalPriceAnalyzer),
        "average_price_per_day" => Box::new(AveragePricePerDayAnalyzer),
        "total_price_per_day" => Box::new(TotalPricePerDayAnalyzer),
        "popularity" => Box::new(PopularityAnalyzer),
        "dishes_per_day" => Box::new(AmountOfDishesPerDayAnalyzer),
        "dish_count" => Box::new(AmountOfDishesAnalyzer),
        "standard_deviation" => Box::new(StandardDeviationAnalyzer),
        other => match other.strip_prefix("price_range:") {
            Some(arguments) => Box::new(price_range(key, arguments)?),
            None => {
                return Err(MenuError::InvalidConfigValueError {
                    field: "analyzer".to_string(),
                    value: key.to_string(),
                    reason: format!("Unknown analyzer. Known analyzers: {}", ANALYZER_KEYS.join(", ")),
                })
            }
        },
    };
    Ok(analyzer)
}

fn price_range(key: &str, arguments: &str) -> Result<PriceRangeAnalyzer> {
    let invalid = || MenuError::InvalidConfigValueError {
        field: "analyzer".to_string(),
        value: key.to_string(),
        reason: "Expected price_range:<categories>:<size_cent>".to_string(),
    };

    let (categories, size) = arguments.split_once(':').ok_or_else(invalid)?;
    let categories = categories.parse::<usize>().map_err(|_| invalid())?;
    let size = size.parse::<u32>().map_err(|_| invalid())?;
    PriceRangeAnalyzer::new(categories, size)
}

pub fn analyzers_by_keys<S: AsRef<str>>(keys: &[S]) -> Result<Vec<Box<dyn ReportAnalyzer>>> {
    keys.iter().map(|key| analyzer_by_key(key.as_ref())).collect()
}

/// Formatters selectable by name.
pub struct FormatterRegistry {
    formatters: Vec<Box<dyn Formatter>>,
}

impl FormatterRegistry {
    pub fn empty() -> Self {
        Self {
            formatters: Vec::new(),
        }
    }

    pub fn builtin() -> Result<Self> {
        let mut registry = Self::empty();
        registry.register(Box::new(SimpleFormatter::new()))?;
        registry.register(Box::new(SimpleMealFormatter))?;
        registry.register(Box::new(HiddenFormatter))?;
        registry.register(Box::new(ShortFormatter))?;
        registry.register(Box::new(FirstWordFormatter))?;
        registry.register(Box::new(PricelessFormatter))?;
        registry.register(Box::new(SimpleTotalFormatter))?;
        registry.register(Box::new(ComplexFormatter::with_name(
            vec![
                "Average price (cent)".to_string(),
                "Median price (cent)".to_string(),
                "Cheapest meal".to_string(),
                "Most expensive meal".to_string(),
                "Standard deviation (cent)".to_string(),
            ],
            vec![
                Box::new(AveragePriceAnalyzer),
                Box::new(MedianPriceAnalyzer),
                Box::new(MinPriceMealAnalyzer),
                Box::new(MaxPriceMealAnalyzer),
                Box::new(StandardDeviationAnalyzer),
            ],
            "StatisticsFormatter",
        )?))?;
        Ok(registry)
    }

    /// Names must be unique.
    pub fn register(&mut self, formatter: Box<dyn Formatter>) -> Result<()> {
        if self.get(formatter.name()).is_some() {
            return Err(MenuError::invalid_formatter(format!(
                "a formatter named '{}' is already registered",
                formatter.name()
            )));
        }
        self.formatters.push(formatter);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters
            .iter()
            .find(|formatter| formatter.name() == name)
            .map(|formatter| formatter.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.formatters.iter().map(|formatter| formatter.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Meal, Menu};
    use chrono::NaiveDate;

    fn data() -> Vec<Menu> {
        vec![Menu::new(
            NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            vec![
                Meal::new("Soup", 150).unwrap(),
                Meal::new("Curry", 390).unwrap(),
                Meal::new("Fish", 450).unwrap(),
            ],
        )
        .unwrap()]
    }

    #[test]
    fn test_every_plain_key_resolves() {
        for key in ANALYZER_KEYS.iter().filter(|key| !key.contains(':')) {
            let analyzer = analyzer_by_key(key).unwrap();
            assert!(analyzer.analyze_to_string(&data()).is_present(), "{}", key);
        }
    }

    #[test]
    fn test_price_range_key() {
        let analyzer = analyzer_by_key("price_range:2:200").unwrap();
        assert_eq!(analyzer.analyzer_name(), "PriceRangeAnalyzer");
        assert_eq!(
            analyzer.analyze_to_string(&data()).into_result().unwrap(),
            "[1, 1, 1]"
        );

        assert!(analyzer_by_key("price_range:2").is_err());
        assert!(analyzer_by_key("price_range:x:200").is_err());
        assert!(analyzer_by_key("price_range:2:0").is_err());
    }

    #[test]
    fn test_price_range_rejects_unfillable_category_counts() {
        assert!(matches!(
            analyzer_by_key(&format!("price_range:{}:100", usize::MAX)),
            Err(MenuError::InvalidArgument { .. })
        ));
        assert!(analyzer_by_key("price_range:10001:100").is_err());
        // 4295 ranges of 10000€ already cover every u32 price
        assert!(analyzer_by_key("price_range:4296:1000000").is_err());

        let widest = analyzer_by_key("price_range:10000:100").unwrap();
        let rendered = widest.analyze_to_string(&data()).into_result().unwrap();
        assert_eq!(rendered.matches(", ").count(), 10_000);
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            analyzer_by_key("mode_price"),
            Err(MenuError::InvalidConfigValueError { .. })
        ));
        assert!(analyzers_by_keys(&["average_price", "nope"]).is_err());
        assert_eq!(analyzers_by_keys(&["average_price", " dish_count "]).unwrap().len(), 2);
    }

    #[test]
    fn test_builtin_registry() {
        let registry = FormatterRegistry::builtin().unwrap();

        assert_eq!(registry.names().len(), 8);
        assert!(registry.get("SimpleFormatter").is_some());
        assert!(registry.get("StatisticsFormatter").is_some());
        assert!(registry.get("DoesNotExist").is_none());
    }

    #[test]
    fn test_register_rejects_duplicate_names() {
        let mut registry = FormatterRegistry::builtin().unwrap();
        assert!(registry.register(Box::new(HiddenFormatter)).is_err());
        assert_eq!(registry.names().len(), 8);
    }
}
