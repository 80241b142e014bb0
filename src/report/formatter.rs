//! Report rendering.
//!
//! A formatter turns the latest menu, or statistics over the whole log, into
//! the text that gets sent. The whole log is passed as a supplier and read
//! only by formatters that need it.

use crate::domain::model::{Meal, Menu};
use crate::domain::outcome::Outcome;
use crate::report::analyzer::ReportAnalyzer;
use crate::utils::error::{MenuError, Result};

pub const ANALYZING_NOT_POSSIBLE: &str = "Analyzing is not possible";
pub const PLACEHOLDER: char = '$';

/// Deferred import of every menu in the log.
pub type MenuSupplier<'a> = &'a dyn Fn() -> Outcome<Vec<Menu>>;

pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;
    fn format(&self, latest_menu: &Menu, all_menus: MenuSupplier<'_>) -> Outcome<String>;
}

fn meal_lines<'a>(meals: impl Iterator<Item = &'a Meal>, line: impl Fn(&Meal) -> String) -> String {
    meals.map(line).collect::<Vec<_>>().join("\n")
}

fn abbreviate(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

fn first_word(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}

fn analyzed_or_fallback(menus: &Outcome<Vec<Menu>>, analyzer: &dyn ReportAnalyzer) -> String {
    let analyzed = match menus {
        Outcome::Value(menus) => analyzer.analyze_to_string(menus),
        Outcome::Message(message) => Outcome::of_msg(message.clone()),
    };
    analyzed.or_else_get(|| {
        tracing::debug!("{} produced no result", analyzer.analyzer_name());
        ANALYZING_NOT_POSSIBLE.to_string()
    })
}

fn require_non_blank(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MenuError::invalid_formatter(format!("{} must not be blank", what)));
    }
    Ok(())
}

/// Date headline followed by one `name (price)` line per meal.
#[derive(Debug, Clone, Default)]
pub struct SimpleFormatter {
    info: Option<String>,
}

impl SimpleFormatter {
    pub fn new() -> Self {
        Self { info: None }
    }

    /// Adds `info` in parentheses after the date.
    pub fn with_info(info: impl Into<String>) -> Self {
        Self {
            info: Some(info.into()),
        }
    }
}

impl Formatter for SimpleFormatter {
    fn name(&self) -> &str {
        "SimpleFormatter"
    }

    fn format(&self, latest_menu: &Menu, _all_menus: MenuSupplier<'_>) -> Outcome<String> {
        let headline = match &self.info {
            Some(info) => format!("Menu for {} ({}):", latest_menu.date(), info),
            None => format!("Menu for {}:", latest_menu.date()),
        };
        let meals = meal_lines(latest_menu.meals().iter(), Meal::to_string);
        Outcome::of(format!("{}\n{}", headline, meals))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMealFormatter;

impl Formatter for SimpleMealFormatter {
    fn name(&self) -> &str {
        "SimpleMealFormatter"
    }

    fn format(&self, latest_menu: &Menu, _all_menus: MenuSupplier<'_>) -> Outcome<String> {
        Outcome::of(meal_lines(latest_menu.meals().iter(), Meal::to_string))
    }
}

/// Prices only.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiddenFormatter;

impl Formatter for HiddenFormatter {
    fn name(&self) -> &str {
        "HiddenFormatter"
    }

    fn format(&self, latest_menu: &Menu, _all_menus: MenuSupplier<'_>) -> Outcome<String> {
        Outcome::of(meal_lines(latest_menu.meals().iter(), Meal::price_in_euros))
    }
}

/// Initials of each word of the meal name, with the price.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortFormatter;

impl Formatter for ShortFormatter {
    fn name(&self) -> &str {
        "ShortFormatter"
    }

    fn format(&self, latest_menu: &Menu, _all_menus: MenuSupplier<'_>) -> Outcome<String> {
        Outcome::of(meal_lines(latest_menu.meals().iter(), |meal| {
            format!("{} ({})", abbreviate(meal.name()), meal.price_in_euros())
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FirstWordFormatter;

impl Formatter for FirstWordFormatter {
    fn name(&self) -> &str {
        "FirstWordFormatter"
    }

    fn format(&self, latest_menu: &Menu, _all_menus: MenuSupplier<'_>) -> Outcome<String> {
        Outcome::of(meal_lines(latest_menu.meals().iter(), |meal| {
            format!("{} ({})", first_word(meal.name()), meal.price_in_euros())
        }))
    }
}

/// Names only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PricelessFormatter;

impl Formatter for PricelessFormatter {
    fn name(&self) -> &str {
        "PricelessFormatter"
    }

    fn format(&self, latest_menu: &Menu, _all_menus: MenuSupplier<'_>) -> Outcome<String> {
        Outcome::of(meal_lines(latest_menu.meals().iter(), |meal| {
            meal.name().to_string()
        }))
    }
}

/// `<headline>:<result>` for one analyzer over the whole log.
pub struct AnalyzerFormatter {
    headline: String,
    analyzer: Box<dyn ReportAnalyzer>,
    name: String,
}

impl AnalyzerFormatter {
    pub fn new(headline: impl Into<String>, analyzer: Box<dyn ReportAnalyzer>) -> Result<Self> {
        Self::with_name(headline, analyzer, "FormatterFromAnalyzer")
    }

    pub fn with_name(
        headline: impl Into<String>,
        analyzer: Box<dyn ReportAnalyzer>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let headline = headline.into();
        let name = name.into();
        require_non_blank("headline", &headline)?;
        require_non_blank("formatter name", &name)?;

        Ok(Self {
            headline,
            analyzer,
            name,
        })
    }
}

impl Formatter for AnalyzerFormatter {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self, _latest_menu: &Menu, all_menus: MenuSupplier<'_>) -> Outcome<String> {
        let value = analyzed_or_fallback(&all_menus(), self.analyzer.as_ref());
        Outcome::of(format!("{}:{}", self.headline, value))
    }
}

/// One `<headline>:<result>` line per analyzer.
pub struct ComplexFormatter {
    name: String,
    sections: Vec<(String, Box<dyn ReportAnalyzer>)>,
}

impl ComplexFormatter {
    pub fn new(headlines: Vec<String>, analyzers: Vec<Box<dyn ReportAnalyzer>>) -> Result<Self> {
        Self::with_name(headlines, analyzers, "ComplexFormatter")
    }

    pub fn with_name(
        headlines: Vec<String>,
        analyzers: Vec<Box<dyn ReportAnalyzer>>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        require_non_blank("formatter name", &name)?;
        if headlines.is_empty() || analyzers.is_empty() {
            return Err(MenuError::invalid_formatter(
                "at least one headline and one analyzer are required",
            ));
        }
        if headlines.len() != analyzers.len() {
            return Err(MenuError::invalid_formatter(format!(
                "there must be a headline for each analyzer ({} headlines, {} analyzers)",
                headlines.len(),
                analyzers.len()
            )));
        }
        for headline in &headlines {
            require_non_blank("headline", headline)?;
        }

        Ok(Self {
            name,
            sections: headlines.into_iter().zip(analyzers).collect(),
        })
    }
}

impl Formatter for ComplexFormatter {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self, _latest_menu: &Menu, all_menus: MenuSupplier<'_>) -> Outcome<String> {
        let menus = all_menus();
        let lines: Vec<String> = self
            .sections
            .iter()
            .map(|(headline, analyzer)| {
                format!("{}:{}", headline, analyzed_or_fallback(&menus, analyzer.as_ref()))
            })
            .collect();
        Outcome::of(lines.join("\n"))
    }
}

/// Fills each `$` of a template with the next analyzer's result.
pub struct TemplateFormatter {
    name: String,
    segments: Vec<String>,
    analyzers: Vec<Box<dyn ReportAnalyzer>>,
}

impl TemplateFormatter {
    pub fn new(
        template: &str,
        analyzers: Vec<Box<dyn ReportAnalyzer>>,
        name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        require_non_blank("formatter name", &name)?;
        if template.is_empty() {
            return Err(MenuError::invalid_formatter("template must not be empty"));
        }
        if !template.contains(PLACEHOLDER) {
            return Err(MenuError::invalid_formatter(format!(
                "template must contain '{}' placeholders",
                PLACEHOLDER
            )));
        }
        if analyzers.is_empty() {
            return Err(MenuError::invalid_formatter("at least one analyzer is required"));
        }

        let segments: Vec<String> = template.split(PLACEHOLDER).map(str::to_string).collect();
        let placeholders = segments.len() - 1;
        if placeholders != analyzers.len() {
            return Err(MenuError::invalid_formatter(format!(
                "there must be a '{}' for each analyzer ({} placeholders, {} analyzers)",
                PLACEHOLDER,
                placeholders,
                analyzers.len()
            )));
        }

        Ok(Self {
            name,
            segments,
            analyzers,
        })
    }
}

impl Formatter for TemplateFormatter {
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self, _latest_menu: &Menu, all_menus: MenuSupplier<'_>) -> Outcome<String> {
        let menus = all_menus();
        let mut output = String::new();
        let mut segments = self.segments.iter();

        if let Some(first) = segments.next() {
            output.push_str(first);
        }
        for (analyzer, literal) in self.analyzers.iter().zip(segments) {
            output.push_str(&analyzed_or_fallback(&menus, analyzer.as_ref()));
            output.push_str(literal);
        }
        Outcome::of(output)
    }
}

/// Every meal of every menu in the log, one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTotalFormatter;

impl Formatter for SimpleTotalFormatter {
    fn name(&self) -> &str {
        "SimpleTotalFormatter"
    }

    fn format(&self, _latest_menu: &Menu, all_menus: MenuSupplier<'_>) -> Outcome<String> {
        all_menus().map(|menus| {
            meal_lines(menus.iter().flat_map(|menu| menu.meals().iter()), Meal::to_string)
        })
    }
}
