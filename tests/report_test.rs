use chrono::NaiveDate;
use menu_etl::adapters::export::write_meal_table;
use menu_etl::adapters::{CsvImporter, CsvParser, CsvSaver, DummyFetcher, StdoutSender};
use menu_etl::report::formatter::{AnalyzerFormatter, ComplexFormatter, TemplateFormatter};
use menu_etl::report::{analyzer_by_key, analyzers_by_keys};
use menu_etl::{MenuBot, Outcome, TomlConfig};
use tempfile::TempDir;

const LOG: &str = "2024-01-10;Curry_390;Soup_150\n2024-01-09;Fish_450;Soup_150\n2024-01-08;Pasta_300\n";

type ReportBot = MenuBot<DummyFetcher, CsvParser, CsvSaver, CsvImporter, StdoutSender>;

fn bot_with_log(dir: &TempDir, content: &str) -> ReportBot {
    let log_file = dir.path().join("menu-log.csv");
    std::fs::write(&log_file, content).unwrap();

    MenuBot::new(
        DummyFetcher::new(NaiveDate::from_ymd_opt(2024, 1, 11).unwrap()),
        CsvParser::new(),
        CsvSaver::default(),
        log_file,
        CsvImporter::default(),
        StdoutSender,
    )
}

#[test]
fn test_template_report_over_log() {
    let dir = TempDir::new().unwrap();
    let bot = bot_with_log(&dir, LOG);

    let formatter = TemplateFormatter::new(
        "Average: $ cent, median: $ cent, $ dishes",
        analyzers_by_keys(&["average_price", "median_price", "dish_count"]).unwrap(),
        "weekly",
    )
    .unwrap();

    assert_eq!(
        bot.render(&formatter),
        Outcome::of("Average: 288 cent, median: 300 cent, 5 dishes".to_string())
    );
}

#[test]
fn test_single_analyzer_report() {
    let dir = TempDir::new().unwrap();
    let bot = bot_with_log(&dir, LOG);

    let formatter =
        AnalyzerFormatter::new("Price ranges", analyzer_by_key("price_range:2:200").unwrap()).unwrap();
    assert_eq!(
        bot.render(&formatter).into_result().unwrap(),
        "Price ranges:[2, 2, 1]"
    );

    let formatter =
        AnalyzerFormatter::new("Per day", analyzer_by_key("total_price_per_day").unwrap()).unwrap();
    assert_eq!(
        bot.render(&formatter).into_result().unwrap(),
        "Per day:{2024-01-08=300, 2024-01-09=600, 2024-01-10=540}"
    );
}

#[test]
fn test_summary_report_from_config() {
    let dir = TempDir::new().unwrap();
    let bot = bot_with_log(&dir, LOG);

    let config = TomlConfig::from_toml_str(
        r#"
[[report.summaries]]
name = "extremes"
headlines = ["Cheapest", "Priciest"]
analyzers = ["min_price_meal", "max_price_meal"]
"#,
    )
    .unwrap();
    let registry = config.build_formatter_registry().unwrap();

    assert_eq!(
        bot.render(registry.get("extremes").unwrap()).into_result().unwrap(),
        "Cheapest:Soup (1,50€)\nPriciest:Fish (4,50€)"
    );
}

#[test]
fn test_corrupt_history_falls_back_per_analyzer() {
    let dir = TempDir::new().unwrap();
    let bot = bot_with_log(&dir, "2024-01-10;Curry_390\nthis line is broken\n");

    let formatter = ComplexFormatter::new(
        vec!["Average".to_string(), "Total".to_string()],
        analyzers_by_keys(&["average_price", "total_price"]).unwrap(),
    )
    .unwrap();

    assert_eq!(
        bot.render(&formatter).into_result().unwrap(),
        "Average:Analyzing is not possible\nTotal:Analyzing is not possible"
    );
}

#[test]
fn test_export_meal_table() {
    let dir = TempDir::new().unwrap();
    let bot = bot_with_log(&dir, LOG);

    let menus = bot.all_menus().into_result().unwrap();
    let mut output = Vec::new();
    let rows = write_meal_table(&menus, &mut output).unwrap();

    assert_eq!(rows, 5);
    let table = String::from_utf8(output).unwrap();
    let mut lines = table.lines();
    assert_eq!(lines.next(), Some("date,name,price_in_cent,price"));
    assert_eq!(lines.next(), Some("2024-01-10,Curry,390,\"3,90€\""));
}
