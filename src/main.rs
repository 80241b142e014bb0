use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use menu_etl::adapters::export::write_meal_table;
use menu_etl::adapters::{CsvImporter, CsvParser, CsvSaver};
use menu_etl::domain::ports::{Fetcher, Importer, Sender};
use menu_etl::report::formatter::{AnalyzerFormatter, Formatter, TemplateFormatter};
use menu_etl::report::{analyzer_by_key, analyzers_by_keys, FormatterRegistry};
use menu_etl::utils::error::MenuError;
use menu_etl::utils::{logger, validation::Validate};
use menu_etl::{CliConfig, Command, MenuBot, TomlConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

type Bot = MenuBot<Box<dyn Fetcher>, CsvParser, CsvSaver, CsvImporter, Box<dyn Sender>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting menu-etl");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let mut config = match TomlConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    if let Some(log_file) = &cli.log_file {
        config.log.path = log_file.display().to_string();
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    match run(cli.command, &config).await {
        Ok(None) => {
            tracing::info!("✅ Done");
            Ok(())
        }
        Ok(Some(message)) => {
            // 資料流程失敗：訊息已是給使用者看的文字
            tracing::warn!("⚠️ {}", message);
            eprintln!("❌ {}", message);
            std::process::exit(1);
        }
        Err(e) => match e.downcast_ref::<MenuError>() {
            Some(menu_error) => fail(menu_error),
            None => Err(e),
        },
    }
}

/// `Some(message)` is a failure inside the menu pipeline; `Err` is a setup problem.
async fn run(command: Command, config: &TomlConfig) -> anyhow::Result<Option<String>> {
    let log_path = config.log_path();

    match command {
        Command::Retrieve => {
            let bot = build_bot(config, &log_path)?;
            Ok(bot.retrieve_data().await)
        }
        Command::Send { formatter } => {
            let registry = config.build_formatter_registry()?;
            let name = formatter.as_deref().unwrap_or(config.default_formatter());
            let formatter = lookup(&registry, name)?;
            let bot = build_bot(config, &log_path)?;
            Ok(bot.send(formatter).await)
        }
        Command::Report {
            formatter,
            analyzer,
            headline,
            template,
            analyzers,
        } => {
            let bot = build_bot(config, &log_path)?;
            let registry;
            let adhoc: Box<dyn Formatter>;
            let formatter: &dyn Formatter = if let Some(key) = analyzer {
                let headline = headline.unwrap_or_default();
                adhoc = Box::new(AnalyzerFormatter::new(headline, analyzer_by_key(&key)?)?);
                adhoc.as_ref()
            } else if let Some(template) = template {
                adhoc = Box::new(TemplateFormatter::new(
                    &template,
                    analyzers_by_keys(&analyzers)?,
                    "TemplateFormatter",
                )?);
                adhoc.as_ref()
            } else {
                registry = config.build_formatter_registry()?;
                lookup(&registry, formatter.as_deref().unwrap_or(config.default_formatter()))?
            };

            match bot.render(formatter).into_result() {
                Ok(report) => {
                    println!("{}", report);
                    Ok(None)
                }
                Err(message) => Ok(Some(message)),
            }
        }
        Command::Formatters => {
            let registry = config.build_formatter_registry()?;
            for name in registry.names() {
                println!("{}", name);
            }
            Ok(None)
        }
        Command::Export { output } => {
            let bot = build_bot(config, &log_path)?;
            let menus = match bot.all_menus().into_result() {
                Ok(menus) => menus,
                Err(message) => return Ok(Some(message)),
            };
            let file = File::create(&output)
                .with_context(|| format!("Cannot create export file {}", output.display()))?;
            let rows = write_meal_table(&menus, file)?;
            tracing::info!("📁 Exported {} meals to {}", rows, output.display());
            Ok(None)
        }
    }
}

fn build_bot(config: &TomlConfig, log_path: &Path) -> anyhow::Result<Bot> {
    let fetcher = config.build_fetcher(latest_logged_date(log_path))?;
    let sender = config.build_sender()?;

    Ok(MenuBot::new(
        fetcher,
        CsvParser::new(),
        CsvSaver::default(),
        log_path,
        CsvImporter::default(),
        sender,
    ))
}

fn latest_logged_date(log_path: &Path) -> Option<NaiveDate> {
    let file = File::open(log_path).ok()?;
    let importer: CsvImporter = CsvImporter::default();
    importer
        .get_latest(BufReader::new(file))
        .into_result()
        .ok()
        .map(|menu| menu.date())
}

fn lookup<'a>(registry: &'a FormatterRegistry, name: &str) -> anyhow::Result<&'a dyn Formatter> {
    registry.get(name).ok_or_else(|| {
        MenuError::InvalidConfigValueError {
            field: "formatter".to_string(),
            value: name.to_string(),
            reason: format!("Unknown formatter. Available: {}", registry.names().join(", ")),
        }
        .into()
    })
}

fn fail(e: &MenuError) -> ! {
    tracing::error!(
        "❌ menu-etl failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e);
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    std::process::exit(e.severity().exit_code());
}
