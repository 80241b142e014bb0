pub mod analyzer;
pub mod formatter;
pub mod registry;

pub use analyzer::{Analyzer, ReportAnalyzer, ReportValue};
pub use formatter::{Formatter, MenuSupplier};
pub use registry::{analyzer_by_key, analyzers_by_keys, FormatterRegistry};
