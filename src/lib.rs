// BR Formatter - Core Library
// pt-BR field formatting for database-backed records, used by the CLI and tests

pub mod value;
pub mod attributes;  // Attribute classification (field → kind)
pub mod formatter;   // Storage <-> presentation conversions
pub mod record;      // Record interface + in-memory record
pub mod dispatcher;  // Applies conversions to a record
pub mod config;
pub mod db;          // SQLite record store
pub mod import;

// Re-export commonly used types
pub use value::{AttributeValue, STORAGE_DATETIME_FORMAT};
pub use attributes::{
    AttributeClassification, AttributeKind, ClassificationError, ClassificationLists,
};
pub use formatter::{
    format_value, Direction,
    datetime_to_presentation, datetime_to_storage,
    date_to_presentation, date_to_storage,
    money_to_presentation, money_to_storage,
    numeric_to_presentation, numeric_to_storage,
    boolean_to_presentation, boolean_to_storage,
};
pub use record::{FormattableRecord, Record, Row};
pub use dispatcher::{FormatSummary, RecordFormatDispatcher};
pub use config::Settings;
pub use db::{
    StoredRecord,
    setup_database, save_record, load_record, load_records, count_records,
};
pub use import::load_rows;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
