//! Placeholder-preserving batch translation for Android string resources and
//! spreadsheet columns.
//!
//! ```ignore
//! use curly_translate::{BatchPlan, Config, Language, translate_table_columns};
//!
//! let translator = Config::default().build_translator()?;
//! let plan = BatchPlan::new(vec!["text".into()], vec![Language::new("hi", "Hindi")]);
//! let stats = translate_table_columns(&translator, &mut table, &plan).await;
//! ```

pub mod batch;
pub mod config;
pub mod mt;
pub mod strings_xml;
pub mod table;

pub use batch::{
    BatchPlan, BatchReport, ColumnNaming, TranslationStats, localize_table,
    translate_table_columns,
};
pub use config::{BackendConfig, BackendKind, Config};
pub use mt::{
    Language, MachineTranslator, MtError, MtResult, PreservingTranslator, is_symbolic_only,
};
pub use strings_xml::translate_strings_xml;
pub use table::{Cell, Column, Table};
