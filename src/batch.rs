//! Applying the translator across table columns
//!
//! A batch walks every (column, language) pair strictly in order, one cell at a
//! time, and counts how many cells were sent for translation and how many came
//! back different.

use crate::mt::preserving::PreservingTranslator;
use crate::mt::translator::Language;
use crate::table::{Cell, Table};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::ops::AddAssign;
use tracing::info;

/// How derived columns are named
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnNaming {
    /// `"{column}_{code}"`, e.g. `text_hi`
    #[default]
    #[serde(alias = "code_suffix")]
    Code,
    /// The language display name, e.g. `Hindi`
    #[serde(alias = "language_name")]
    Name,
}

impl ColumnNaming {
    pub fn column_name(&self, column: &str, language: &Language) -> String {
        match self {
            ColumnNaming::Code => format!("{}_{}", column, language.code),
            ColumnNaming::Name => language.display_name().to_string(),
        }
    }
}

/// Which columns to translate, into which languages, and how to name the results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPlan {
    pub columns: Vec<String>,
    pub languages: Vec<Language>,
    pub naming: ColumnNaming,
}

impl BatchPlan {
    pub fn new(columns: Vec<String>, languages: Vec<Language>) -> Self {
        Self {
            columns,
            languages,
            naming: ColumnNaming::default(),
        }
    }

    pub fn with_naming(mut self, naming: ColumnNaming) -> Self {
        self.naming = naming;
        self
    }

    /// Every (source column, language, derived column name) triple, in processing order
    ///
    /// Columns missing from `table` are skipped. Language-name naming stays
    /// bare only when a single source column is present; with several it
    /// becomes `"{column}_{name}"`. A derived name never equals a source column
    /// of the plan or another derived name: the language code is appended
    /// until it is free.
    pub fn assignments(&self, table: &Table) -> Vec<(&str, &Language, String)> {
        let mut present: Vec<&str> = Vec::new();
        for column in &self.columns {
            if table.has_column(column) && !present.contains(&column.as_str()) {
                present.push(column);
            }
        }

        let mut taken: HashSet<String> = self.columns.iter().cloned().collect();
        let mut assignments = Vec::with_capacity(present.len() * self.languages.len());
        for &column in &present {
            for language in &self.languages {
                let mut name = match self.naming {
                    ColumnNaming::Name if present.len() > 1 => {
                        format!("{}_{}", column, language.display_name())
                    }
                    naming => naming.column_name(column, language),
                };
                while taken.contains(&name) {
                    name = format!("{}_{}", name, language.code);
                }
                taken.insert(name.clone());
                assignments.push((column, language, name));
            }
        }
        assignments
    }

    /// Names of the columns a table will gain, in the order they are added
    pub fn derived_columns(&self, table: &Table) -> Vec<String> {
        self.assignments(table)
            .into_iter()
            .map(|(_, _, name)| name)
            .collect()
    }
}

/// Running count of translated cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    /// Text cells with translatable content, each sent to the provider
    pub attempted: usize,
    /// Attempted cells whose result differs from the source
    pub changed: usize,
}

impl TranslationStats {
    /// `changed / attempted` as a percentage; 0 when nothing was attempted
    pub fn change_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.changed as f64 / self.attempted as f64 * 100.0
        }
    }
}

impl AddAssign for TranslationStats {
    fn add_assign(&mut self, other: Self) {
        self.attempted += other.attempted;
        self.changed += other.changed;
    }
}

/// Translate one cell and update the counters
pub(crate) async fn translate_counted(
    translator: &PreservingTranslator,
    cell: &Cell,
    language: &str,
    stats: &mut TranslationStats,
) -> Cell {
    if cell.is_symbolic_only() {
        return cell.clone();
    }
    stats.attempted += 1;
    let translated = translator.translate_cell(cell, language).await;
    if translated != *cell {
        stats.changed += 1;
    }
    translated
}

/// Add one translated column per (column, language) pair of the plan
///
/// Columns missing from the table are skipped. Source columns of the plan are
/// never touched and every pair gets its own column (see
/// [`BatchPlan::assignments`]); any other column sharing a derived name has
/// its cells overwritten.
///
/// # Example
/// ```ignore
/// let plan = BatchPlan::new(vec!["text".into()], vec![Language::new("hi", "Hindi")]);
/// let stats = translate_table_columns(&translator, &mut table, &plan).await;
/// // table now has a "text_hi" column
/// ```
pub async fn translate_table_columns(
    translator: &PreservingTranslator,
    table: &mut Table,
    plan: &BatchPlan,
) -> TranslationStats {
    let mut stats = TranslationStats::default();

    for (column_name, language, derived_name) in plan.assignments(table) {
        let Some(source) = table.column(column_name).map(|c| c.cells.clone()) else {
            continue;
        };

        let mut derived = Vec::with_capacity(source.len());
        for cell in &source {
            derived.push(translate_counted(translator, cell, &language.code, &mut stats).await);
        }
        info!(
            column = %column_name,
            language = %language.code,
            "Derived column {}", derived_name
        );
        table.set_column(&derived_name, derived);
    }

    stats
}

/// A copy of `table` with the selected columns translated in place into one language
///
/// Other columns are copied as they are. When `language` is the translator's
/// source language nothing is sent and the copy is identical.
pub async fn localize_table(
    translator: &PreservingTranslator,
    table: &Table,
    columns: &[String],
    language: &str,
) -> (Table, TranslationStats) {
    let mut localized = table.clone();
    let mut stats = TranslationStats::default();

    if language == translator.source_language() {
        return (localized, stats);
    }

    for column_name in columns {
        let Some(source) = table.column(column_name) else {
            continue;
        };
        let mut translated = Vec::with_capacity(source.cells.len());
        for cell in &source.cells {
            translated.push(translate_counted(translator, cell, language, &mut stats).await);
        }
        localized.set_column(column_name, translated);
    }

    (localized, stats)
}

/// Totals over a run of several files
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub files_processed: usize,
    pub stats: TranslationStats,
    pub errors: Vec<String>,
}

impl BatchReport {
    const MAX_LISTED_ERRORS: usize = 10;

    pub fn record_file(&mut self, stats: TranslationStats) {
        self.files_processed += 1;
        self.stats += stats;
    }

    pub fn record_error(&mut self, file: &str, error: impl fmt::Display) {
        self.errors.push(format!("{}: {}", file, error));
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Files processed: {}", self.files_processed)?;
        writeln!(f, "Cells translated (attempted): {}", self.stats.attempted)?;
        writeln!(f, "Cells changed: {}", self.stats.changed)?;
        write!(
            f,
            "Change rate (proxy for translation coverage): {:.1}%",
            self.stats.change_rate()
        )?;
        if !self.errors.is_empty() {
            write!(f, "\n\nErrors:")?;
            for error in self.errors.iter().take(Self::MAX_LISTED_ERRORS) {
                write!(f, "\n{}", error)?;
            }
            if self.errors.len() > Self::MAX_LISTED_ERRORS {
                write!(
                    f,
                    "\n... and {} more",
                    self.errors.len() - Self::MAX_LISTED_ERRORS
                )?;
            }
        }
        Ok(())
    }
}
