//! CSV workbooks: loading into a [`Table`], translating, writing results

use curly_translate::{
    BatchPlan, MtError, MtResult, PreservingTranslator, Table, TranslationStats, localize_table,
    translate_table_columns,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Shape of the files written for one input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SheetLayout {
    /// Every original column plus the derived ones
    #[default]
    Append,
    /// Only the selected columns plus the derived ones
    Project,
    /// One file per language with the selected columns translated in place
    Split,
}

impl std::str::FromStr for SheetLayout {
    type Err = MtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(SheetLayout::Append),
            "project" => Ok(SheetLayout::Project),
            "split" => Ok(SheetLayout::Split),
            other => Err(MtError::ConfigError(format!("Unknown layout '{}'", other))),
        }
    }
}

fn csv_error(path: &Path, e: impl std::fmt::Display) -> MtError {
    MtError::ResourceError(format!("{}: {}", path.display(), e))
}

fn open_reader(path: &Path) -> MtResult<csv::Reader<fs::File>> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))
}

/// Column names from the header row
pub fn read_headers(path: &Path) -> MtResult<Vec<String>> {
    let mut reader = open_reader(path)?;
    let headers = reader.headers().map_err(|e| csv_error(path, e))?;
    Ok(headers.iter().map(String::from).collect())
}

pub fn read_table(path: &Path) -> MtResult<Table> {
    let mut reader = open_reader(path)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| csv_error(path, e))?;
        rows.push(record.iter().map(String::from).collect::<Vec<_>>());
    }

    Ok(Table::from_rows(&headers, &rows))
}

pub fn write_table(table: &Table, path: &Path) -> MtResult<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(path, e))?;
    writer
        .write_record(table.headers())
        .map_err(|e| csv_error(path, e))?;
    for row in table.rows() {
        writer.write_record(&row).map_err(|e| csv_error(path, e))?;
    }
    writer.flush().map_err(|e| csv_error(path, e))?;
    Ok(())
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// `{output_dir}/{stem}_translated_{timestamp}.csv`
pub fn timestamped_output_path(output_dir: &Path, input: &Path, timestamp: &str) -> PathBuf {
    output_dir.join(format!("{}_translated_{}.csv", file_stem(input), timestamp))
}

/// Where one input file's results go
#[derive(Debug, Clone)]
pub struct SheetTarget<'a> {
    pub output_dir: &'a Path,
    pub layout: SheetLayout,
    /// Used by the append and project layouts
    pub timestamp: &'a str,
    /// Split layout only: put each input's language files in a folder named after it
    pub split_per_input: bool,
}

/// Translate one CSV file according to `plan` and write the results
///
/// # Returns
/// The paths written and the cell counts for the file
pub async fn translate_sheet(
    translator: &PreservingTranslator,
    input: &Path,
    plan: &BatchPlan,
    target: &SheetTarget<'_>,
) -> MtResult<(Vec<PathBuf>, TranslationStats)> {
    let mut table = read_table(input)?;
    info!(
        "Loaded {} ({} rows, {} columns)",
        input.display(),
        table.row_count(),
        table.columns().len()
    );

    match target.layout {
        SheetLayout::Append | SheetLayout::Project => {
            let derived = plan.derived_columns(&table);
            let stats = translate_table_columns(translator, &mut table, plan).await;

            if target.layout == SheetLayout::Project {
                let keep: Vec<String> = plan.columns.iter().cloned().chain(derived).collect();
                table = table.select(&keep);
            }

            fs::create_dir_all(target.output_dir).map_err(|e| csv_error(target.output_dir, e))?;
            let out = timestamped_output_path(target.output_dir, input, target.timestamp);
            write_table(&table, &out)?;
            info!("Saved {}", out.display());
            Ok((vec![out], stats))
        }
        SheetLayout::Split => {
            let dir = if target.split_per_input {
                target.output_dir.join(file_stem(input))
            } else {
                target.output_dir.to_path_buf()
            };
            fs::create_dir_all(&dir).map_err(|e| csv_error(&dir, e))?;

            let mut written = Vec::new();
            let mut stats = TranslationStats::default();
            for language in &plan.languages {
                info!("Translating to {} ({})", language.display_name(), language.code);
                let (localized, language_stats) =
                    localize_table(translator, &table, &plan.columns, &language.code).await;
                let out = dir.join(format!("{}.csv", language.code));
                write_table(&localized, &out)?;
                info!("Saved {}", out.display());
                stats += language_stats;
                written.push(out);
            }
            Ok((written, stats))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curly_translate::mt::{MockMode, MockTranslator};
    use curly_translate::{ColumnNaming, Language};
    use std::sync::Arc;
    use tempfile::TempDir;

    const SHEET: &str = "mode,hint,level\n\
                         easy,Tap {item} to start,1\n\
                         hard,!!!,2\n\
                         easy,,3\n";

    fn suffix_translator() -> PreservingTranslator {
        PreservingTranslator::new(Arc::new(MockTranslator::new(MockMode::Suffix)))
    }

    fn write_input(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("hints.csv");
        fs::write(&path, SHEET).unwrap();
        path
    }

    fn plan() -> BatchPlan {
        BatchPlan::new(
            vec!["hint".to_string()],
            vec![Language::new("hi", "Hindi"), Language::new("ta", "Tamil")],
        )
    }

    #[test]
    fn test_read_table_classifies_cells() {
        let dir = TempDir::new().unwrap();
        let table = read_table(&write_input(&dir)).unwrap();
        assert_eq!(table.headers(), vec!["mode", "hint", "level"]);
        assert_eq!(table.row_count(), 3);
        let level = table.column("level").unwrap();
        assert_eq!(level.cells[0], curly_translate::Cell::Number("1".to_string()));
        assert_eq!(table.column("hint").unwrap().cells[2], curly_translate::Cell::Empty);
    }

    #[test]
    fn test_read_missing_file_is_resource_error() {
        assert!(matches!(
            read_table(Path::new("/nonexistent/sheet.csv")),
            Err(MtError::ResourceError(_))
        ));
    }

    #[test]
    fn test_write_then_read_preserves_fields() {
        let dir = TempDir::new().unwrap();
        let table = read_table(&write_input(&dir)).unwrap();
        let out = dir.path().join("copy.csv");
        write_table(&table, &out).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), SHEET);
    }

    #[test]
    fn test_timestamped_output_path() {
        let path = timestamped_output_path(Path::new("out"), Path::new("data/en.csv"), "20250101_120000");
        assert_eq!(path, PathBuf::from("out/en_translated_20250101_120000.csv"));
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!("split".parse::<SheetLayout>().unwrap(), SheetLayout::Split);
        assert!("sideways".parse::<SheetLayout>().is_err());
    }

    #[tokio::test]
    async fn test_append_layout() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir);
        let out_dir = dir.path().join("translated");
        let target = SheetTarget {
            output_dir: &out_dir,
            layout: SheetLayout::Append,
            timestamp: "20250101_120000",
            split_per_input: false,
        };

        let (written, stats) = translate_sheet(&suffix_translator(), &input, &plan(), &target)
            .await
            .unwrap();

        assert_eq!(written, vec![out_dir.join("hints_translated_20250101_120000.csv")]);
        assert_eq!(stats, TranslationStats { attempted: 2, changed: 2 });

        let table = read_table(&written[0]).unwrap();
        assert_eq!(table.headers(), vec!["mode", "hint", "level", "hint_hi", "hint_ta"]);
        let rows: Vec<Vec<&str>> = table.rows().collect();
        assert_eq!(rows[0][3], "Tap {item} to start_hi");
        assert_eq!(rows[1][4], "!!!");
    }

    #[tokio::test]
    async fn test_project_layout_with_language_names() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir);
        let target = SheetTarget {
            output_dir: dir.path(),
            layout: SheetLayout::Project,
            timestamp: "ts",
            split_per_input: false,
        };
        let plan = plan().with_naming(ColumnNaming::Name);

        let (written, _) = translate_sheet(&suffix_translator(), &input, &plan, &target)
            .await
            .unwrap();
        let table = read_table(&written[0]).unwrap();
        assert_eq!(table.headers(), vec!["hint", "Hindi", "Tamil"]);
    }

    #[tokio::test]
    async fn test_split_layout() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir);
        let out_dir = dir.path().join("split");
        let target = SheetTarget {
            output_dir: &out_dir,
            layout: SheetLayout::Split,
            timestamp: "unused",
            split_per_input: true,
        };

        let (written, stats) = translate_sheet(&suffix_translator(), &input, &plan(), &target)
            .await
            .unwrap();

        assert_eq!(
            written,
            vec![out_dir.join("hints/hi.csv"), out_dir.join("hints/ta.csv")]
        );
        assert_eq!(stats.attempted, 2);

        let tamil = read_table(&written[1]).unwrap();
        assert_eq!(tamil.headers(), vec!["mode", "hint", "level"]);
        let rows: Vec<Vec<&str>> = tamil.rows().collect();
        assert_eq!(rows[0], vec!["easy", "Tap {item} to start_ta", "1"]);
    }

    #[tokio::test]
    async fn test_unreadable_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let target = SheetTarget {
            output_dir: dir.path(),
            layout: SheetLayout::Append,
            timestamp: "ts",
            split_per_input: false,
        };
        let result = translate_sheet(
            &suffix_translator(),
            &dir.path().join("missing.csv"),
            &plan(),
            &target,
        )
        .await;
        assert!(matches!(result, Err(MtError::ResourceError(_))));
    }
}
