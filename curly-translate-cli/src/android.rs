//! Android `res/values` folders

use crate::discovery::find_input_files;
use curly_translate::{
    BatchReport, MtError, MtResult, PreservingTranslator, TranslationStats, translate_strings_xml,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// `{output_dir}/values-{language}`
pub fn values_dir_for(output_dir: &Path, language: &str) -> PathBuf {
    output_dir.join(format!("values-{}", language))
}

async fn translate_resource_file(
    translator: &PreservingTranslator,
    input: &Path,
    output: &Path,
    language: &str,
) -> MtResult<TranslationStats> {
    let xml = fs::read_to_string(input).map_err(|e| {
        MtError::ResourceError(format!("Failed to read '{}': {}", input.display(), e))
    })?;
    let (translated, stats) = translate_strings_xml(translator, &xml, language).await?;
    fs::write(output, translated).map_err(|e| {
        MtError::ResourceError(format!("Failed to write '{}': {}", output.display(), e))
    })?;
    Ok(stats)
}

/// Translate every `*.xml` directly inside `values_dir` into each language
///
/// A file counts as processed once, with its counts summed over languages, if
/// at least one language succeeded. Each failing (file, language) pair is
/// recorded in the report and the run moves on.
pub async fn translate_values_dir(
    translator: &PreservingTranslator,
    values_dir: &Path,
    languages: &[String],
    output_dir: &Path,
) -> BatchReport {
    let mut report = BatchReport::default();
    let files = find_input_files(&[], Some(values_dir), false, "xml");
    if files.is_empty() {
        report.record_error(
            &values_dir.display().to_string(),
            "no .xml files found",
        );
        return report;
    }

    let mut per_file: Vec<Option<TranslationStats>> = vec![None; files.len()];
    for language in languages {
        let target_dir = values_dir_for(output_dir, language);
        if let Err(e) = fs::create_dir_all(&target_dir) {
            report.record_error(&target_dir.display().to_string(), e);
            continue;
        }

        for (index, input) in files.iter().enumerate() {
            let Some(file_name) = input.file_name() else {
                continue;
            };
            let output = target_dir.join(file_name);
            info!("Translating {} -> {}", file_name.to_string_lossy(), language);

            match translate_resource_file(translator, input, &output, language).await {
                Ok(stats) => *per_file[index].get_or_insert_with(TranslationStats::default) += stats,
                Err(e) => report.record_error(
                    &format!("{} ({})", file_name.to_string_lossy(), language),
                    e,
                ),
            }
        }
    }

    for stats in per_file.into_iter().flatten() {
        report.record_file(stats);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use curly_translate::mt::{MockMode, MockTranslator};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn suffix_translator() -> PreservingTranslator {
        PreservingTranslator::new(Arc::new(MockTranslator::new(MockMode::Suffix)))
    }

    #[tokio::test]
    async fn test_translates_each_file_per_language() {
        let dir = TempDir::new().unwrap();
        let values = dir.path().join("values");
        fs::create_dir_all(&values).unwrap();
        fs::write(
            values.join("strings.xml"),
            r#"<resources><string name="hi">Hello {name}</string></resources>"#,
        )
        .unwrap();
        fs::write(values.join("notes.txt"), "ignored").unwrap();

        let out = dir.path().join("translated");
        let report = translate_values_dir(
            &suffix_translator(),
            &values,
            &["ml".to_string(), "ar".to_string()],
            &out,
        )
        .await;

        assert_eq!(report.files_processed, 1);
        assert_eq!(report.stats.attempted, 2);
        assert!(report.errors.is_empty());
        let ml = fs::read_to_string(out.join("values-ml/strings.xml")).unwrap();
        assert!(ml.contains("Hello {name}_ml"));
        assert!(out.join("values-ar/strings.xml").exists());
        assert!(!out.join("values-ml/notes.txt").exists());
    }

    #[tokio::test]
    async fn test_malformed_file_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.xml"), "<resources><string>Oops</resources>").unwrap();

        let report = translate_values_dir(
            &suffix_translator(),
            dir.path(),
            &["hi".to_string()],
            &dir.path().join("out"),
        )
        .await;

        assert_eq!(report.files_processed, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("broken.xml"));
    }

    #[tokio::test]
    async fn test_files_are_counted_once_across_languages() {
        let dir = TempDir::new().unwrap();
        let values = dir.path().join("values");
        fs::create_dir_all(&values).unwrap();
        for name in ["strings.xml", "arrays.xml"] {
            fs::write(
                values.join(name),
                r#"<resources><string name="ok">OK</string></resources>"#,
            )
            .unwrap();
        }
        fs::write(values.join("broken.xml"), "<resources><string>Oops</resources>").unwrap();

        let languages: Vec<String> = ["hi", "ml", "ta"].iter().map(|l| l.to_string()).collect();
        let report =
            translate_values_dir(&suffix_translator(), &values, &languages, &dir.path().join("out"))
                .await;

        assert_eq!(report.files_processed, 2);
        assert_eq!(report.stats.attempted, 6);
        assert_eq!(report.errors.len(), 3);
        assert!(report.errors[0].starts_with("broken.xml (hi)"));
        assert!(report.to_string().starts_with("Files processed: 2\n"));
    }

    #[tokio::test]
    async fn test_empty_folder_is_reported() {
        let dir = TempDir::new().unwrap();
        let report =
            translate_values_dir(&suffix_translator(), dir.path(), &["hi".to_string()], dir.path())
                .await;
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_values_dir_for() {
        assert_eq!(
            values_dir_for(Path::new("translated"), "ml"),
            PathBuf::from("translated/values-ml")
        );
    }
}
