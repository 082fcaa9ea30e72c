mod android;
mod discovery;
mod workbook;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use curly_translate::mt::fallback_languages;
use curly_translate::{BackendKind, BatchPlan, BatchReport, ColumnNaming, Config, Language};
use discovery::{find_input_files, scan_columns_from_first_file};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use workbook::{SheetLayout, SheetTarget, translate_sheet};

fn cli() -> Command {
    Command::new("curly-translate")
        .version("0.1.0")
        .about("Machine translation that keeps {placeholders} intact")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML configuration file")
                .global(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .short('b')
                .help("Translation backend, overrides the configuration")
                .global(true)
                .value_parser(["google", "libre", "mock"]),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .short('s')
                .help("Source language code (default: en)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log every translation decision")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("sheet")
                .about("Add translated columns to CSV files")
                .arg(
                    Arg::new("file")
                        .long("file")
                        .short('f')
                        .help("Input CSV file (repeatable)")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("folder")
                        .long("folder")
                        .help("Folder to scan for CSV files")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("recursive")
                        .long("recursive")
                        .short('r')
                        .help("Scan subfolders too")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("column")
                        .long("column")
                        .help("Column to translate (repeatable; default: all columns of the first file)")
                        .action(ArgAction::Append),
                )
                .arg(lang_arg())
                .arg(
                    Arg::new("naming")
                        .long("naming")
                        .help("Derived column names: code (hint_hi) or name (Hindi)")
                        .value_parser(["code", "name"]),
                )
                .arg(
                    Arg::new("layout")
                        .long("layout")
                        .help("append: all columns; project: selected columns only; split: one file per language")
                        .value_parser(["append", "project", "split"])
                        .default_value("append"),
                )
                .arg(output_dir_arg()),
        )
        .subcommand(
            Command::new("android")
                .about("Translate an Android res/values folder")
                .arg(
                    Arg::new("values-dir")
                        .long("values-dir")
                        .help("Folder holding strings.xml and friends")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(lang_arg())
                .arg(output_dir_arg()),
        )
        .subcommand(
            Command::new("text")
                .about("Translate a single string")
                .arg(
                    Arg::new("text")
                        .help("Text to translate")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("lang")
                        .long("lang")
                        .short('l')
                        .help("Target language code (e.g., hi, ml, ta)")
                        .required(true),
                ),
        )
        .subcommand(Command::new("languages").about("List languages the backend supports"))
}

fn lang_arg() -> Arg {
    Arg::new("lang")
        .long("lang")
        .short('l')
        .help("Target language code (repeatable; default: configured languages)")
        .action(ArgAction::Append)
}

fn output_dir_arg() -> Arg {
    Arg::new("output-dir")
        .long("output-dir")
        .short('o')
        .help("Output folder (default: translated)")
        .value_parser(value_parser!(PathBuf))
}

fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn strings(matches: &ArgMatches, id: &str) -> Vec<String> {
    matches
        .get_many::<String>(id)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

fn target_languages(matches: &ArgMatches, config: &Config) -> Vec<Language> {
    let codes = strings(matches, "lang");
    if codes.is_empty() {
        config.languages.clone()
    } else {
        codes.iter().map(|code| config.language(code)).collect()
    }
}

fn output_dir(matches: &ArgMatches, config: &Config) -> PathBuf {
    matches
        .get_one::<PathBuf>("output-dir")
        .cloned()
        .unwrap_or_else(|| config.output_dir.clone())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = cli().get_matches();

    let mut config = Config::load_or_default(matches.get_one::<PathBuf>("config").map(|p| p.as_path()))?;
    if let Some(backend) = matches.get_one::<String>("backend") {
        config.backend.kind = backend.parse::<BackendKind>()?;
    }
    if let Some(source) = matches.get_one::<String>("source") {
        config.source_language = source.clone();
    }
    init_logging(&config, matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("sheet", sub)) => run_sheet(sub, &config).await,
        Some(("android", sub)) => run_android(sub, &config).await,
        Some(("text", sub)) => run_text(sub, &config).await,
        Some(("languages", _)) => run_languages(&config).await,
        _ => Err("No command given; see --help".into()),
    }
}

async fn run_sheet(matches: &ArgMatches, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let files: Vec<PathBuf> = matches
        .get_many::<PathBuf>("file")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let folder = matches.get_one::<PathBuf>("folder").map(|p| p.as_path());
    let inputs = find_input_files(&files, folder, matches.get_flag("recursive"), "csv");
    if inputs.is_empty() {
        return Err("No CSV files found; pass --file or --folder".into());
    }

    let mut columns = strings(matches, "column");
    if columns.is_empty() {
        columns = config.columns.clone();
    }
    if columns.is_empty() {
        columns = scan_columns_from_first_file(&inputs);
    }
    if columns.is_empty() {
        return Err("No columns to translate".into());
    }

    let languages = target_languages(matches, config);
    if languages.is_empty() {
        return Err("No target languages".into());
    }

    let naming = match matches.get_one::<String>("naming").map(|s| s.as_str()) {
        Some("name") => ColumnNaming::Name,
        Some(_) => ColumnNaming::Code,
        None => config.column_naming,
    };
    let layout: SheetLayout = matches
        .get_one::<String>("layout")
        .map(|s| s.parse::<SheetLayout>())
        .transpose()?
        .unwrap_or_default();
    let output_dir = output_dir(matches, config);

    let translator = config.build_translator()?;
    let plan = BatchPlan::new(columns, languages).with_naming(naming);
    info!(
        provider = translator.provider_name(),
        "Translating {} file(s), columns {:?}",
        inputs.len(),
        plan.columns
    );

    let mut report = BatchReport::default();
    for input in &inputs {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
        let target = SheetTarget {
            output_dir: &output_dir,
            layout,
            timestamp: &timestamp,
            split_per_input: inputs.len() > 1,
        };
        match translate_sheet(&translator, input, &plan, &target).await {
            Ok((_, stats)) => report.record_file(stats),
            Err(e) => {
                warn!("Skipping {}: {}", input.display(), e);
                report.record_error(&display_name(input), e);
            }
        }
    }

    println!("{}", report);
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn run_android(matches: &ArgMatches, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let values_dir = matches
        .get_one::<PathBuf>("values-dir")
        .ok_or("--values-dir is required")?;
    let languages: Vec<String> = target_languages(matches, config)
        .into_iter()
        .map(|l| l.code)
        .collect();
    let output_dir = output_dir(matches, config);

    let translator = config.build_translator()?;
    let report =
        android::translate_values_dir(&translator, values_dir, &languages, &output_dir).await;

    println!("{}", report);
    Ok(())
}

async fn run_text(matches: &ArgMatches, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let text = matches.get_one::<String>("text").ok_or("Missing text")?;
    let language = matches.get_one::<String>("lang").ok_or("Missing --lang")?;

    let translator = config.build_translator()?;
    println!("{}", translator.translate(text, language).await);
    Ok(())
}

async fn run_languages(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let translator = config.build_translator()?;
    let languages = translator.supported_languages().await.unwrap_or_else(|e| {
        warn!("Could not list languages from {}: {}", translator.provider_name(), e);
        fallback_languages()
    });

    for language in languages {
        println!("{}\t{}", language.code, language.display_name());
    }
    Ok(())
}
