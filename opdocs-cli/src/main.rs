//! Command-line interface for opdocs
//! Generates a mnemonic → documentation lookup table from the vendor ISA XML archive.
//!
//! Usage:
//!   opdocs -c `<config.json>` [-i `<input>`] [-d `<download>`] [-o `<output>`] [-f `<format>`]
//!   opdocs --list-formats                                  - List available table formats

mod fetch;

use clap::Parser;
use opdocs_config::{ConfigError, Loader, OpdocsConfig};
use opdocs_core::pipeline::{DirectoryIndex, HeadingSuffixPolicy};
use opdocs_core::{
    Corpus, CorpusError, EmitError, EmitOptions, FormatRegistry, MnemonicExpander, Pipeline,
    PipelineError,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "opdocs", version)]
#[command(about = "Generate instruction documentation tables from ISA XML archives")]
struct Args {
    /// Folder the archive is extracted into
    #[arg(short = 'i', long = "input-folder", default_value = "aarch64-docs")]
    input_folder: PathBuf,

    /// Path of the generated file
    #[arg(short = 'o', long = "output-path", default_value = "./Aarch64Docs.kt")]
    output_path: PathBuf,

    /// Folder the archive is downloaded into
    #[arg(short = 'd', long = "download-folder", default_value = "aarch64-docs")]
    download_folder: PathBuf,

    /// JSON configuration file
    #[arg(short = 'c', long = "config-file", required_unless_present = "list_formats")]
    config_file: Option<PathBuf>,

    /// Output table format
    #[arg(short = 'f', long, default_value = "kotlin")]
    format: String,

    /// List available table formats
    #[arg(long)]
    list_formats: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] fetch::FetchError),

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error("{0}. Not writing output file")]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Pipeline(_) => 3,
            _ => 1,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let registry = FormatRegistry::with_defaults();
    if args.list_formats {
        handle_list_formats_command(&registry);
        return ExitCode::SUCCESS;
    }

    match run(&args, &registry) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn handle_list_formats_command(registry: &FormatRegistry) {
    println!("Available table formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!("  {} (.{})", name, format.file_extension());
            println!("    {}", format.description());
            println!();
        }
    }
}

fn load_config(path: &Path) -> Result<OpdocsConfig, CliError> {
    let config = Loader::new().with_file(path).build()?;
    tracing::info!(
        isa = %config.isa,
        archive = %config.archive.name,
        documentation = %config.documentation,
        "using configuration"
    );
    Ok(config)
}

fn run(args: &Args, registry: &FormatRegistry) -> Result<(), CliError> {
    let config_path = args
        .config_file
        .as_deref()
        .ok_or_else(|| ConfigError::NotFound("--config-file".to_string()))?;
    let config = load_config(config_path)?;
    // Fail on an unknown format before any download or parsing work.
    registry.get(&args.format)?;

    let corpus_dir =
        fetch::ensure_corpus(&config.archive, &args.input_folder, &args.download_folder)?;

    let corpus = Corpus::discover(&corpus_dir, &config.ignored_stems())?;
    let outcome = corpus.extract_all(&MnemonicExpander::standard())?;

    let index = DirectoryIndex::new(&corpus_dir);
    let policy = HeadingSuffixPolicy::new(config.disambiguating_qualifiers.iter().cloned());
    let report = Pipeline::new(&index, &policy).run(outcome.instructions)?;
    if !report.duplicates.is_empty() {
        tracing::info!(count = report.duplicates.len(), "duplicate mnemonics dropped");
    }

    let options = EmitOptions {
        isa: config.isa.clone(),
        package: config.package.clone(),
        documentation: config.documentation.clone(),
    };
    let output = registry.emit(&report.table, &options, &args.format)?;

    tracing::info!(
        instructions = report.table.capacity,
        entries = report.table.len(),
        path = %args.output_path.display(),
        "writing table"
    );
    write_atomically(&args.output_path, &output)
}

/// Write through a sibling temporary file so a failure never leaves a partial artifact.
fn write_atomically(path: &Path, contents: &str) -> Result<(), CliError> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, contents)
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|source| {
            let _ = fs::remove_file(&tmp);
            CliError::Write {
                path: path.to_path_buf(),
                source,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomically_replaces_target() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Aarch64Docs.kt");
        fs::write(&target, "old").unwrap();

        write_atomically(&target, "new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert!(!dir.path().join("Aarch64Docs.kt.tmp").exists());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory in place of the target makes the rename fail after the
        // temp file has been fully written.
        let target = dir.path().join("Aarch64Docs.kt");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "").unwrap();

        let err = write_atomically(&target, "contents").unwrap_err();
        assert!(matches!(err, CliError::Write { .. }));
        assert!(!dir.path().join("Aarch64Docs.kt.tmp").exists());
    }

    #[test]
    fn test_failed_write_reports_target() {
        let dir = tempfile::tempdir().unwrap();
        // The parent directory does not exist, so the write itself fails.
        let target = dir.path().join("missing").join("Aarch64Docs.kt");
        match write_atomically(&target, "x").unwrap_err() {
            CliError::Write { path, .. } => assert_eq!(path, target),
            other => panic!("expected a write error, got {other:?}"),
        }
        assert!(!dir.path().join("missing").exists());
    }
}
