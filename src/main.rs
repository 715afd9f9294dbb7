//! Command-line front end: check translation files and query catalogs.

use std::io::{
    self,
    Write,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{
    Args,
    Parser,
    Subcommand,
};
use qt_ts_catalog::config::{
    ConfigError,
    ConfigManager,
};
use qt_ts_catalog::diagnostics::{
    Severity,
    check_catalog,
};
use qt_ts_catalog::format::FormatArgs;
use qt_ts_catalog::{
    Catalog,
    FormatError,
    LoadError,
    LoadOptions,
    Translator,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "qt-ts-catalog", version, about = "Inspect and query Qt Linguist translation catalogs")]
struct Cli {
    /// Workspace root holding `.ts-catalog.json`
    #[arg(long, global = true, default_value = ".")]
    workspace: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Load translation files and report problems
    Check {
        /// `.ts` files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the locales found in the translations directory
    Locales,
    /// Translate a source string
    Lookup(QueryArgs),
    /// Translate a source string and substitute placeholders
    Format {
        #[command(flatten)]
        query: QueryArgs,

        /// Positional argument, in order
        #[arg(long = "arg", value_name = "VALUE")]
        args: Vec<String>,

        /// Named argument
        #[arg(long = "named", value_name = "KEY=VALUE", value_parser = parse_named_arg)]
        named: Vec<(String, String)>,
    },
}

/// Which string to translate, and into which locale.
#[derive(Debug, Clone, Args)]
struct QueryArgs {
    /// Locale to translate into (defaults to the configured default locale)
    #[arg(long)]
    locale: Option<String>,

    /// Context the source string belongs to
    #[arg(long)]
    context: String,

    /// Source text
    source: String,
}

/// Errors that end a command.
#[derive(Error, Debug)]
enum CliError {
    /// Settings file unreadable or invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Translation file unreadable or malformed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Placeholder without a matching argument
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Stdout closed
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Parse `KEY=VALUE`.
fn parse_named_arg(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

/// Logs go to stderr; `RUST_LOG` overrides `--verbose`.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Run a command. `Ok(false)` means it ran but found problems.
fn run(cli: Cli) -> Result<bool, CliError> {
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Check { files } => {
            let config = load_config(cli.workspace)?;
            check(&files, config.get_settings().load_options(), &mut out)
        }
        Command::Locales => {
            let translator = open_translator(cli.workspace)?;
            list_locales(&translator, &mut out)?;
            Ok(true)
        }
        Command::Lookup(query) => {
            let catalog = catalog_for(cli.workspace, query.locale.as_deref())?;
            writeln!(out, "{}", catalog.lookup(&query.context, &query.source))?;
            Ok(true)
        }
        Command::Format { query, args, named } => {
            let catalog = catalog_for(cli.workspace, query.locale.as_deref())?;
            let mut values: FormatArgs = args.into_iter().collect();
            for (key, value) in named {
                values.insert(key, value);
            }
            let text = catalog.format(&query.context, &query.source, &values)?;
            writeln!(out, "{text}")?;
            Ok(true)
        }
    }
}

/// Load each file and print its report and diagnostics.
fn check(files: &[PathBuf], options: LoadOptions, out: &mut impl Write) -> Result<bool, CliError> {
    let mut clean = true;

    for path in files {
        let catalog = match Catalog::load_file(path, options) {
            Ok(catalog) => catalog,
            Err(e) => {
                writeln!(out, "{}: error: {e}", path.display())?;
                clean = false;
                continue;
            }
        };

        let report = catalog.report();
        writeln!(
            out,
            "{}: locale {}, {} entries ({} duplicates, {} untranslated, {} unfinished, {} retired)",
            path.display(),
            catalog.locale().unwrap_or("unknown"),
            report.loaded,
            report.duplicates,
            report.untranslated,
            report.unfinished,
            report.retired
        )?;

        for diagnostic in check_catalog(&catalog) {
            if diagnostic.severity == Severity::Warning {
                clean = false;
            }
            writeln!(out, "  {diagnostic}")?;
        }
    }

    Ok(clean)
}

/// Print the base locale and every discovered translation file.
fn list_locales(translator: &Translator, out: &mut impl Write) -> Result<(), CliError> {
    let languages = translator.languages();
    let base = translator.base_locale();
    writeln!(out, "{base}\t(base)\t{}", languages.get(base).map_or("", String::as_str))?;

    let registry = translator.registry();
    if registry.is_empty() {
        writeln!(out, "no translation files in {}", registry.dir().display())?;
    }
    for resource in registry.resources() {
        let name = languages.get(&resource.locale).map_or("", String::as_str);
        writeln!(out, "{}\t{}\t{name}", resource.locale, resource.path.display())?;
    }
    Ok(())
}

/// Validated settings of the workspace.
fn load_config(workspace: PathBuf) -> Result<ConfigManager, CliError> {
    let mut config = ConfigManager::new();
    config.load_settings(Some(workspace))?;
    Ok(config)
}

/// Translator for the workspace, on its default locale.
fn open_translator(workspace: PathBuf) -> Result<Translator, CliError> {
    let config = load_config(workspace)?;
    Ok(Translator::from_config(&config)?)
}

/// Catalog for `locale`, or for the configured default locale.
fn catalog_for(workspace: PathBuf, locale: Option<&str>) -> Result<Arc<Catalog>, CliError> {
    let translator = open_translator(workspace)?;
    if let Some(locale) = locale {
        translator.switch_locale(locale)?;
    }
    Ok(translator.current())
}
