//! rxcheck CLI: effect and enum class checks over a resolved program.

mod config;
mod output;

use clap::{Parser as ClapParser, Subcommand};
use config::{ConfigError, RxcheckConfig};
use output::{red, Format};
use rxcheck_checker::{check_program, CheckOptions, ValueConflictPolicy};
use rxcheck_core::Program;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(
    name = "rxcheck",
    version,
    about = "Effect and enum class checks for Hack-style programs"
)]
struct Cli {
    /// Path to rxcheck.toml (default: search the current directory and ancestors)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a program exported by the front end as JSON
    Check {
        /// Path to the program JSON
        #[arg()]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Plain)]
        format: Format,

        /// Override the value-conflict policy from the config
        #[arg(long)]
        value_conflict: Option<String>,

        /// Run single-threaded
        #[arg(long)]
        sequential: bool,
    },
    /// Print resolved enum class member tables
    Enums {
        /// Path to the program JSON
        #[arg()]
        file: PathBuf,

        /// Only this class
        #[arg(long)]
        class: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Plain)]
        format: Format,
    },
    /// Print a starter rxcheck.toml
    InitConfig,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid program in '{path}': {source}")]
    Program {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot serialize output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("unknown value-conflict policy '{0}' (expected 'error' or 'first_wins')")]
    Policy(String),
    #[error("unknown enum class '{0}'")]
    UnknownClass(String),
}

const EXIT_CLEAN: i32 = 0;
const EXIT_FINDINGS: i32 = 1;
const EXIT_FAILURE: i32 = 2;

fn main() {
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", red("error:"), e);
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32, CliError> {
    let (config_path, config) = match &cli.config {
        Some(path) => (Some(path.clone()), RxcheckConfig::load_from(path)?),
        None => {
            let cwd = std::env::current_dir()
                .map_err(|source| CliError::Read { path: ".".to_string(), source })?;
            RxcheckConfig::discover(&cwd)?
        }
    };
    init_tracing(&config);
    if let Some(path) = &config_path {
        tracing::debug!(path = %path.display(), "loaded config");
    }

    match cli.command {
        Commands::Check { file, format, value_conflict, sequential } => {
            let mut options = config.check;
            if let Some(raw) = value_conflict {
                options.value_conflict =
                    raw.parse::<ValueConflictPolicy>().map_err(|_| CliError::Policy(raw))?;
            }
            if sequential {
                options.parallel = false;
            }
            cmd_check(&file, format, &options)
        }
        Commands::Enums { file, class, format } => {
            cmd_enums(&file, class.as_deref(), format, &config.check)
        }
        Commands::InitConfig => {
            print!("{}", RxcheckConfig::default_template());
            Ok(EXIT_CLEAN)
        }
    }
}

/// `RXCHECK_LOG` wins over the config file; warnings only by default.
fn init_tracing(config: &RxcheckConfig) {
    let filter = EnvFilter::try_from_env("RXCHECK_LOG").unwrap_or_else(|_| {
        let directives = config.log.filter.as_deref().unwrap_or("rxcheck=warn");
        EnvFilter::new(directives)
    });
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load_program(path: &Path) -> Result<Program, CliError> {
    let display = path.display().to_string();
    let source = std::fs::read_to_string(path)
        .map_err(|source| CliError::Read { path: display.clone(), source })?;
    Program::from_json(&source).map_err(|source| CliError::Program { path: display, source })
}

fn cmd_check(file: &Path, format: Format, options: &CheckOptions) -> Result<i32, CliError> {
    let program = load_program(file)?;
    let report = check_program(&program, options);
    let rendered =
        output::render_diagnostics(&file.display().to_string(), &report.diagnostics, format)?;
    print!("{}", rendered);
    Ok(if report.is_clean() { EXIT_CLEAN } else { EXIT_FINDINGS })
}

fn cmd_enums(
    file: &Path,
    class: Option<&str>,
    format: Format,
    options: &CheckOptions,
) -> Result<i32, CliError> {
    let program = load_program(file)?;
    let report = check_program(&Program { functions: Vec::new(), ..program }, options);
    let tables: Vec<_> = match class {
        Some(name) => {
            let table = report
                .enum_table(name)
                .ok_or_else(|| CliError::UnknownClass(name.to_string()))?;
            vec![table]
        }
        None => report.enums.iter().map(|r| r.as_ref()).collect(),
    };
    print!("{}", output::render_tables(&tables, format)?);
    let clean = tables.iter().all(|t| t.errors.is_empty());
    Ok(if clean { EXIT_CLEAN } else { EXIT_FINDINGS })
}
