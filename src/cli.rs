//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_source::FileSource;
use crate::adapters::json_report::JsonReport;
use crate::adapters::text_report::{TextReport, render_instrument};
use crate::domain::action::{
    self, ACTION_RULES, Action, DEFAULT_ACTION, DEFAULT_RULE_DESCRIPTION, RiskProfile,
};
use crate::domain::aggregate::{BASELINE_MODEL, EngineConfig};
use crate::domain::config_validation::{
    DEFAULT_TIMEOUT_SECS, validate_config, validate_settings_config, validate_timeout,
    validate_url,
};
use crate::domain::error::SignaldashError;
use crate::domain::fallback::fallback_records;
use crate::domain::pipeline::{PipelineSettings, Snapshot, SnapshotStore};
use crate::domain::row::ColumnNames;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::source_port::MetricsSource;

#[derive(Parser, Debug)]
#[command(
    name = "signaldash",
    about = "Backtest metrics aggregation and trading-action classification"
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

/// Where the metrics table comes from. Flags win over the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Read the metrics table from a local file
    #[arg(long, conflicts_with = "url")]
    pub path: Option<PathBuf>,
    /// Fetch the metrics table over HTTP
    #[arg(long)]
    pub url: Option<String>,
}

impl SourceArgs {
    fn overrides_source(&self) -> bool {
        self.path.is_some() || self.url.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one ingestion cycle and print the snapshot
    Load {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Exit with status 3 when the fallback dataset was served
        #[arg(long)]
        require_live: bool,
    },
    /// Print the record for one instrument
    Show {
        symbol: String,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Classify a single risk/return profile
    Classify {
        #[arg(long = "return", allow_negative_numbers = true)]
        total_return: f64,
        #[arg(long, allow_negative_numbers = true)]
        sharpe: f64,
        /// Maximum drawdown in percent, e.g. -12.5
        #[arg(long, allow_negative_numbers = true)]
        max_drawdown: f64,
    },
    /// List the classification rules in evaluation order
    Rules,
    /// Print the built-in fallback dataset
    Fallback {
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Load {
            source,
            format,
            require_live,
        } => run_load(&source, format, require_live),
        Command::Show { symbol, source } => run_show(&symbol, &source),
        Command::Classify {
            total_return,
            sharpe,
            max_drawdown,
        } => run_classify(RiskProfile {
            total_return,
            sharpe,
            max_drawdown,
        }),
        Command::Rules => run_rules(),
        Command::Fallback { format } => run_fallback(format),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = SignaldashError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Pipeline settings from config; every key is optional.
pub fn build_settings(config: &dyn ConfigPort) -> PipelineSettings {
    let defaults = ColumnNames::default();
    let column = |key: &str, default: &str| {
        config
            .get_string("columns", key)
            .unwrap_or_else(|| default.to_string())
    };
    let columns = ColumnNames {
        instrument: column("instrument", &defaults.instrument),
        model: column("model", &defaults.model),
        total_return: column("return", &defaults.total_return),
        sharpe: column("sharpe", &defaults.sharpe),
        max_drawdown: column("max_drawdown", &defaults.max_drawdown),
        win_rate: column("win_rate", &defaults.win_rate),
    };

    let display_names: BTreeMap<String, String> = config
        .get_keys("names")
        .into_iter()
        .filter_map(|symbol| {
            config
                .get_string("names", &symbol)
                .map(|name| (symbol, name))
        })
        .collect();

    let engine = EngineConfig {
        baseline_model: config
            .get_string("engine", "baseline")
            .unwrap_or_else(|| BASELINE_MODEL.to_string()),
        universe: config.get_list("engine", "symbols"),
        display_names,
    };

    PipelineSettings { columns, engine }
}

/// Resolves the metrics source: `--path`, `--url`, then `[source] path`,
/// then `[source] url`.
pub fn build_source(
    args: &SourceArgs,
    config: Option<&dyn ConfigPort>,
) -> Result<Box<dyn MetricsSource>, SignaldashError> {
    if let Some(path) = &args.path {
        return Ok(Box::new(FileSource::new(path.clone())));
    }
    let timeout_secs = || -> Result<i64, SignaldashError> {
        match config {
            Some(c) => {
                validate_timeout(c)?;
                Ok(c.get_int("source", "timeout_secs", DEFAULT_TIMEOUT_SECS))
            }
            None => Ok(DEFAULT_TIMEOUT_SECS),
        }
    };
    if let Some(url) = &args.url {
        return http_source(url, timeout_secs()?);
    }

    let config_value = |key: &str| {
        config
            .and_then(|c| c.get_string("source", key))
            .filter(|s| !s.trim().is_empty())
    };
    if let Some(path) = config_value("path") {
        return Ok(Box::new(FileSource::new(PathBuf::from(path))));
    }
    if let Some(url) = config_value("url") {
        return http_source(&url, timeout_secs()?);
    }

    Err(SignaldashError::ConfigMissing {
        section: "source".into(),
        key: "path".into(),
    })
}

#[cfg(feature = "http")]
fn http_source(url: &str, timeout_secs: i64) -> Result<Box<dyn MetricsSource>, SignaldashError> {
    use crate::adapters::http_source::HttpSource;
    use std::time::Duration;

    validate_url(url)?;
    let secs = u64::try_from(timeout_secs).unwrap_or(DEFAULT_TIMEOUT_SECS as u64);
    Ok(Box::new(HttpSource::new(url, Duration::from_secs(secs))?))
}

#[cfg(not(feature = "http"))]
fn http_source(url: &str, _timeout_secs: i64) -> Result<Box<dyn MetricsSource>, SignaldashError> {
    validate_url(url)?;
    Err(SignaldashError::ConfigInvalid {
        section: "source".into(),
        key: "url".into(),
        reason: "http feature is required for url sources".into(),
    })
}

/// `--format` wins, then `[output] format`, then JSON.
pub fn resolve_format(flag: Option<OutputFormat>, config: Option<&dyn ConfigPort>) -> OutputFormat {
    if let Some(format) = flag {
        return format;
    }
    match config.and_then(|c| c.get_string("output", "format")).as_deref() {
        Some("text") => OutputFormat::Text,
        _ => OutputFormat::Json,
    }
}

pub fn report_for(format: OutputFormat, config: Option<&dyn ConfigPort>) -> Box<dyn ReportPort> {
    match format {
        OutputFormat::Json => Box::new(JsonReport {
            pretty: config
                .map(|c| c.get_bool("output", "pretty", true))
                .unwrap_or(true),
        }),
        OutputFormat::Text => Box::new(TextReport),
    }
}

/// Loads and validates the optional config, then runs one ingestion cycle.
///
/// Only configuration problems are errors here; data problems end in the
/// fallback snapshot.
pub fn load_snapshot(
    args: &SourceArgs,
    config: Option<&dyn ConfigPort>,
) -> Result<std::sync::Arc<Snapshot>, SignaldashError> {
    if let Some(cfg) = config {
        if args.overrides_source() {
            validate_settings_config(cfg)?;
        } else {
            validate_config(cfg)?;
        }
    }

    let settings = config.map(build_settings).unwrap_or_default();
    let source = build_source(args, config)?;
    tracing::info!(location = %source.location(), "loading metrics");

    let store = SnapshotStore::default();
    Ok(store.refresh(source.as_ref(), &settings))
}

fn open_config(args: &SourceArgs) -> Result<Option<FileConfigAdapter>, ExitCode> {
    match &args.config {
        Some(path) => {
            tracing::info!("loading config from {}", path.display());
            load_config(path).map(Some)
        }
        None => Ok(None),
    }
}

fn run_load(args: &SourceArgs, format: Option<OutputFormat>, require_live: bool) -> ExitCode {
    let config = match open_config(args) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let config_ref = config.as_ref().map(|c| c as &dyn ConfigPort);

    let snapshot = match load_snapshot(args, config_ref) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let report = report_for(resolve_format(format, config_ref), config_ref);
    if let Err(e) = report.write_to(&snapshot, &mut io::stdout().lock()) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if require_live && !snapshot.is_live() {
        eprintln!("error: live metrics unavailable, fallback dataset served");
        return ExitCode::from(3);
    }
    ExitCode::SUCCESS
}

fn run_show(symbol: &str, args: &SourceArgs) -> ExitCode {
    let config = match open_config(args) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let config_ref = config.as_ref().map(|c| c as &dyn ConfigPort);

    let snapshot = match load_snapshot(args, config_ref) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    match snapshot.get(symbol) {
        Some(record) => {
            print!("{}", render_instrument(record));
            ExitCode::SUCCESS
        }
        None => {
            println!("data not available for {symbol}");
            ExitCode::from(1)
        }
    }
}

/// Action, sentiment and the rule that decided them.
pub fn describe_classification(profile: &RiskProfile) -> String {
    let outcome = action::classify(profile);
    let rule = action::applied_rule(profile)
        .map(|r| r.description)
        .unwrap_or(DEFAULT_RULE_DESCRIPTION);
    format!("{} ({})\nRule: {}\n", outcome, outcome.sentiment(), rule)
}

fn run_classify(profile: RiskProfile) -> ExitCode {
    print!("{}", describe_classification(&profile));
    ExitCode::SUCCESS
}

/// The ordered rule list followed by the action-to-sentiment mapping.
pub fn rules_table() -> String {
    let mut out = String::new();
    for (idx, rule) in ACTION_RULES.iter().enumerate() {
        out.push_str(&format!(
            "{}. {:<11} {}\n",
            idx + 1,
            rule.action.label(),
            rule.description
        ));
    }
    out.push_str(&format!(
        "   {:<11} otherwise ({})\n",
        DEFAULT_ACTION.label(),
        DEFAULT_RULE_DESCRIPTION
    ));
    out.push('\n');
    for action in Action::ALL {
        out.push_str(&format!("{:<11} -> {}\n", action.label(), action.sentiment()));
    }
    out
}

fn run_rules() -> ExitCode {
    match io::stdout().lock().write_all(rules_table().as_bytes()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let err = SignaldashError::from(e);
            eprintln!("error: {err}");
            (&err).into()
        }
    }
}

fn run_fallback(format: OutputFormat) -> ExitCode {
    let snapshot = Snapshot::fallback(fallback_records(), "requested");
    let report = report_for(format, None);
    match report.write_to(&snapshot, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    match validate_config(&config) {
        Ok(()) => {
            println!("{}: OK", config_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}
