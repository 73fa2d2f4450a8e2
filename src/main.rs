use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser};
use solvestat::{
    config::{Config, ConfigStore, FileConfigStore, OutputFormat},
    ingest::{self, Dataset},
    report::{self, Report},
};
use std::{error::Error, io, path::PathBuf};
use tracing_subscriber::EnvFilter;

/// speedcubing session analytics from csTimer exports
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Reads a csTimer JSON export and reports PBs, trimmed averages (ao5/ao12/ao100), trend lines, improvement rate and projected solves to your next milestone."
)]
pub struct Cli {
    /// csTimer export to analyse
    file: PathBuf,

    /// restrict statistics to a single session number
    #[clap(short = 's', long)]
    session: Option<u32>,

    /// output format [default: from config, else text]
    #[clap(short = 'f', long, value_enum)]
    format: Option<OutputFormat>,

    /// include the chart series of the selected session
    #[clap(short = 'c', long)]
    chart: bool,

    /// number of recent solves to list in text output
    #[clap(short = 'r', long)]
    recent: Option<usize>,

    /// read and write configuration at this path
    #[clap(long)]
    config: Option<PathBuf>,

    /// store the effective options as the new defaults
    #[clap(long)]
    save_config: bool,

    /// log more (-v debug, -vv trace); RUST_LOG takes precedence
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Flags given on the command line win over stored defaults.
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(format) = self.format {
            cfg.format = format;
        }
        if let Some(recent) = self.recent {
            cfg.recent_rows = recent;
        }
        if self.chart {
            cfg.show_chart = true;
        }
        cfg
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        tracing::debug!(path = %store.path().display(), "saved config");
    }

    let dataset = match ingest::parse_file(&cli.file) {
        Ok(sessions) => Dataset::new(sessions),
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::Io, err).exit();
        }
    };

    if let Some(id) = cli.session {
        if dataset.session(id).is_none() {
            let mut cmd = Cli::command();
            cmd.error(
                ErrorKind::InvalidValue,
                format!("no session {id} with solves in {}", cli.file.display()),
            )
            .exit();
        }
    }

    let with_chart = config.show_chart || config.format == OutputFormat::Csv;
    let now = Local::now();
    let Some(report) = Report::build(dataset.sessions(), cli.session, &now, with_chart) else {
        return Ok(());
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match config.format {
        OutputFormat::Text => report::write_text(&report, &config, &mut out)?,
        OutputFormat::Json => report::write_json(&report, &mut out)?,
        OutputFormat::Csv => match &report.chart {
            Some(chart) => report::write_chart_csv(chart, &mut out)?,
            None => {
                let mut cmd = Cli::command();
                cmd.error(
                    ErrorKind::MissingRequiredArgument,
                    "csv output needs --session pointing at a session with at least two valid solves",
                )
                .exit();
            }
        },
    }
    Ok(())
}
