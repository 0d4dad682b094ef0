use anyhow::{Context, Result};
use bankparse_core::Parser as StatementParser;
use bankparse_ingest::{BankCsvParser, BankRawTableParser};
use clap::{ArgAction, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod output;
mod state;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BANKPARSE_BUILD_SHA"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "bankparse",
    version,
    long_version = LONG_VERSION,
    about = "Normalize bank transaction exports into date,payee,memo,amount CSV"
)]
struct Cli {
    /// Config file (default: ~/.config/bankparse/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a bank's transaction history
    Parse {
        #[command(subcommand)]
        format: ParseCommand,
    },

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ParseCommand {
    /// Debit card transaction history exported as CSV
    #[command(alias = "dbs-csv")]
    BankCsv {
        /// Exported CSV file
        file: PathBuf,

        /// Write rows here instead of the configured output (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Credit card statement copied from the HTML table to the clipboard
    ///
    /// Card statements have no CSV download; paste the table into a file
    /// (tab-separated date, payee, amount) and parse that.
    #[command(alias = "dbs-raw-table")]
    BankRawTable {
        /// Pasted table file
        file: PathBuf,

        /// Write rows here instead of the configured output (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file if none exists
    Init,

    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Parse { format } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let tz = cfg.source_tz()?;

            let (parser, file, output): (Box<dyn StatementParser>, _, _) = match format {
                ParseCommand::BankCsv { file, output } => {
                    (Box::new(BankCsvParser::with_timezone(tz)), file, output)
                }
                ParseCommand::BankRawTable { file, output } => {
                    (Box::new(BankRawTableParser::with_timezone(tz)), file, output)
                }
            };

            run_parse(parser.as_ref(), &file, output.or(cfg.output_file))?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                let path = match cli.config {
                    Some(p) => p,
                    None => config::config_path()?,
                };
                if config::init_config(&path)? {
                    println!("Wrote {}", path.display());
                } else {
                    println!("Config already exists: {}", path.display());
                }
            }
            ConfigCommand::Show => {
                let cfg = config::load_config(cli.config.as_deref())?;
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Parse `input` completely, then write the rows. Nothing is written if any
/// row fails.
fn run_parse(parser: &dyn StatementParser, input: &Path, dest: Option<PathBuf>) -> Result<()> {
    let rows = {
        let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
        let mut reader = BufReader::new(file);
        parser
            .parse(&mut reader)
            .with_context(|| format!("parsing {}", input.display()))?
    };
    info!(
        parser = parser.name(),
        rows = rows.len(),
        input = %input.display(),
        "parsed statement"
    );

    match dest {
        Some(path) => {
            let file =
                File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            output::write_rows(&rows, BufWriter::new(file))
                .with_context(|| format!("writing {}", path.display()))?;
            info!(output = %path.display(), "wrote rows");
        }
        None => output::write_rows(&rows, io::stdout().lock())?,
    }

    Ok(())
}
