use std::{
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, Result};
use chart_service::{
    ChartService, ComputeRequest, DashboardConfig,
    env::{CONFIG_ENV, get_env_var},
    load_config_path,
    logging::init_tracing,
};
use clap::{Args, Parser, Subcommand};
use market_indicators::{ChartKind, list_indicators};
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Chart data computation CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Compute one chart response from a request JSON document.
    Compute {
        #[command(flatten)]
        config: ConfigArg,
        /// Request file, or `-` for stdin.
        #[arg(long, value_name = "FILE", default_value = "-")]
        input: String,
        #[arg(long)]
        pretty: bool,
    },
    /// Print chart metadata and parameter schemas.
    Schema {
        #[arg(long, value_name = "ID")]
        indicator: Option<String>,
    },
    /// Print the normalized dashboard config.
    Config {
        #[command(flatten)]
        config: ConfigArg,
    },
}

#[derive(Args)]
struct ConfigArg {
    /// Dashboard TOML; falls back to $CHART_CONFIG, then built-in defaults.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl ConfigArg {
    fn load(&self) -> Result<DashboardConfig> {
        let path = match &self.config {
            Some(path) => Some(path.clone()),
            None => get_env_var(CONFIG_ENV).ok().map(PathBuf::from),
        };
        match path {
            Some(path) => load_config_path(&path),
            None => {
                info!("no dashboard config given, using defaults");
                Ok(DashboardConfig::default())
            }
        }
    }
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("read request from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("read request {input}"))
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn main() -> Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Compute {
            config,
            input,
            pretty,
        } => {
            let service = ChartService::new(config.load()?);
            let text = read_input(&input)?;
            let req: ComputeRequest = serde_json::from_str(&text).context("failed to parse request JSON")?;
            let response = service.handle(&req)?;
            print_json(&response, pretty)?;
        }
        Cmd::Schema { indicator } => match indicator {
            Some(id) => {
                let kind: ChartKind = id.parse()?;
                print_json(&kind.metadata(), true)?;
            }
            None => print_json(&list_indicators(), true)?,
        },
        Cmd::Config { config } => {
            print_json(&config.load()?, true)?;
        }
    }

    Ok(())
}
