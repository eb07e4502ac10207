//! CEP weather gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client                input service              weather service
//!   ──────  POST /cep  ─▶ ┌───────────────┐  GET /?cep ┌────────────────┐
//!                         │ validate CEP  │──────────▶ │ resolver       │──▶ ViaCEP
//!   ◀──── relayed answer  │ relay answer  │ ◀───────── │  + deadline    │──▶ WeatherAPI
//!                         └───────────────┘            └────────────────┘
//!
//!   Cross-cutting: config, request ids, tracing (W3C context on every hop),
//!   metrics, graceful shutdown
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cep_weather::config::load_or_default;
use cep_weather::lifecycle;
use cep_weather::ServiceRole;

#[derive(Parser)]
#[command(name = "cep-weather")]
#[command(about = "CEP to temperature gateway", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the input service (POST /cep)
    Input,
    /// Run the weather service (GET /?cep=)
    Weather,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let role = match cli.command {
        Commands::Input => ServiceRole::Input,
        Commands::Weather => ServiceRole::Weather,
    };

    let config = load_or_default(cli.config.as_deref())?;
    lifecycle::run(role, config).await?;
    Ok(())
}
