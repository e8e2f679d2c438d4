use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio_util::sync::CancellationToken;

use calculator::{CalculatorConfig, MODULE_NAME};
use calculator_bootstrap::{AppConfig, CliArgs};
use calculator_sdk::{CalculatorClientV1, CalculatorGrpcClient, GrpcClientConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8088";

/// Calculator Server - arithmetic over gRPC and Connect
#[derive(Parser)]
#[command(name = "calculator-server")]
#[command(about = "Calculator Server - arithmetic over gRPC and Connect")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for the calculator listener (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
    /// Call a running server over gRPC and print the result
    #[command(allow_negative_numbers = true)]
    Calc {
        operand1: f64,
        /// One of + - * /
        operator: String,
        operand2: f64,
        /// Server URI
        #[arg(long, default_value = DEFAULT_ENDPOINT)]
        endpoint: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.clone(),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // defaults -> YAML (if provided) -> env (APP__*) -> CLI overrides
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);
    if let Some(port) = cli.port {
        override_port(&mut config, port)?;
    }

    calculator_bootstrap::init_logging(&config.logging)?;

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(&config).await,
        Commands::Check => check_config(&config),
        Commands::Calc {
            operand1,
            operator,
            operand2,
            endpoint,
        } => calc(&endpoint, operand1, operand2, &operator).await,
    }
}

fn calculator_config(config: &AppConfig) -> Result<CalculatorConfig> {
    config.module_config(MODULE_NAME)
}

/// Replace the port of `modules.calculator.bind_addr`, keeping its host.
fn override_port(config: &mut AppConfig, port: u16) -> Result<()> {
    let mut calc_cfg = calculator_config(config)?;
    calc_cfg.bind_addr = with_port(&calc_cfg.bind_addr, port)?;
    config.set_module_config(MODULE_NAME, &calc_cfg)
}

fn with_port(bind_addr: &str, port: u16) -> Result<String> {
    let mut addr: SocketAddr = bind_addr
        .parse()
        .with_context(|| format!("invalid bind_addr '{bind_addr}'"))?;
    addr.set_port(port);
    Ok(addr.to_string())
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    let calc_cfg = calculator_config(config)?;
    calculator::parse_bind_address(&calc_cfg.bind_addr)?;
    calculator::cors::build_cors_layer(&calc_cfg)?;

    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn run_server(config: &AppConfig) -> Result<()> {
    let calc_cfg = calculator_config(config)?;
    tracing::info!(bind_addr = %calc_cfg.bind_addr, "Calculator Server starting");

    let cancel = CancellationToken::new();
    let signals = calculator_bootstrap::cancel_on_shutdown(cancel.clone());

    let result = calculator::serve(&calc_cfg, cancel).await;
    signals.abort();

    tracing::info!("Calculator Server stopped");
    result
}

async fn calc(endpoint: &str, operand1: f64, operand2: f64, operator: &str) -> Result<()> {
    let client = CalculatorGrpcClient::connect(endpoint, &GrpcClientConfig::default())
        .await
        .with_context(|| format!("failed to connect to {endpoint}"))?;

    let result = client
        .calculate(operand1, operand2, operator)
        .await
        .with_context(|| format!("{operand1} {operator} {operand2}"))?;

    println!("{result}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_override_keeps_host() {
        assert_eq!(with_port("0.0.0.0:8088", 9000).unwrap(), "0.0.0.0:9000");
        assert_eq!(with_port("[::1]:8088", 1).unwrap(), "[::1]:1");
        assert!(with_port("localhost:8088", 1).is_err());
    }

    #[test]
    fn port_override_creates_module_section() {
        let mut config = AppConfig::default();
        override_port(&mut config, 7001).unwrap();

        let calc_cfg = calculator_config(&config).unwrap();
        assert_eq!(calc_cfg.bind_addr, "0.0.0.0:7001");
        assert!(calc_cfg.cors_enabled);
    }

    #[test]
    fn calc_accepts_negative_operands() {
        let cli = Cli::try_parse_from(["calculator-server", "calc", "-3", "-", "-2.5"]).unwrap();
        match cli.command {
            Some(Commands::Calc {
                operand1,
                operator,
                operand2,
                endpoint,
            }) => {
                assert!((operand1 + 3.0).abs() < f64::EPSILON);
                assert_eq!(operator, "-");
                assert!((operand2 + 2.5).abs() < f64::EPSILON);
                assert_eq!(endpoint, DEFAULT_ENDPOINT);
            }
            _ => panic!("expected calc subcommand"),
        }
    }
}
