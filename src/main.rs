//! Smart-meter exporter binary
//!
//! Serves the readings of a smart-meter gateway as Prometheus metrics.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use smartmeter_exporter::{
    start_web_server, AppState, ExporterMetrics, GatewayClient, GatewayConfig,
    GatewayStatsSource, Stats, StatsSource, WebConfig, DEFAULT_WEB_PORT,
};
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "smartmeter_exporter")]
#[command(about = "Prometheus exporter for smart-meter gateway readings")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    long_about = "Polls the gateway named by SGPE_HOST on every scrape and exposes its readings on /metrics"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Web server bind address
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Web server port
    #[arg(short, long, default_value_t = DEFAULT_WEB_PORT)]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the exporter (default)
    Serve(ServeArgs),

    /// Read the gateway once, print the converted values and exit
    Snapshot(SnapshotArgs),

    /// Show the resolved configuration
    Info,
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Disable CORS headers
    #[arg(long)]
    no_cors: bool,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format: json, metrics, or pretty
    #[arg(short, long, default_value = "pretty")]
    format: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let result = match &cli.command {
        Some(Commands::Serve(args)) => serve_command(&cli, args).await,
        Some(Commands::Snapshot(args)) => snapshot_command(args).await,
        Some(Commands::Info) => info_command(&cli),
        None => serve_command(&cli, &ServeArgs::default()).await,
    };

    if let Err(e) = &result {
        error!("💥 {:#}", e);
    }
    result
}

fn log_level(cli: &Cli) -> Level {
    if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

/// Filter used when `RUST_LOG` is not set.
fn default_filter(cli: &Cli) -> EnvFilter {
    EnvFilter::new(log_level(cli).to_string().to_lowercase())
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    // RUST_LOG wins over the verbosity flags when present.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(cli));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    Ok(())
}

async fn serve_command(cli: &Cli, args: &ServeArgs) -> anyhow::Result<()> {
    let gateway = GatewayConfig::from_env()?;
    let client = GatewayClient::new(&gateway)?;
    info!("Gateway endpoint: {}", client.url());

    let metrics = ExporterMetrics::new().context("failed to create metrics registry")?;
    let state = AppState::new(
        Arc::new(GatewayStatsSource::new(client)),
        Arc::new(metrics),
    );

    let web_config = WebConfig::new(&cli.host, cli.port).with_cors(!args.no_cors);

    info!("Web server configuration:");
    info!("  - Bind address: {}", web_config.bind_address());
    info!("  - CORS enabled: {}", web_config.enable_cors);
    info!("  - Gateway timeout: {}s", gateway.timeout.as_secs());
    info!("⚙️ Exporter is ready to accept requests");

    start_web_server(web_config, state).await?;

    Ok(())
}

async fn snapshot_command(args: &SnapshotArgs) -> anyhow::Result<()> {
    let source = GatewayStatsSource::new(GatewayClient::from_env()?);
    let stats = source
        .current_stats()
        .await
        .with_context(|| format!("failed to read {}", source.client().url()))?;

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
        "metrics" => print!("{}", ExporterMetrics::new()?.render(&stats)?),
        "pretty" => print_pretty_stats(&stats),
        other => anyhow::bail!(
            "Unsupported format: {}. Use 'json', 'metrics' or 'pretty'",
            other
        ),
    }

    Ok(())
}

fn info_command(cli: &Cli) -> anyhow::Result<()> {
    println!("Smart-meter exporter {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Web server:");
    println!("  Bind address: {}:{}", cli.host, cli.port);
    println!();

    println!("Gateway:");
    match GatewayConfig::from_env() {
        Ok(gateway) => {
            println!("  URL: {}", gateway.api_url());
            println!("  Timeout: {}s", gateway.timeout.as_secs());
        }
        Err(e) => println!("  {}", e),
    }

    Ok(())
}

fn print_pretty_stats(stats: &Stats) {
    println!("⚡ Gateway reading ({})", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    println!("==========================================");
    println!();

    println!("Firmware:");
    println!("  Running: {}", stats.firmware.running);
    println!("  Available: {}", stats.firmware.available);
    println!("  Update available: {}", stats.firmware.update_available);
    println!();

    println!("Gas:");
    println!("  Consumed: {:.3} m³", stats.gas.consumed);
    println!("  This hour: {:.3} m³", stats.gas.consumed_hour);
    println!();

    let power = &stats.power;
    println!("Power:");
    println!("  Tariff: {}", power.tariff);
    println!(
        "  Tariff 1: {:.3} consumed, {:.3} produced",
        power.consumed_tariff1, power.produced_tariff1
    );
    println!(
        "  Tariff 2: {:.3} consumed, {:.3} produced",
        power.consumed_tariff2, power.produced_tariff2
    );
    println!(
        "  Now: {} consumed, {} produced (net {})",
        power.consumed_total, power.produced_total, power.consumed_net
    );
    println!("  This hour: {}", power.consumed_hour);
    for (i, phase) in ["L1", "L2", "L3"].iter().enumerate() {
        println!(
            "  {}: {} V, {} A, {} consumed, {} produced",
            phase,
            power.voltage_phases()[i],
            power.current_phases()[i],
            power.consumed_phases()[i],
            power.produced_phases()[i]
        );
    }
}
