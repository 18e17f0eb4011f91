//! `fb-server` binary — load configuration, build the city, serve forever.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fb_server::{seed, CommandProcessor, ConnectionOptions, ConnectionServer, ServerConfig};
use fb_spatial::DijkstraRouter;

#[derive(Parser, Debug)]
#[command(name = "fb-server", version, about = "Fire-brigade dispatch server")]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind (overrides `listen.bind`).
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides `listen.port`).
    #[arg(short, long)]
    port: Option<u16>,

    /// Road network CSV with a `from,to,weight` header (overrides `network.roads_csv`).
    #[arg(long)]
    roads: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FB_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "fb_server=debug,info"
        } else {
            "fb_server=info,warn"
        })
    });

    let format = env::var("FB_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => registry.with(fmt::layer().json().with_ansi(false)).init(),
        _ => registry.with(fmt::layer().compact()).init(),
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listen.bind = bind;
    }
    if let Some(port) = cli.port {
        config.listen.port = port;
    }
    if let Some(roads) = cli.roads {
        config.network.roads_csv = Some(roads);
    }

    let graph = config.network.build_graph().context("building road network")?;
    let processor = CommandProcessor::new(graph, seed::city_stations(), DijkstraRouter)
        .context("placing stations on the road network")?;
    info!(
        vertices = processor.graph().vertex_count(),
        roads = processor.graph().road_count(),
        stations = processor.stations().len(),
        "road network ready"
    );

    let server = ConnectionServer::bind(
        config.listen.addr(),
        Arc::new(processor),
        ConnectionOptions::from(&config.listen),
    )
    .with_context(|| format!("binding {}", config.listen.addr()))?;

    info!(addr = %server.local_addr()?, "fire-brigade server listening");
    server.run()?;
    Ok(())
}
