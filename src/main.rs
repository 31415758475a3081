use anyhow::Result;
use clap::Parser;
use tracing::info;
use voxchat::{create_router, AppState, Config};

#[derive(Parser, Debug)]
#[command(name = "voxchat", about = "Voice-enabled chat session service")]
struct Args {
    /// Config file path (without extension)
    #[arg(long, default_value = "config/voxchat")]
    config: String,

    /// Override the configured HTTP bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    let bind = args.bind.unwrap_or_else(|| cfg.service.http.bind.clone());
    let port = args.port.unwrap_or(cfg.service.http.port);

    info!("{} v0.1.0", cfg.service.name);
    info!("Inference endpoint: {}", cfg.inference.url);
    info!("Speech backend: {}", cfg.speech.backend);

    let state = AppState::new(cfg);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind((bind.as_str(), port)).await?;
    info!("HTTP server listening on {}:{}", bind, port);

    axum::serve(listener, router).await?;

    Ok(())
}
