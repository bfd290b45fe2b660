mod chat;
mod config;
mod errors;
mod llm_client;
mod logs;
mod models;
mod routes;
mod state;
mod summary;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::summary::generator::SummaryGenerator;
use crate::summary::sanitize::IdentitySanitizer;
use crate::summary::templates::TemplateId;

#[derive(Parser)]
#[command(name = "discharge", version)]
#[command(about = "Generate professional discharge summaries from patient data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API consumed by the web UI
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate one discharge summary from a patient data file
    Generate {
        /// Input patient JSON file
        #[arg(long)]
        input: PathBuf,
        /// Output text file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
        /// Template to use
        #[arg(long, default_value = "general")]
        template: String,
        /// Model override (overrides LLM_MODEL)
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first, then explicit CLI overrides, then logging: the file
    // layer's directory and level both come from the resolved config.
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            logs::setup_logging(&config.logs_dir, &config.log_level)?;
            serve(config).await
        }
        Commands::Generate {
            input,
            output,
            template,
            model,
        } => {
            if let Some(model) = model {
                config.model = model;
            }
            logs::setup_logging(&config.logs_dir, &config.log_level)?;
            generate(config, &input, output.as_deref(), &template).await
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting discharge API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(&config);
    info!("LLM client initialized (model: {})", llm.model());

    let generator = Arc::new(SummaryGenerator::new(
        llm.clone(),
        Arc::new(IdentitySanitizer),
    ));

    let state = AppState {
        llm,
        generator,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn generate(
    config: Config,
    input: &Path,
    output: Option<&Path>,
    template: &str,
) -> Result<()> {
    info!(
        "CLI generation mode: {} -> {}",
        input.display(),
        output.map_or_else(|| "stdout".to_string(), |p| p.display().to_string())
    );

    let template_id: TemplateId = template.parse()?;

    let llm = LlmClient::new(&config);
    let generator = SummaryGenerator::new(llm, Arc::new(IdentitySanitizer));
    let generated = generator
        .generate_from_file(input, Some(template_id))
        .await?;

    match output {
        Some(path) => {
            std::fs::write(path, &generated.summary)
                .with_context(|| format!("Failed to write summary to {}", path.display()))?;
            info!("Summary written to {}", path.display());
        }
        None => println!("{}", generated.summary),
    }

    Ok(())
}
