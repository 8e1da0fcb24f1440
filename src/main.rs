use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use storycard::api;
use storycard::assets::AssetLoader;
use storycard::models::{AppConfig, CardRequest};
use storycard::server;
use storycard::services::{CardService, DirectorySink, StaticOrigin};

#[derive(Parser)]
#[command(name = "storycard")]
#[command(about = "Render experience listings as shareable 1080x1920 story cards")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Render a card directly to a PNG file
    Render(RenderArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// JSON file holding the card request (camelCase fields)
    #[arg(short, long, conflicts_with_all = ["title", "category", "duration", "location_type", "description", "background"])]
    input: Option<PathBuf>,

    /// Experience title
    #[arg(short, long, required_unless_present = "input")]
    title: Option<String>,

    /// Category label
    #[arg(short, long, default_value = "")]
    category: String,

    /// Duration label, e.g. "2 Hours"
    #[arg(short, long, default_value = "")]
    duration: String,

    /// Location label, e.g. "Virtual"
    #[arg(short, long, default_value = "")]
    location_type: String,

    /// Description text
    #[arg(long, default_value = "")]
    description: String,

    /// Background image URL (http, https or data:)
    #[arg(short, long)]
    background: Option<String>,

    /// Directory the card is written to
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Hostname shown in the call-to-action (default: origin_host from config)
    #[arg(long)]
    host: Option<String>,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Storycard API",
        description = "Render experience listings as shareable story cards",
        version = "0.3.0",
        license(name = "MIT")
    ),
    paths(api::handle_card, api::handle_preview),
    components(schemas(CardRequest, api::CardErrorResponse)),
    tags((name = "Card", description = "Story card rendering"))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Render(args)) => run_render_command(args).await,
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Render a card directly to a PNG file (no server needed)
async fn run_render_command(args: RenderArgs) -> anyhow::Result<()> {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storycard=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let request = match &args.input {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
            serde_json::from_str::<CardRequest>(&json)
                .map_err(|e| anyhow::anyhow!("Invalid card request in {}: {e}", path.display()))?
        }
        None => CardRequest {
            title: args.title.clone().unwrap_or_default(),
            category: args.category.clone(),
            duration: args.duration.clone(),
            location_type: args.location_type.clone(),
            description: args.description.clone(),
            background_image_url: args.background.clone(),
        },
    };

    let asset_loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&asset_loader);
    let service = CardService::from_config(&asset_loader, &config)?;
    let origin = StaticOrigin::new(args.host.unwrap_or(config.origin_host));
    let sink = DirectorySink::new(&args.output);

    let card = service.share(&request, &origin, &sink).await?;

    println!(
        "Rendered {} ({} bytes)",
        sink.path_for(&card.filename).display(),
        card.png_bytes.len()
    );

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    use storycard::assets::AssetCategory;

    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let fonts_dir = std::env::var("FONTS_DIR").ok();

    println!("Storycard v{VERSION}");
    println!("Shareable story cards for experience listings\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  FONTS_DIR   = {}",
        fonts_dir.as_deref().unwrap_or("(not set)")
    );

    println!("\nAsset Sources:");

    let loader = AssetLoader::new(
        fonts_dir.clone().map(PathBuf::from),
        config_file.clone().map(PathBuf::from),
    );

    let config_source = match config_file {
        Some(ref path) if PathBuf::from(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:    {config_source}");

    let templates = AssetLoader::list_embedded(AssetCategory::Templates);
    println!("  Templates: embedded ({})", templates.join(", "));

    let fonts_count = loader.get_fonts().len();
    match fonts_dir {
        Some(ref path) if PathBuf::from(path).exists() => {
            println!("  Fonts:     {path} ({fonts_count}) + system fonts")
        }
        _ => println!("  Fonts:     system fonts"),
    }

    println!("\nCommands:");
    println!("  storycard serve    Start the HTTP server");
    println!("  storycard render   Render a card to a PNG file");
    println!("\nRun 'storycard --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storycard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let asset_loader = Arc::new(AssetLoader::from_env());

    tracing::info!(
        fonts = ?asset_loader.fonts_dir().map(|p| p.display().to_string()).unwrap_or_else(|| "system".to_string()),
        config = ?asset_loader.config_file().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        "Asset sources configured"
    );

    let state = server::create_app_state(asset_loader)?;

    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Storycard server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
