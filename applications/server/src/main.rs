/// Top 100 Server - playlist editor, public view, and votes
use clap::{Parser, Subcommand};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use top100_catalog::CatalogClient;
use top100_core::{StorageContext, UserId};
use top100_server::{config::ServerConfig, create_router, state::AppState, SessionService};
use top100_storage::LocalStorageContext;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "top100-server")]
#[command(about = "Top 100 tracks server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// List all users
    ListUsers,
    /// Print a user's saved playlist
    ShowPlaylist {
        /// Provider account id of the owner
        user_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "top100_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::ListUsers => list_users(&config).await?,
        Commands::ShowPlaylist { user_id } => show_playlist(&config, user_id).await?,
    }

    Ok(())
}

async fn open_storage(config: &ServerConfig) -> anyhow::Result<LocalStorageContext> {
    let pool = top100_storage::open(&config.storage.database_url).await?;
    Ok(LocalStorageContext::new(pool))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Top 100 server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let db: Arc<dyn StorageContext> = Arc::new(open_storage(&config).await?);
    tracing::info!("Database connected");

    let sessions = Arc::new(SessionService::new(
        config.auth.session_secret.clone(),
        config.auth.session_expiration_hours,
    ));

    let catalog = Arc::new(CatalogClient::new(config.catalog_config())?);
    tracing::info!("Catalog client ready (callback {})", config.redirect_uri());

    let app = create_router(AppState::new(db, sessions, catalog));

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn list_users(config: &ServerConfig) -> anyhow::Result<()> {
    let storage = open_storage(config).await?;
    let users = storage.get_all_users().await?;

    println!("Users:");
    for user in users {
        println!(
            "  {} - {}",
            user.id,
            user.display_name.as_deref().unwrap_or("(no name)")
        );
    }

    Ok(())
}

async fn show_playlist(config: &ServerConfig, user_id: String) -> anyhow::Result<()> {
    let storage = open_storage(config).await?;
    let user_id = UserId::new(user_id);

    let Some(playlist) = storage.get_public_playlist(&user_id).await? else {
        println!("No playlist saved for {}", user_id);
        return Ok(());
    };

    println!(
        "{} ({} tracks, updated {})",
        playlist.playlist.title,
        playlist.tracks.len(),
        playlist.playlist.updated_at
    );
    for entry in playlist.tracks {
        println!(
            "  {:>3}. {} - {}",
            entry.position + 1,
            entry.track.name,
            entry.track.artist
        );
    }

    Ok(())
}
