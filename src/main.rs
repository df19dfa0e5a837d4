use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};

use medibuddy_chat::app_state::AppState;
use medibuddy_chat::database::init::init_db;
use medibuddy_chat::repositories::{AppointmentRepository, MessageRepository};
use medibuddy_chat::routes::app_routes::create_router;
use medibuddy_chat::services::conversation_service::ConversationService;
use medibuddy_chat::services::jwt_service::AuthKeys;
use medibuddy_chat::storage::DiskObjectStorage;

const DEFAULT_PORT: u16 = 4000;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medibuddy_chat=info,tower_http=info".into()),
        )
        .init();

    let db = match init_db().await {
        Ok(db) => db,
        Err(e) => {
            error!("Error initializing the database: {}", e);
            return;
        }
    };
    let db = Arc::new(db);

    let keys = match AuthKeys::from_env() {
        Ok(keys) => keys,
        Err(e) => {
            error!("Error loading auth keys: {}", e);
            return;
        }
    };

    let storage = match DiskObjectStorage::from_env() {
        Ok(storage) => storage,
        Err(e) => {
            error!("Error preparing upload storage: {}", e);
            return;
        }
    };
    let uploads_dir = storage.root().to_path_buf();

    let service = ConversationService::new(
        MessageRepository::new(Arc::clone(&db)),
        AppointmentRepository::new(Arc::clone(&db)),
        storage,
    );
    let app = create_router(AppState::new(service), keys, Some(uploads_dir));

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server running on http://{}", addr);

    if let Err(e) = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
    }
}

// Resolves once a termination signal arrives, letting in-flight requests
// finish before the server exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Signal received, starting graceful shutdown");
}
