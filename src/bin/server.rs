use std::{fs::OpenOptions, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use balance_viewer::{
    AppState, DEFAULT_ZOOM_COOLDOWN, RpcClient, build_router, graceful_shutdown, logging_middleware,
};

/// The web server for the balance viewer dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the balance backend, e.g. "http://localhost:3000".
    #[arg(long, env = "BALANCE_RPC_URL", default_value = "http://localhost:3000")]
    rpc_url: String,

    /// The port to serve the dashboard from.
    #[arg(short, long, env = "BALANCE_VIEWER_PORT", default_value_t = 8080)]
    port: u16,

    /// How long a chart ignores further zooms after accepting one, in milliseconds.
    #[arg(long, env = "ZOOM_COOLDOWN_MS", default_value_t = DEFAULT_ZOOM_COOLDOWN.as_millis() as u64)]
    zoom_cooldown_ms: u64,

    /// Timeout for each call to the balance backend, in seconds.
    #[arg(long, env = "RPC_TIMEOUT_SECS", default_value_t = 10)]
    rpc_timeout_secs: u64,

    /// File that debug level logs are appended to.
    #[arg(long, env = "LOG_PATH", default_value = "debug.log")]
    log_path: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(&args.log_path);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let client = match RpcClient::new(&args.rpc_url, Duration::from_secs(args.rpc_timeout_secs)) {
        Ok(client) => client,
        Err(error) => {
            tracing::error!("Could not create the RPC client for {}: {error}", args.rpc_url);
            return;
        }
    };
    let state = AppState::new(
        Arc::new(client),
        Duration::from_millis(args.zoom_cooldown_ms),
    );

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!(
        "HTTP server listening on {addr}, reading balances from {}",
        args.rpc_url
    );
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
    }
}

fn setup_logging(log_path: &str) {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged by the handlers, so 5xx responses are not logged again here.
        .on_failure(());

    router.layer(tracing_layer)
}
