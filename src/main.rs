// src/main.rs

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use mvx_mcp_server::{
    config::Config,
    mcp::{
        handler::handle_mcp_request,
        protocol::{error_codes, Request, Response},
        registry::ToolRegistry,
    },
    network::Endpoints,
    tools, AppState,
};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
struct ServerState {
    app: AppState,
    registry: Arc<ToolRegistry>,
}

// --- HTTP Server Logic ---
async fn run_http_server(state: ServerState) {
    let api_router = Router::new()
        .route("/health", get(health_handler))
        // JSON-RPC endpoint for MCP tool calls
        .route("/rpc", post(rpc_handler));

    let app = Router::new()
        .nest("/api", api_router)
        .with_state(state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([127, 0, 0, 1], state.app.config.port));
    info!("🚀 HTTP Server listening on {}", addr);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("HTTP server terminated: {}", e);
    }
}

async fn health_handler(State(state): State<ServerState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "network": state.app.config.network.name(),
    }))
}

// Forward JSON-RPC requests over HTTP to the MCP handler
async fn rpc_handler(State(state): State<ServerState>, Json(req): Json<Request>) -> Json<Response> {
    match handle_mcp_request(req, state.app.clone(), &state.registry).await {
        Some(resp) => Json(resp),
        None => Json(Response::error(
            serde_json::Value::Null,
            error_codes::INVALID_REQUEST,
            "Notifications are not supported over HTTP".into(),
        )),
    }
}

// --- MCP Server Logic ---
async fn run_mcp_server(state: ServerState) {
    info!("🚀 Starting MCP server on stdin/stdout...");

    let mut stdin = io::BufReader::new(io::stdin());
    let mut stdout = io::stdout();

    loop {
        let mut line = String::new();

        match stdin.read_line(&mut line).await {
            Ok(0) => {
                info!("EOF received, shutting down MCP server");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                debug!("Received: {}", line);

                let response = match serde_json::from_str::<Request>(line) {
                    Ok(request) => {
                        handle_mcp_request(request, state.app.clone(), &state.registry).await
                    }
                    Err(parse_error) => {
                        error!("JSON parse error: {}", parse_error);
                        Some(Response::error(
                            serde_json::Value::Null,
                            error_codes::PARSE_ERROR,
                            format!("Parse error: {}", parse_error),
                        ))
                    }
                };

                if let Some(response) = response {
                    if let Ok(response_json) = serde_json::to_string(&response) {
                        debug!("Sending: {}", response_json);
                        if let Err(e) = stdout
                            .write_all(format!("{}\n", response_json).as_bytes())
                            .await
                        {
                            error!("Failed to write response: {}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from stdin: {}", e);
                break;
            }
        }
    }

    info!("MCP server shutting down");
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mvx_mcp_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("❌ Failed to load configuration: {}", e);
            return;
        }
    };

    let endpoints = Endpoints::for_network(config.network);
    info!("Using {} ({})", config.network, endpoints.api_url);

    let mut registry = ToolRegistry::new();
    if let Err(e) = tools::register_all(&mut registry) {
        error!("❌ Failed to register tools: {}", e);
        return;
    }

    let state = ServerState {
        app: AppState {
            config: Arc::new(config),
            endpoints: Arc::new(endpoints),
        },
        registry: Arc::new(registry),
    };

    // Check if running in MCP mode (stdin/stdout) or HTTP server mode
    let args: Vec<String> = env::args().collect();
    if args.contains(&"--mcp".to_string()) || env::var("MCP_MODE").is_ok() {
        run_mcp_server(state).await;
    } else {
        run_http_server(state).await;
    }
}
