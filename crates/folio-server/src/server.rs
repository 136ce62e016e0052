//! Development server implementation.

use std::borrow::Cow;
use std::fmt::Display;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use percent_encoding::percent_decode_str;
use tokio::sync::RwLock;
use tower_http::services::ServeFile;

use folio_content::{load_collection, CollectionError, ContentSource};
use folio_icons::IconResolver;
use folio_static::{stylesheet_url, AssetPipeline, RenderOptions, SiteRenderer};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{reload_client_script, ReloadHub, ReloadMessage};

const RELOAD_SOCKET_PATH: &str = "/__hmr";
const RELOAD_SCRIPT_PATH: &str = "/__hmr.js";

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Directory containing docs
    pub docs_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// URL prefix of documentation pages
    pub base_url: String,

    /// Paths to extra CSS stylesheets
    pub styles: Vec<String>,

    /// Site title and landing page content
    pub render: RenderOptions,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
            base_url: "/docs".to_string(),
            styles: vec![],
            render: RenderOptions::default(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("File watch error: {0}")]
    WatchError(String),

    #[error("Failed to load content: {0}")]
    ContentError(#[from] CollectionError),
}

/// Shared server state.
struct ServerState {
    config: DevServerConfig,
    reload_hub: ReloadHub,
    renderer: SiteRenderer,
    resolver: IconResolver,
    source: RwLock<ContentSource>,
}

impl ServerState {
    /// Load the docs directory and prepare the renderer.
    fn load(config: DevServerConfig) -> Result<Self, ServerError> {
        let resolver = IconResolver::builtin();
        let collection = load_collection(&config.docs_dir)?;
        let source = ContentSource::new(&config.base_url, collection, resolver.clone());
        tracing::info!("Loaded {} pages from {}", source.len(), config.docs_dir.display());

        let mut options = config.render.clone();
        options.styles = config.styles.iter().map(|s| stylesheet_url(s)).collect();
        options.scripts.push(RELOAD_SCRIPT_PATH.to_string());

        Ok(Self {
            renderer: SiteRenderer::new(options),
            reload_hub: ReloadHub::new(),
            source: RwLock::new(source),
            resolver,
            config,
        })
    }

    /// Rebuild the content source from disk and swap it in.
    ///
    /// On failure the previous source stays in place.
    async fn reload(&self) -> Result<usize, CollectionError> {
        let collection = load_collection(&self.config.docs_dir)?;
        let source = ContentSource::new(&self.config.base_url, collection, self.resolver.clone());
        let pages = source.len();

        *self.source.write().await = source;
        Ok(pages)
    }
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(config: DevServerConfig) -> Self {
        Self { config }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let address = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = address
            .parse()
            .map_err(|_| ServerError::InvalidAddress(address))?;

        let state = Arc::new(ServerState::load(self.config.clone())?);

        let mut watch_paths = vec![self.config.docs_dir.clone()];
        watch_paths.extend(self.config.styles.iter().map(PathBuf::from));

        let (watcher, mut rx) =
            FileWatcher::new(&watch_paths).map_err(|e| ServerError::WatchError(e.to_string()))?;

        let watch_state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(batch) = rx.recv().await {
                handle_watch_events(&watch_state, &batch).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = router(state);

        tracing::info!("Starting dev server at http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Build the application router.
fn router(state: Arc<ServerState>) -> Router {
    let mut app = Router::new()
        .route("/", get(home_handler))
        .route(RELOAD_SOCKET_PATH, get(ws_handler))
        .route(RELOAD_SCRIPT_PATH, get(reload_script_handler))
        .route("/assets/main.css", get(css_handler))
        .route("/assets/main.js", get(js_handler));

    for style in &state.config.styles {
        app = app.route_service(&stylesheet_url(style), ServeFile::new(style));
    }

    app.fallback(get(page_handler)).with_state(state)
}

/// Handle one batch of file watch events with at most one content reload.
async fn handle_watch_events(state: &ServerState, batch: &[WatchEvent]) {
    if batch.is_empty() {
        return;
    }

    let changed: Vec<String> = batch
        .iter()
        .map(|event| display_changed(&state.config.docs_dir, event.path()))
        .collect();
    tracing::debug!("Files changed: {}", changed.join(", "));

    if batch.iter().any(WatchEvent::affects_content) {
        match state.reload().await {
            Ok(pages) => tracing::info!("Reloaded {} pages", pages),
            Err(e) => {
                tracing::warn!("Failed to reload content: {}", e);
                state.reload_hub.send(ReloadMessage::Error {
                    message: e.to_string(),
                });
                return;
            }
        }
    }

    let clients = state.reload_hub.send(ReloadMessage::Reload { changed });
    tracing::debug!("Notified {} clients", clients);
}

/// Path of a changed file relative to the docs directory when it lies inside it.
fn display_changed(docs_dir: &Path, path: &Path) -> String {
    path.strip_prefix(docs_dir)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Landing page, or the root documentation page when docs live at `/`.
async fn home_handler(State(state): State<Arc<ServerState>>) -> Response {
    let source = state.source.read().await;

    if source.base_url() == "/" {
        return render_doc(&state, &source, "/");
    }

    html_response(state.renderer.render_home(&source))
}

/// Documentation pages; anything else gets the not-found page.
async fn page_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let path = decode_path(uri.path());
    let source = state.source.read().await;
    render_doc(&state, &source, &path)
}

/// Percent-decode a request path; invalid UTF-8 is looked up as sent.
fn decode_path(path: &str) -> Cow<'_, str> {
    percent_decode_str(path)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(path))
}

fn render_doc(state: &ServerState, source: &ContentSource, path: &str) -> Response {
    match source.page_by_url(path) {
        Some(page) => html_response(state.renderer.render_page(source, page)),
        None => {
            tracing::debug!("No page for {}", path);
            let mut response = html_response(state.renderer.render_not_found(source));
            if response.status() == StatusCode::OK {
                *response.status_mut() = StatusCode::NOT_FOUND;
            }
            response
        }
    }
}

fn html_response<E: Display>(rendered: Result<String, E>) -> Response {
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render page: {}", e),
            )
                .into_response()
        }
    }
}

async fn css_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css")],
        AssetPipeline::generate_css(),
    )
}

async fn js_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        AssetPipeline::generate_js(),
    )
}

/// Handler for the HMR WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward hub messages to one connected client.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.reload_hub.subscribe();

    if send_message(&mut socket, &ReloadMessage::Connected).await.is_err() {
        return;
    }

    while let Ok(msg) = rx.recv().await {
        if send_message(&mut socket, &msg).await.is_err() {
            break;
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ReloadMessage) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(json.into())).await
}

/// Handler for the live reload client script.
async fn reload_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript")],
        reload_client_script(RELOAD_SOCKET_PATH),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn docs_fixture() -> TempDir {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("auth")).unwrap();
        fs::write(
            temp.path().join("index.mdx"),
            "---\ntitle: Introduction\n---\nWelcome.",
        )
        .unwrap();
        fs::write(
            temp.path().join("auth/login.mdx"),
            "---\ntitle: Login\nicon: KeyIcon\n---\n## Request",
        )
        .unwrap();
        temp
    }

    fn state_for(docs: &TempDir, base_url: &str) -> Arc<ServerState> {
        Arc::new(
            ServerState::load(DevServerConfig {
                docs_dir: docs.path().to_path_buf(),
                base_url: base_url.to_string(),
                open: false,
                ..Default::default()
            })
            .unwrap(),
        )
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn creates_server_with_default_config() {
        let server = DevServer::new(DevServerConfig::default());
        assert_eq!(server.config.port, 7777);
        assert_eq!(server.config.base_url, "/docs");
    }

    #[test]
    fn load_fails_for_missing_docs_dir() {
        let temp = tempdir().unwrap();

        let result = ServerState::load(DevServerConfig {
            docs_dir: temp.path().join("missing"),
            ..Default::default()
        });

        assert!(matches!(result, Err(ServerError::ContentError(_))));
    }

    #[tokio::test]
    async fn serves_home_page() {
        let docs = docs_fixture();
        let state = state_for(&docs, "/docs");

        let response = home_handler(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Django Cookie"));
        assert!(html.contains("__hmr.js"));
    }

    #[tokio::test]
    async fn serves_doc_pages_by_url() {
        let docs = docs_fixture();
        let state = state_for(&docs, "/docs");

        let response = page_handler(State(state), Uri::from_static("/docs/auth/login/")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<title>Login - Documentation</title>"));
        assert!(html.contains("lucide-key"));
    }

    #[tokio::test]
    async fn decodes_percent_encoded_paths() {
        let docs = docs_fixture();
        fs::write(
            docs.path().join("getting started.mdx"),
            "---\ntitle: Getting Started\n---\nInstall.",
        )
        .unwrap();
        fs::write(docs.path().join("über.md"), "---\ntitle: About\n---\nHi.").unwrap();
        let state = state_for(&docs, "/docs");

        let response = page_handler(
            State(Arc::clone(&state)),
            Uri::from_static("/docs/getting%20started"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Install."));

        let response = page_handler(State(state), Uri::from_static("/docs/%C3%BCber")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn invalid_utf8_paths_are_kept() {
        assert_eq!(decode_path("/docs/a%20b"), "/docs/a b");
        assert_eq!(decode_path("/docs/%FF"), "/docs/%FF");
    }

    #[tokio::test]
    async fn unknown_paths_get_not_found_status() {
        let docs = docs_fixture();
        let state = state_for(&docs, "/docs");

        let response = page_handler(State(state), Uri::from_static("/docs/nope")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("Page not found"));
    }

    #[tokio::test]
    async fn root_base_url_serves_docs_index_at_root() {
        let docs = docs_fixture();
        let state = state_for(&docs, "/");

        let response = home_handler(State(state)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("Welcome."));
    }

    #[tokio::test]
    async fn content_changes_reload_pages() {
        let docs = docs_fixture();
        let state = state_for(&docs, "/docs");
        let mut rx = state.reload_hub.subscribe();

        let new_page = docs.path().join("auth/logout.mdx");
        fs::write(&new_page, "---\ntitle: Logout\n---\nBye.").unwrap();
        let meta = docs.path().join("auth/meta.json");
        handle_watch_events(
            &state,
            &[
                WatchEvent::Created(new_page),
                WatchEvent::ContentModified(meta),
            ],
        )
        .await;

        assert_eq!(
            rx.try_recv().unwrap(),
            ReloadMessage::Reload {
                changed: vec!["auth/logout.mdx".to_string(), "auth/meta.json".to_string()]
            }
        );
        assert!(rx.try_recv().is_err());
        let response = page_handler(State(state), Uri::from_static("/docs/auth/logout")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn broken_content_keeps_previous_pages() {
        let docs = docs_fixture();
        let state = state_for(&docs, "/docs");
        let mut rx = state.reload_hub.subscribe();

        let login = docs.path().join("auth/login.mdx");
        fs::write(&login, "---\ntitle: [unclosed\n---\n").unwrap();
        handle_watch_events(&state, &[WatchEvent::ContentModified(login)]).await;

        assert!(matches!(rx.try_recv().unwrap(), ReloadMessage::Error { .. }));
        let response = page_handler(State(state), Uri::from_static("/docs/auth/login")).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
