//! `parley serve`: the browser terminal over HTTP/1.
//!
//! Routes:
//! - `GET /`: the single-page terminal
//! - `GET /healthz`: liveness probe
//! - `POST /execute`: run one line in the caller's session
//!
//! Every caller gets its own [`Session`] keyed by an opaque token, so two
//! browser tabs never share a working directory or history.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{anyhow, Result};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::CONTENT_TYPE;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use parley_shell::{Output, Session, Shell};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

const TERMINAL_PAGE: &str = include_str!("../assets/terminal.html");
const SESSION_ENDED: &str = "Terminal session ended. Refresh the page to start a new session.";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub ready_file: Option<PathBuf>,
    pub max_sessions: usize,
    /// Working directory every new session starts in.
    pub start_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ExecuteRequestV1 {
    command: String,
    #[serde(default)]
    session: Option<String>,
}

#[derive(Debug, Serialize)]
struct ExecuteResponseV1 {
    output: String,
    prompt: String,
    session: String,
    /// Set when the command asked for the display to be wiped.
    clear: bool,
}

struct SessionSlot {
    session: Arc<Mutex<Session>>,
    last_used: Instant,
}

/// Live sessions by token. Past `capacity`, the least recently used one goes.
struct SessionStore {
    slots: HashMap<String, SessionSlot>,
    capacity: usize,
    start_dir: PathBuf,
}

impl SessionStore {
    fn new(capacity: usize, start_dir: PathBuf) -> Self {
        Self {
            slots: HashMap::new(),
            capacity: capacity.max(1),
            start_dir,
        }
    }

    /// The session for `token`, or a fresh one under a new token when the
    /// token is missing or unknown.
    fn checkout(&mut self, token: Option<&str>) -> (String, Arc<Mutex<Session>>) {
        if let Some(token) = token {
            if let Some(slot) = self.slots.get_mut(token) {
                slot.last_used = Instant::now();
                return (token.to_string(), slot.session.clone());
            }
        }

        let token = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Mutex::new(Session::new(&self.start_dir)));
        self.slots.insert(
            token.clone(),
            SessionSlot {
                session: session.clone(),
                last_used: Instant::now(),
            },
        );
        info!(session = %token, live = self.len(), "session created");
        self.evict_overflow(&token);
        (token, session)
    }

    fn remove(&mut self, token: &str) -> bool {
        let removed = self.slots.remove(token).is_some();
        if removed {
            info!(session = %token, live = self.len(), "session ended");
        }
        removed
    }

    fn evict_overflow(&mut self, keep: &str) {
        while self.slots.len() > self.capacity {
            let oldest = self
                .slots
                .iter()
                .filter(|(token, _)| token.as_str() != keep)
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(token, _)| token.clone());
            let Some(oldest) = oldest else {
                break;
            };
            self.slots.remove(&oldest);
            debug!(session = %oldest, "evicted least recently used session");
        }
    }

    fn len(&self) -> usize {
        self.slots.len()
    }
}

struct ServerState {
    shell: Shell,
    sessions: Mutex<SessionStore>,
}

pub fn cmd_serve(shell: Shell, config: ServerConfig) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow!("failed to initialize tokio runtime: {e}"))?;

    rt.block_on(async move { serve_async(shell, config).await })
}

async fn serve_async(shell: Shell, config: ServerConfig) -> Result<()> {
    let state = Arc::new(ServerState {
        shell,
        sessions: Mutex::new(SessionStore::new(
            config.max_sessions,
            config.start_dir.clone(),
        )),
    });

    let listener = TcpListener::bind(config.listen)
        .await
        .map_err(|e| anyhow!("serve: failed to bind {}: {e}", config.listen))?;
    let bound = listener
        .local_addr()
        .map_err(|e| anyhow!("serve: failed to read bound addr: {e}"))?;

    eprintln!("serve: listening on http://{bound}");
    info!(%bound, start_dir = %config.start_dir.display(), "terminal server listening");
    if let Some(path) = config.ready_file.as_ref() {
        write_ready_file(path, bound)?;
    }

    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .map_err(|e| anyhow!("serve: accept failed: {e}"))?;
        debug!(%peer, "connection accepted");
        let io = TokioIo::new(stream);
        let state = state.clone();

        tokio::spawn(async move {
            let service = service_fn(move |req| handle_request(req, state.clone()));
            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                warn!(%peer, "connection error: {e}");
            }
        });
    }
}

fn write_ready_file(path: &std::path::Path, bound: SocketAddr) -> Result<()> {
    let payload = serde_json::json!({
        "version": "parley_server_ready_v1",
        "addr": bound.to_string(),
        "pid": std::process::id(),
    });
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let text = serde_json::to_string_pretty(&payload)?;
    std::fs::write(path, text)
        .map_err(|e| anyhow!("serve: failed to write ready file {}: {e}", path.display()))
}

async fn handle_request(
    req: Request<Incoming>,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    debug!(%method, %path, "request");

    let resp = match (method, path.as_str()) {
        (Method::GET, "/") | (Method::GET, "/index.html") => html_response(TERMINAL_PAGE),
        (Method::GET, "/healthz") => text_response(StatusCode::OK, "ok\n"),
        (Method::POST, "/execute") => {
            let body = req.into_body().collect().await?.to_bytes();
            match serde_json::from_slice::<ExecuteRequestV1>(&body) {
                Ok(request) => match handle_execute(&state, request).await {
                    Ok(v) => json_response(StatusCode::OK, &v),
                    Err(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
                },
                Err(e) => json_error(StatusCode::BAD_REQUEST, &format!("invalid request: {e}")),
            }
        }
        _ => json_error(StatusCode::NOT_FOUND, "not found"),
    };

    Ok(resp)
}

async fn handle_execute(
    state: &Arc<ServerState>,
    request: ExecuteRequestV1,
) -> Result<ExecuteResponseV1> {
    let (token, session) = {
        let mut sessions = state
            .sessions
            .lock()
            .map_err(|_| anyhow!("session store lock poisoned"))?;
        sessions.checkout(request.session.as_deref())
    };

    let line = parley_nl::route_free_text(&state.shell, &request.command).into_owned();

    let worker = state.clone();
    let (output, prompt) = tokio::task::spawn_blocking(move || {
        let mut session = session
            .lock()
            .map_err(|_| anyhow!("session lock poisoned"))?;
        let output = worker.shell.execute_line(&mut session, &line);
        Ok::<_, anyhow::Error>((output, session.prompt()))
    })
    .await
    .map_err(|e| anyhow!("execute: failed to join worker: {e}"))??;

    let response = match output {
        Output::Exit => {
            if let Ok(mut sessions) = state.sessions.lock() {
                sessions.remove(&token);
            }
            ExecuteResponseV1 {
                output: SESSION_ENDED.to_string(),
                prompt: String::new(),
                session: token,
                clear: false,
            }
        }
        Output::Clear => ExecuteResponseV1 {
            output: String::new(),
            prompt,
            session: token,
            clear: true,
        },
        Output::Text(text) => ExecuteResponseV1 {
            output: text,
            prompt,
            session: token,
            clear: false,
        },
    };
    Ok(response)
}

fn html_response(body: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from_static(b"internal error"))))
}

fn text_response(status: StatusCode, body: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from_static(b"internal error"))))
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(value).unwrap_or_else(|_| b"{\"error\":\"serialize\"}".to_vec());
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::from_static(b"{\"error\":\"internal\"}"))))
}

fn json_error(status: StatusCode, msg: &str) -> Response<Full<Bytes>> {
    let v = serde_json::json!({ "error": msg });
    json_response(status, &v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize) -> SessionStore {
        SessionStore::new(capacity, PathBuf::from("/"))
    }

    #[test]
    fn unknown_tokens_get_fresh_sessions() {
        let mut sessions = store(4);
        let (a, _) = sessions.checkout(None);
        let (b, _) = sessions.checkout(Some("not-a-live-token"));
        assert_ne!(a, b);
        assert_ne!(b, "not-a-live-token");
        assert_eq!(sessions.len(), 2);
    }

    #[test]
    fn known_tokens_share_one_session() {
        let mut sessions = store(4);
        let (token, first) = sessions.checkout(None);
        let (again, second) = sessions.checkout(Some(&token));
        assert_eq!(token, again);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn least_recently_used_session_is_evicted() {
        let mut sessions = store(2);
        let (a, _) = sessions.checkout(None);
        let (b, _) = sessions.checkout(None);
        // Touch `a` so `b` becomes the oldest.
        sessions.checkout(Some(&a));
        let (c, _) = sessions.checkout(None);
        assert_eq!(sessions.len(), 2);
        assert!(sessions.slots.contains_key(&a));
        assert!(!sessions.slots.contains_key(&b));
        assert!(sessions.slots.contains_key(&c));
    }

    #[test]
    fn removed_sessions_are_gone() {
        let mut sessions = store(4);
        let (token, _) = sessions.checkout(None);
        assert!(sessions.remove(&token));
        assert!(!sessions.remove(&token));
        let (fresh, _) = sessions.checkout(Some(&token));
        assert_ne!(fresh, token);
    }

    #[test]
    fn exit_drops_the_session_and_clear_keeps_the_prompt() -> anyhow::Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let dir = tempfile::tempdir()?;
        let state = Arc::new(ServerState {
            shell: parley_nl::build_shell()?,
            sessions: Mutex::new(SessionStore::new(8, dir.path().to_path_buf())),
        });

        rt.block_on(async {
            let first = handle_execute(
                &state,
                ExecuteRequestV1 {
                    command: "clear".to_string(),
                    session: None,
                },
            )
            .await?;
            assert_eq!(first.output, "");
            assert!(first.clear);
            assert!(first.prompt.ends_with("$ "));

            let ended = handle_execute(
                &state,
                ExecuteRequestV1 {
                    command: "exit".to_string(),
                    session: Some(first.session.clone()),
                },
            )
            .await?;
            assert_eq!(ended.output, SESSION_ENDED);
            assert_eq!(ended.prompt, "");
            assert_eq!(state.sessions.lock().map(|s| s.len()).unwrap_or(usize::MAX), 0);
            Ok::<(), anyhow::Error>(())
        })
    }

    #[test]
    fn free_text_is_routed_to_the_resolver() -> anyhow::Result<()> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let dir = tempfile::tempdir()?;
        let state = Arc::new(ServerState {
            shell: parley_nl::build_shell()?,
            sessions: Mutex::new(SessionStore::new(8, dir.path().to_path_buf())),
        });

        let reply = rt.block_on(handle_execute(
            &state,
            ExecuteRequestV1 {
                command: "create a new folder called Reports".to_string(),
                session: None,
            },
        ))?;
        assert!(dir.path().join("Reports").is_dir());
        assert_eq!(reply.output, "");
        Ok(())
    }
}
