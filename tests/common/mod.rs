//! Shared test utilities

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get, routing::post};
use frei0r_selector::{
    LoadPluginRequest, LoadPluginResponse, PluginProbe, PluginRecord, PluginType, ProbeError,
};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Probe double answering from a table keyed by file name
///
/// Files missing from the table fail like a non-library file would.
pub struct StaticProbe {
    table: HashMap<String, (String, PluginType)>,
}

impl StaticProbe {
    pub fn new(entries: &[(&str, &str, PluginType)]) -> Self {
        Self {
            table: entries
                .iter()
                .map(|(file, name, ty)| ((*file).to_string(), ((*name).to_string(), *ty)))
                .collect(),
        }
    }
}

impl PluginProbe for StaticProbe {
    fn probe(&self, path: &Path) -> Result<PluginRecord, ProbeError> {
        let file = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or_default();
        match self.table.get(file) {
            Some((name, ty)) => Ok(PluginRecord::new(name.clone(), *ty, path)),
            None => Err(ProbeError::Load {
                path: path.to_path_buf(),
                reason: "invalid ELF header".to_string(),
            }),
        }
    }
}

/// Create empty candidate files in `dir`
pub fn touch_all(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, b"").expect("failed to create candidate file");
            path
        })
        .collect()
}

/// Copy a compiled fixture library from `tests/fixtures` into `dir` as `name`
///
/// Fixtures are built by `build.rs` on Linux.
pub fn copy_fixture(fixture: &str, dir: &Path, name: &str) -> PathBuf {
    let fixtures = option_env!("FREI0R_FIXTURE_DIR")
        .expect("fixture libraries need a C compiler at build time");
    let path = dir.join(name);
    std::fs::copy(Path::new(fixtures).join(fixture), &path).expect("failed to copy fixture");
    path
}

/// Requests received by a [`StubLoader`]
pub type Received = Arc<Mutex<Vec<LoadPluginRequest>>>;

/// Loader service stand-in served on an ephemeral port
pub struct StubLoader {
    pub addr: SocketAddr,
    pub received: Received,
}

impl StubLoader {
    /// Start serving in the background
    pub async fn start() -> Self {
        let received: Received = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route("/health", get(|| async { "ok" }))
            .route("/load_plugin", post(load_plugin))
            .with_state(received.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub loader");
        let addr = listener.local_addr().expect("stub loader has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub loader failed");
        });

        Self { addr, received }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Wait until at least `count` requests arrived or a second passed
    pub async fn wait_for(&self, count: usize) -> Vec<LoadPluginRequest> {
        for _ in 0..100 {
            {
                let received = self.received.lock().await;
                if received.len() >= count {
                    return received.clone();
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.received.lock().await.clone()
    }
}

async fn load_plugin(
    State(received): State<Received>,
    Json(request): Json<LoadPluginRequest>,
) -> Json<LoadPluginResponse> {
    received.lock().await.push(request);
    Json(LoadPluginResponse {
        success: Some(true),
        message: None,
    })
}

/// URL of a local port nothing is listening on
pub async fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind spare port");
    let addr = listener.local_addr().expect("spare port has no address");
    drop(listener);
    format!("http://{addr}")
}
