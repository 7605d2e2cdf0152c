mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::body::Body;
use axum::http::StatusCode;
use axum::{
    extract::{Path, State},
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{info, warn};

use crate::{
    batch::{Batch, BatchSummary, Garden},
    palette::{ColorPair, COLOR_PAIRS},
    render::draw,
};

#[derive(Clone, Serialize)]
pub struct BatchEnvelope {
    pub garden: String,
    pub seed: u64,
    pub batch: BatchSummary,
    pub palette: &'static [ColorPair],
}

pub struct AppState {
    garden: Mutex<Garden>,
    garden_name: String,
    display_scale: u32,
    broadcaster: broadcast::Sender<String>,
}

impl AppState {
    pub fn new(garden_name: impl Into<String>, garden: Garden, display_scale: u32) -> Arc<Self> {
        let (broadcaster, _) = broadcast::channel::<String>(64);
        Arc::new(Self {
            garden: Mutex::new(garden),
            garden_name: garden_name.into(),
            display_scale,
            broadcaster,
        })
    }

    fn envelope_for(&self, seed: u64, batch: &Batch) -> BatchEnvelope {
        BatchEnvelope {
            garden: self.garden_name.clone(),
            seed,
            batch: batch.summary(),
            palette: &COLOR_PAIRS,
        }
    }

    pub fn envelope(&self) -> BatchEnvelope {
        let garden = self.garden.lock().expect("garden lock poisoned");
        self.envelope_for(garden.seed(), garden.current())
    }

    /// Regenerates and publishes under one lock, so every caller gets (and
    /// every subscriber sees) the batch its own regeneration produced, in
    /// serial order.
    pub fn regenerate(&self) -> BatchEnvelope {
        let mut garden = self.garden.lock().expect("garden lock poisoned");
        let seed = garden.seed();
        let envelope = self.envelope_for(seed, garden.regenerate());
        if let Ok(payload) = serde_json::to_string(&envelope) {
            // No subscribers is fine.
            let _ = self.broadcaster.send(payload);
        }
        envelope
    }

    /// PNG of flower `index` from batch `serial`. Only the current batch is
    /// served; older serials are reported as stale.
    pub fn flower_png(&self, serial: u64, index: usize) -> Result<Vec<u8>, FlowerFetchError> {
        let flower = {
            let garden = self.garden.lock().expect("garden lock poisoned");
            let current = garden.current();
            if current.serial() != serial {
                return Err(FlowerFetchError::Stale {
                    requested: serial,
                    current: current.serial(),
                });
            }
            current
                .get(index)
                .copied()
                .ok_or(FlowerFetchError::Missing(index))?
        };
        Ok(draw(&flower).to_png(self.display_scale)?)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.broadcaster.subscribe()
    }
}

#[derive(Debug, Error)]
pub enum FlowerFetchError {
    #[error("batch {requested} has been replaced by batch {current}")]
    Stale { requested: u64, current: u64 },

    #[error("no flower at index {0}")]
    Missing(usize),

    #[error("failed to encode flower: {0}")]
    Encode(#[from] image::ImageError),
}

impl IntoResponse for FlowerFetchError {
    fn into_response(self) -> Response {
        let status = match self {
            FlowerFetchError::Stale { .. } => StatusCode::CONFLICT,
            FlowerFetchError::Missing(_) => StatusCode::NOT_FOUND,
            FlowerFetchError::Encode(ref err) => {
                warn!("{err}");
                return (StatusCode::INTERNAL_SERVER_ERROR, "failed to render flower")
                    .into_response();
            }
        };

        (status, self.to_string()).into_response()
    }
}

pub struct WebServerConfig {
    pub garden_name: String,
    pub seed: u64,
    pub batch_size: usize,
    pub display_scale: u32,
    pub host: String,
    pub port: u16,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/static/:name", get(static_asset))
        .route("/api/batch", get(current_batch))
        .route("/api/regenerate", post(regenerate))
        .route("/flowers/:serial/:index", get(flower))
        .route("/api/events", get(stream_events))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        garden_name,
        seed,
        batch_size,
        display_scale,
        host,
        port,
    } = config;

    let state = AppState::new(garden_name, Garden::new(seed, batch_size), display_scale);
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Flowerbed gallery live at http://{addr} (Ctrl+C to stop)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for Ctrl+C: {err}");
    }
    info!("Shutting down gallery...");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn static_asset(Path(name): Path<String>) -> Response {
    match assets::lookup(&name) {
        Some(asset) => ([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response(),
        None => (StatusCode::NOT_FOUND, "no such asset").into_response(),
    }
}

async fn current_batch(State(state): State<Arc<AppState>>) -> Json<BatchEnvelope> {
    Json(state.envelope())
}

async fn regenerate(State(state): State<Arc<AppState>>) -> Json<BatchEnvelope> {
    let envelope = state.regenerate();
    info!(serial = envelope.batch.serial, "batch regenerated");
    Json(envelope)
}

async fn flower(
    State(state): State<Arc<AppState>>,
    Path((serial, index)): Path<(u64, usize)>,
) -> Result<Response, FlowerFetchError> {
    let png = state.flower_png(serial, index)?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        Body::from(Bytes::from(png)),
    )
        .into_response())
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.subscribe()).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().event("batch").data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
