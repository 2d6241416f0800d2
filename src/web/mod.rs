mod assets;

use std::{convert::Infallible, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tokio::{
    net::TcpListener,
    sync::{broadcast, watch},
};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use tracing::{info, warn};

use crate::{
    clock::LocalClock,
    simulator::{DayCycle, Frame},
    theme::Theme,
    ticker::Ticker,
    weather::Background,
};

const FRAME_CHANNEL_CAPACITY: usize = 64;

/// Shared between request handlers. The simulator itself lives in the
/// ticker task; handlers only see the frames it publishes.
pub struct AppState {
    frames: broadcast::Sender<Frame>,
    latest: watch::Sender<Option<Frame>>,
    theme: watch::Sender<Theme>,
}

impl AppState {
    pub fn new(theme: Theme) -> Arc<Self> {
        let (frames, _) = broadcast::channel(FRAME_CHANNEL_CAPACITY);
        let (latest, _) = watch::channel(None);
        let (theme, _) = watch::channel(theme);
        Arc::new(Self {
            frames,
            latest,
            theme,
        })
    }

    /// State whose latest frame is the cycle's current one, so `/api/state`
    /// has something to show before the first tick.
    pub fn seeded(cycle: &DayCycle) -> Arc<Self> {
        let state = Self::new(cycle.theme());
        state.record_frame(cycle.frame());
        state
    }

    pub fn frame_sender(&self) -> broadcast::Sender<Frame> {
        self.frames.clone()
    }

    pub fn theme_receiver(&self) -> watch::Receiver<Theme> {
        self.theme.subscribe()
    }

    pub fn theme(&self) -> Theme {
        *self.theme.borrow()
    }

    pub fn latest_frame(&self) -> Option<Frame> {
        self.latest.borrow().clone()
    }

    pub fn record_frame(&self, frame: Frame) {
        self.latest.send_replace(Some(frame));
    }

    fn toggle_theme(&self) -> Theme {
        self.theme.send_modify(|theme| *theme = theme.toggled());
        self.theme()
    }
}

pub struct WebServerConfig {
    pub addr: SocketAddr,
    pub cycle: DayCycle,
    pub rng: ChaCha8Rng,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/app.js", get(script))
        .route("/api/state", get(latest_state))
        .route("/api/events", get(stream_events))
        .route("/api/theme", post(toggle_theme))
        .route("/backgrounds/:name", get(background))
        .with_state(state)
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig { addr, cycle, rng } = config;

    let state = AppState::seeded(&cycle);
    let ticker = Ticker::new(cycle, LocalClock, rng)
        .spawn(state.theme_receiver(), state.frame_sender());

    let recorder = {
        let state = state.clone();
        let mut rx = state.frames.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(frame) => state.record_frame(frame),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "frame recorder lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    };

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "day cycle view live at http://{addr} (Ctrl+C to stop)");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    recorder.abort();
    ticker.stop().await.context("ticker task failed")?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down web view");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        assets::APP_JS,
    )
}

async fn latest_state(State(state): State<Arc<AppState>>) -> Json<Option<Frame>> {
    Json(state.latest_frame())
}

#[derive(Serialize)]
struct ThemeResponse {
    theme: Theme,
}

async fn toggle_theme(State(state): State<Arc<AppState>>) -> Json<ThemeResponse> {
    let theme = state.toggle_theme();
    info!(%theme, "theme toggled");
    Json(ThemeResponse { theme })
}

async fn background(Path(name): Path<String>) -> Response {
    match name
        .strip_suffix(".svg")
        .and_then(Background::parse)
    {
        Some(background) => (
            [(header::CONTENT_TYPE, "image/svg+xml")],
            assets::background_svg(&background),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.frames.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(frame) => serde_json::to_string(&frame)
            .ok()
            .map(|payload| Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}
