// In-process stand-in for the player server: the /player, /bluetooth and
// /shutdown endpoints plus a push channel that replays canned frames.
#![allow(dead_code)]

use axum::extract::ws::{Message, Utf8Bytes, WebSocket, WebSocketUpgrade};
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cardash_shared::PlayerState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MockPlayer {
    pub state: PlayerState,
    /// (path, form fields) for every request seen.
    pub requests: Vec<(String, HashMap<String, String>)>,
    pub reject_with: Option<u16>,
    pub garbage_body: bool,
}

pub type SharedPlayer = Arc<Mutex<MockPlayer>>;

pub fn player_with(state: PlayerState) -> SharedPlayer {
    Arc::new(Mutex::new(MockPlayer {
        state,
        ..Default::default()
    }))
}

pub fn walk_of_life() -> PlayerState {
    PlayerState {
        title: "Walk of Life".into(),
        artist: "Dire Straits".into(),
        is_playing: false,
        position_seconds: Some(20),
        length_seconds: 200,
        volume: Some(0.5),
    }
}

pub fn player_router(player: SharedPlayer) -> Router {
    Router::new()
        .route("/player/{action}", post(player_action))
        .route("/bluetooth/{setting}", post(no_content))
        .route("/shutdown", post(no_content))
        .with_state(player)
}

async fn player_action(
    State(player): State<SharedPlayer>,
    Path(action): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut mock = player.lock().expect("mock lock");
    mock.requests.push((format!("/player/{action}"), form.clone()));

    if let Some(code) = mock.reject_with {
        return StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response();
    }
    if mock.garbage_body {
        return "<html>oops</html>".into_response();
    }

    let percentage = form.get("percentage").and_then(|p| p.parse::<f64>().ok());
    let state = &mut mock.state;
    match action.as_str() {
        "play_pause" => state.is_playing = !state.is_playing,
        "forward" => {
            state.title = "Money for Nothing".into();
            state.position_seconds = Some(0);
        }
        "back" => state.position_seconds = Some(0),
        "skip_to" => {
            if let Some(p) = percentage {
                state.position_seconds = Some((state.length_seconds as f64 * p / 100.0) as u32);
            }
        }
        "volume_to" => state.volume = percentage.map(|v| v as f32),
        _ => return StatusCode::NOT_FOUND.into_response(),
    }
    Json(state.clone()).into_response()
}

async fn no_content(
    State(player): State<SharedPlayer>,
    uri: axum::http::Uri,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let mut mock = player.lock().expect("mock lock");
    mock.requests.push((uri.path().to_string(), form));
    match mock.reject_with {
        Some(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        None => StatusCode::OK.into_response(),
    }
}

/// Push channel that sends `frames` to every client, then closes.
pub fn push_router(frames: Vec<String>) -> Router {
    Router::new().route(
        "/ws",
        get(move |ws: WebSocketUpgrade| {
            let frames = frames.clone();
            async move { ws.on_upgrade(move |socket| replay(socket, frames)) }
        }),
    )
}

async fn replay(mut socket: WebSocket, frames: Vec<String>) {
    for frame in frames {
        if socket
            .send(Message::Text(Utf8Bytes::from(frame)))
            .await
            .is_err()
        {
            return;
        }
    }
    let _ = socket.send(Message::Close(None)).await;
}

/// Serve `app` on an ephemeral port; returns `http://127.0.0.1:<port>`.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server");
    });
    format!("http://{addr}")
}

/// An address nothing listens on.
pub async fn dead_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind free-port listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

pub const WAIT: Duration = Duration::from_secs(5);
