mod common;

use cardash_frontend::dashboard::{DashboardEvent, LinkStatus};
use cardash_frontend::push::PushListener;
use cardash_shared::PushMessage;
use common::{WAIT, push_router, serve};
use std::time::Duration;
use tokio::sync::mpsc;

async fn next_event(rx: &mut mpsc::Receiver<DashboardEvent>) -> DashboardEvent {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("event before timeout")
        .expect("listener alive")
}

#[tokio::test]
async fn forwards_frames_and_drops_malformed_ones() {
    let frames = vec![
        r#"{"event":"dashboard_update","data":"{\"rpm\":3000,\"kmh\":87}"}"#.to_string(),
        "garbage".to_string(),
        r#"{"event":"speed","data":"42"}"#.to_string(),
        r#"{"event":"player_update","data":{"song":{"title":"Walk of Life","interpret":"Dire Straits"},"isPlaying":true}}"#.to_string(),
    ];
    let base = serve(push_router(frames)).await;
    let ws = base.replacen("http", "ws", 1);

    let (tx, mut rx) = mpsc::channel(16);
    let handle = PushListener::with_url(format!("{ws}/ws"), Duration::from_millis(50)).spawn(tx);

    assert_eq!(
        next_event(&mut rx).await,
        DashboardEvent::Link(LinkStatus::Connected)
    );
    let DashboardEvent::Push(PushMessage::Telemetry(t)) = next_event(&mut rx).await else {
        panic!("expected telemetry");
    };
    assert_eq!((t.rpm, t.kmh), (3000, 87));

    let DashboardEvent::Push(PushMessage::Player(p)) = next_event(&mut rx).await else {
        panic!("expected player update after the two bad frames");
    };
    assert_eq!(p.song.artist, "Dire Straits");

    // Server closes after replaying; the supervisor reconnects.
    assert_eq!(
        next_event(&mut rx).await,
        DashboardEvent::Link(LinkStatus::Reconnecting)
    );
    assert_eq!(
        next_event(&mut rx).await,
        DashboardEvent::Link(LinkStatus::Connected)
    );

    handle.abort();
}

#[tokio::test]
async fn keeps_retrying_while_server_is_down() {
    let base = common::dead_address().await;
    let ws = base.replacen("http", "ws", 1);

    let (tx, mut rx) = mpsc::channel(16);
    let handle = PushListener::with_url(format!("{ws}/ws"), Duration::from_millis(20)).spawn(tx);

    for _ in 0..3 {
        assert_eq!(
            next_event(&mut rx).await,
            DashboardEvent::Link(LinkStatus::Reconnecting)
        );
    }
    handle.abort();
}

#[tokio::test]
async fn stops_when_the_queue_is_dropped() {
    let base = common::dead_address().await;
    let ws = base.replacen("http", "ws", 1);

    let (tx, rx) = mpsc::channel(16);
    let handle = PushListener::with_url(format!("{ws}/ws"), Duration::from_millis(10)).spawn(tx);
    drop(rx);

    tokio::time::timeout(WAIT, handle)
        .await
        .expect("supervisor exits")
        .expect("no panic");
}
