//! Typing signals under bursts of input, on the virtual clock.
//!
//! However the keystrokes of a burst are spaced, as long as no gap reaches the
//! debounce window the peer sees starts while typing and exactly one stop
//! after the burst.

mod common;

use std::time::Duration;

use chatsync_app::{KeyInput, SyncConfig};
use chatsync_harness::{SimServer, TypingSignal, run_for, settle};
use chatsync_proto::TypingAction;
use common::{alice, select_user};
use proptest::prelude::*;

fn signals_to(server: &SimServer, peer: &str) -> Vec<TypingAction> {
    server
        .typing_signals()
        .into_iter()
        .filter(|s: &TypingSignal| s.user == "alice" && s.recipient == peer)
        .map(|s| s.action)
        .collect()
}

async fn burst(gaps: Vec<u64>) -> Vec<TypingAction> {
    let server = SimServer::new();
    server.connect("bob");
    let (mut runtime, handle) = alice(&server, &SyncConfig::default()).await;
    select_user(&handle, "bob");
    settle(&mut runtime).await.unwrap();

    for gap in gaps {
        handle.press(KeyInput::Char('x'));
        run_for(&mut runtime, Duration::from_millis(gap)).await.unwrap();
    }
    run_for(&mut runtime, Duration::from_millis(1_500)).await.unwrap();
    settle(&mut runtime).await.unwrap();

    signals_to(&server, "bob")
}

#[tokio::test]
async fn single_keystroke_stops_after_idle() {
    let signals = burst(vec![0]).await;
    assert_eq!(signals, vec![TypingAction::Start, TypingAction::Stop]);
}

#[tokio::test]
async fn pause_longer_than_window_splits_bursts() {
    let signals = burst(vec![1_200, 0]).await;
    assert_eq!(
        signals,
        vec![TypingAction::Start, TypingAction::Stop, TypingAction::Start, TypingAction::Stop]
    );
}

#[tokio::test]
async fn cursor_keys_do_not_signal() {
    let server = SimServer::new();
    server.connect("bob");
    let (mut runtime, handle) = alice(&server, &SyncConfig::default()).await;
    select_user(&handle, "bob");
    for key in [KeyInput::Left, KeyInput::Right, KeyInput::Home, KeyInput::End, KeyInput::Backspace] {
        handle.press(key);
    }
    run_for(&mut runtime, Duration::from_millis(1_500)).await.unwrap();

    assert!(signals_to(&server, "bob").is_empty());
}

#[tokio::test]
async fn switching_peer_stops_the_previous_one() {
    let server = SimServer::new();
    server.connect("bob");
    server.connect("carol");
    let (mut runtime, handle) = alice(&server, &SyncConfig::default()).await;

    select_user(&handle, "bob");
    handle.type_text("hi");
    settle(&mut runtime).await.unwrap();
    handle.press(KeyInput::Tab);
    settle(&mut runtime).await.unwrap();
    select_user(&handle, "carol");
    handle.type_text("yo");
    run_for(&mut runtime, Duration::from_millis(1_500)).await.unwrap();
    settle(&mut runtime).await.unwrap();

    assert_eq!(signals_to(&server, "bob"), vec![
        TypingAction::Start,
        TypingAction::Start,
        TypingAction::Stop
    ]);
    assert_eq!(signals_to(&server, "carol"), vec![
        TypingAction::Start,
        TypingAction::Start,
        TypingAction::Stop
    ]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_burst_yields_one_stop(gaps in prop::collection::vec(0u64..=900, 1..12)) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let signals = runtime.block_on(burst(gaps));

        let starts = signals.iter().filter(|a| **a == TypingAction::Start).count();
        let stops = signals.iter().filter(|a| **a == TypingAction::Stop).count();
        prop_assert!(starts >= 1);
        prop_assert_eq!(stops, 1);
        prop_assert_eq!(signals.last(), Some(&TypingAction::Stop));
    }
}
