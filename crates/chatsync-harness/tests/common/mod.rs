//! Shared setup for simulation tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use chatsync_app::{
    App, DisplayZone, KeyInput, Runtime, SyncConfig,
    view::{UserListView, View},
};
use chatsync_harness::{SimDriver, SimHandle, SimServer, run_for, settle};

/// Runtime for `alice` against `server`, started and with the first presence
/// poll applied.
pub async fn alice(server: &SimServer, config: &SyncConfig) -> (Runtime<SimDriver>, SimHandle) {
    server.connect("alice");
    let driver = SimDriver::new(Arc::new(server.session("alice")));
    let handle = driver.handle();
    let app = App::new("alice")
        .with_display_zone(DisplayZone::utc())
        .with_stale_guard(config.discard_stale_responses);

    let mut runtime = Runtime::new(driver, app, config);
    runtime.start().unwrap();
    run_for(&mut runtime, Duration::from_millis(100)).await.unwrap();
    settle(&mut runtime).await.unwrap();
    (runtime, handle)
}

/// Press the keys that highlight `name` in the user list and select it.
/// Assumes the user list has focus.
pub fn select_user(handle: &SimHandle, name: &str) {
    let UserListView::Entries(entries) = screen(handle).users else {
        panic!("user list is empty");
    };
    let index = entries.iter().position(|e| e.username == name).expect("user is online");
    for _ in 0..entries.len() {
        handle.press(KeyInput::Up);
    }
    for _ in 0..index {
        handle.press(KeyInput::Down);
    }
    handle.press(KeyInput::Enter);
}

/// Screen as last drawn.
pub fn screen(handle: &SimHandle) -> View {
    handle.last_view().expect("runtime renders on start")
}
