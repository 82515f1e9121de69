//! Sound button tests: state machine, mutual exclusion, latest-wins.

mod common;

use clipdeck_core::{ClipConfig, SoundId, SoundRef};
use clipdeck_playback::{
    ButtonState, MediaElement, PlaybackCoordinator, ReadyState, SlotEvent, TriggerOutcome,
};
use common::{init_tracing, settle, Behavior, MockBackend, RecordingCounter};
use std::sync::Arc;
use std::time::Duration;

const MEDIA_BASE: &str = "https://media.example.com";

fn config() -> ClipConfig {
    ClipConfig {
        media_base_url: MEDIA_BASE.to_string(),
        ..ClipConfig::default()
    }
}

fn sound(id: i64) -> SoundRef {
    SoundRef::new(SoundId::new(id), format!("Sound {}", id))
        .with_relative_media_path(format!("/sounds/{}.mp3", id))
}

fn media_url(id: i64) -> String {
    format!("{}/sounds/{}.mp3", MEDIA_BASE, id)
}

fn coordinator(backend: &Arc<MockBackend>) -> PlaybackCoordinator {
    init_tracing();
    PlaybackCoordinator::new(backend.clone(), &config())
}

// ===== Basic lifecycle =====

#[tokio::test(start_paused = true)]
async fn first_trigger_plays() {
    let backend = MockBackend::new();
    let counter = RecordingCounter::new();
    let coordinator = coordinator(&backend).with_play_counter(counter.clone());
    let button = coordinator.button(sound(1));

    assert_eq!(button.state(), ButtonState::Idle);
    assert_eq!(button.trigger().await, TriggerOutcome::Started);

    assert_eq!(button.state(), ButtonState::Playing);
    assert!(backend.element(&media_url(1)).is_playing());

    settle().await;
    assert_eq!(counter.plays(), vec![SoundId::new(1)]);
}

#[tokio::test(start_paused = true)]
async fn button_reports_loading_while_resolving() {
    let backend = MockBackend::new();
    backend.set(&media_url(1), Behavior::ready_after(50));
    let coordinator = coordinator(&backend);
    let button = Arc::new(coordinator.button(sound(1)));

    let task = {
        let button = Arc::clone(&button);
        tokio::spawn(async move { button.trigger().await })
    };

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(button.state(), ButtonState::Loading);

    assert_eq!(task.await.unwrap(), TriggerOutcome::Started);
    assert_eq!(button.state(), ButtonState::Playing);
}

#[tokio::test(start_paused = true)]
async fn retrigger_toggles_without_reloading() {
    let backend = MockBackend::new();
    let counter = RecordingCounter::new();
    let coordinator = coordinator(&backend).with_play_counter(counter.clone());
    let button = coordinator.button(sound(1));

    assert_eq!(button.trigger().await, TriggerOutcome::Started);
    assert_eq!(button.trigger().await, TriggerOutcome::Stopped);
    assert_eq!(button.state(), ButtonState::Idle);

    assert_eq!(button.trigger().await, TriggerOutcome::Resumed);
    assert_eq!(button.state(), ButtonState::Playing);

    // One element for all three presses
    assert_eq!(backend.created_urls().len(), 1);
    let element = backend.element(&media_url(1));
    assert_eq!(element.plays(), 2);
    assert_eq!(element.rewinds(), 1);

    settle().await;
    assert_eq!(counter.plays().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn natural_end_returns_button_to_idle() {
    let backend = MockBackend::new();
    let coordinator = coordinator(&backend);
    let button = coordinator.button(sound(1));

    button.trigger().await;
    backend.element(&media_url(1)).finish();
    settle().await;

    assert_eq!(button.state(), ButtonState::Idle);
    assert!(coordinator.slot().is_empty());

    // Still valid: the next press replays the same element
    assert_eq!(button.trigger().await, TriggerOutcome::Resumed);
    assert_eq!(backend.created_urls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn playback_error_clears_slot() {
    let backend = MockBackend::new();
    let coordinator = coordinator(&backend);
    let button = coordinator.button(sound(1));

    button.trigger().await;
    backend.element(&media_url(1)).fail("decode error");
    settle().await;

    assert_eq!(button.state(), ButtonState::Idle);
    assert!(coordinator.slot().is_empty());
}

#[tokio::test(start_paused = true)]
async fn playback_error_reloads_on_next_trigger() {
    const BUCKET: &str = "https://bucket.example.com/1.mp3";

    let backend = MockBackend::new();
    let coordinator = coordinator(&backend);
    let button = coordinator.button(sound(1).with_object_storage_url(BUCKET));

    assert_eq!(button.trigger().await, TriggerOutcome::Started);
    let broken = backend.element(BUCKET);
    broken.fail("decode error");
    settle().await;

    assert!(!broken.has_source());
    assert!(button.handle().map_or(true, |handle| !handle.is_valid()));

    // The bucket copy stays broken, so the media path takes over
    backend.set(BUCKET, Behavior::fail_after(5, ReadyState::HaveNothing));
    assert_eq!(button.trigger().await, TriggerOutcome::Started);

    assert_eq!(backend.created_urls(), vec![BUCKET, BUCKET, media_url(1).as_str()]);
    assert_eq!(button.state(), ButtonState::Playing);
    assert!(backend.element(&media_url(1)).is_playing());
}

#[tokio::test(start_paused = true)]
async fn dropping_button_stops_its_watcher() {
    let backend = MockBackend::new();
    let coordinator = coordinator(&backend);
    let button = coordinator.button(sound(1));

    button.trigger().await;
    settle().await;
    let element = backend.element(&media_url(1));
    assert_eq!(element.subscribers(), 1);

    drop(button);
    settle().await;

    assert_eq!(element.subscribers(), 0);
    assert!(coordinator.slot().is_empty());
}

#[tokio::test(start_paused = true)]
async fn reload_releases_previous_watcher() {
    let backend = MockBackend::new();
    let coordinator = coordinator(&backend);
    let button = coordinator.button(sound(1));

    button.trigger().await;
    let first = backend.element(&media_url(1));
    first.pause();
    first.clear_source();

    assert_eq!(button.trigger().await, TriggerOutcome::Started);
    settle().await;

    assert_eq!(first.subscribers(), 0);
    assert_eq!(backend.element(&media_url(1)).subscribers(), 1);
}

#[tokio::test(start_paused = true)]
async fn pressed_feedback_is_short_lived() {
    let backend = MockBackend::new();
    let coordinator = coordinator(&backend);
    let button = coordinator.button(sound(1));

    assert!(!button.is_pressed());
    button.trigger().await;
    assert!(button.is_pressed());

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!button.is_pressed());
    // Cosmetic only
    assert_eq!(button.state(), ButtonState::Playing);
}

// ===== Cross-button exclusion =====

#[tokio::test(start_paused = true)]
async fn second_button_stops_first() {
    let backend = MockBackend::new();
    let coordinator = coordinator(&backend);
    let a = coordinator.button(sound(1));
    let b = coordinator.button(sound(2));

    assert_eq!(a.trigger().await, TriggerOutcome::Started);
    let h1 = a.handle().unwrap();

    assert_eq!(b.trigger().await, TriggerOutcome::Started);
    let h2 = b.handle().unwrap();

    let first = backend.element(&media_url(1));
    assert!(!first.is_playing());
    assert_eq!(first.rewinds(), 1);

    assert_eq!(a.state(), ButtonState::Idle);
    assert_eq!(b.state(), ButtonState::Playing);
    assert!(coordinator.slot().is_current(&h2));
    assert!(!coordinator.slot().is_current(&h1));
    assert_eq!(backend.playing_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn previous_sound_is_silenced_before_loading_starts() {
    let backend = MockBackend::new();
    backend.set(&media_url(2), Behavior::ready_after(80));
    let coordinator = coordinator(&backend);
    let a = coordinator.button(sound(1));
    let b = Arc::new(coordinator.button(sound(2)));

    a.trigger().await;

    let task = {
        let b = Arc::clone(&b);
        tokio::spawn(async move { b.trigger().await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;

    // B is still loading but A is already quiet
    assert_eq!(b.state(), ButtonState::Loading);
    assert_eq!(a.state(), ButtonState::Idle);
    assert_eq!(backend.playing_count(), 0);

    task.await.unwrap();
    assert_eq!(backend.playing_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn toggling_back_to_first_button_replaces_second() {
    let backend = MockBackend::new();
    let coordinator = coordinator(&backend);
    let a = coordinator.button(sound(1));
    let b = coordinator.button(sound(2));

    a.trigger().await;
    b.trigger().await;
    assert_eq!(a.trigger().await, TriggerOutcome::Resumed);

    assert_eq!(a.state(), ButtonState::Playing);
    assert_eq!(b.state(), ButtonState::Idle);
    assert_eq!(backend.playing_count(), 1);
}

// ===== Latest wins =====

#[tokio::test(start_paused = true)]
async fn rapid_double_trigger_only_latest_registers() {
    let backend = MockBackend::new();
    backend.set(&media_url(1), Behavior::ready_after(40));
    let coordinator = coordinator(&backend);
    let mut events = coordinator.slot().subscribe();
    let button = Arc::new(coordinator.button(sound(1)));

    let first = {
        let button = Arc::clone(&button);
        tokio::spawn(async move { button.trigger().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    let second = {
        let button = Arc::clone(&button);
        tokio::spawn(async move { button.trigger().await })
    };

    assert_eq!(first.await.unwrap(), TriggerOutcome::Superseded);
    assert_eq!(second.await.unwrap(), TriggerOutcome::Started);

    // Two loads, one registration
    assert_eq!(backend.created_urls().len(), 2);
    let handle = button.handle().unwrap();
    let mut started = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let SlotEvent::Started { handle, .. } = event {
            started.push(handle);
        }
    }
    assert_eq!(started, vec![handle.id()]);
    assert_eq!(backend.playing_count(), 1);
    assert_eq!(button.state(), ButtonState::Playing);
}

#[tokio::test(start_paused = true)]
async fn trigger_on_other_button_does_not_supersede() {
    let backend = MockBackend::new();
    backend.set(&media_url(1), Behavior::ready_after(40));
    let coordinator = coordinator(&backend);
    let a = Arc::new(coordinator.button(sound(1)));
    let b = coordinator.button(sound(2));

    let task = {
        let a = Arc::clone(&a);
        tokio::spawn(async move { a.trigger().await })
    };
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(b.trigger().await, TriggerOutcome::Started);

    // A finishes its own load and takes over the slot
    assert_eq!(task.await.unwrap(), TriggerOutcome::Started);
    assert_eq!(a.state(), ButtonState::Playing);
    assert_eq!(b.state(), ButtonState::Idle);
    assert_eq!(backend.playing_count(), 1);
}

// ===== Absorbed failures =====

#[tokio::test(start_paused = true)]
async fn no_source_leaves_button_idle_without_loading() {
    let backend = MockBackend::new();
    let coordinator = coordinator(&backend);
    let button = coordinator.button(SoundRef::new(SoundId::new(9), "Silent"));

    assert_eq!(button.trigger().await, TriggerOutcome::NoSource);

    assert_eq!(button.state(), ButtonState::Idle);
    assert!(backend.created_urls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn all_candidates_failing_leaves_button_idle() {
    let backend = MockBackend::with_default(Behavior::fail_after(1, clipdeck_playback::ReadyState::HaveNothing));
    let counter = RecordingCounter::new();
    let coordinator = coordinator(&backend).with_play_counter(counter.clone());
    let button = coordinator.button(
        sound(1).with_object_storage_url("https://bucket.example.com/1.mp3"),
    );

    assert_eq!(button.trigger().await, TriggerOutcome::Failed);

    assert_eq!(button.state(), ButtonState::Idle);
    assert!(button.handle().is_none());
    assert_eq!(backend.created_urls().len(), 2);
    settle().await;
    assert!(counter.plays().is_empty());
}

#[tokio::test(start_paused = true)]
async fn refused_play_leaves_button_idle() {
    let backend = MockBackend::with_default(Behavior::RefusesPlay);
    let coordinator = coordinator(&backend);
    let button = coordinator.button(sound(1));

    assert_eq!(button.trigger().await, TriggerOutcome::Failed);
    assert_eq!(button.state(), ButtonState::Idle);
    assert!(coordinator.slot().is_empty());
}

#[tokio::test(start_paused = true)]
async fn counter_failure_does_not_block_playback() {
    let backend = MockBackend::new();
    let counter = RecordingCounter::failing();
    let coordinator = coordinator(&backend).with_play_counter(counter.clone());
    let button = coordinator.button(sound(1));

    assert_eq!(button.trigger().await, TriggerOutcome::Started);
    settle().await;

    assert_eq!(counter.plays().len(), 1);
    assert_eq!(button.state(), ButtonState::Playing);
}

#[tokio::test(start_paused = true)]
async fn invalidated_handle_is_resolved_again() {
    let backend = MockBackend::new();
    let coordinator = coordinator(&backend);
    let button = coordinator.button(sound(1));

    button.trigger().await;
    let element = backend.element(&media_url(1));
    element.pause();
    element.clear_source();

    assert_eq!(button.trigger().await, TriggerOutcome::Started);
    assert_eq!(backend.created_urls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn stop_all_silences_everything() {
    let backend = MockBackend::new();
    let coordinator = coordinator(&backend);
    let button = coordinator.button(sound(1));

    button.trigger().await;
    coordinator.stop_all();

    assert_eq!(button.state(), ButtonState::Idle);
    assert_eq!(backend.playing_count(), 0);
}
