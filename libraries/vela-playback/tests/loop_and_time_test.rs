//! Time reporting, seeking, looping and rate tests

mod common;

use common::{ready_asset, ready_harness, EngineCall, Harness, MockEngine, COARSE, FINE};
use vela_core::{Asset, EngineSignal, PitchAlgorithm, SeekRequest};
use vela_playback::{PlaybackState, PlayerEvent};

fn looping_harness(start: f64, end: f64) -> Harness {
    let mut harness = ready_harness();
    harness.controller.set_should_loop(true);
    harness.controller.set_loop_start(start);
    harness.controller.set_loop_end(end);
    harness.controller.play();
    harness.forget();
    harness
}

// ===== Time Reporting =====

#[test]
fn coarse_tick_updates_time() {
    let mut harness = ready_harness();
    harness.controller.play();
    harness.forget();

    harness.tick(COARSE, 75.4);

    assert_eq!(harness.controller.current_time(), 75.4);
    assert_eq!(harness.controller.current_time_text(), "01:15");
    assert_eq!(
        harness.listener.events(),
        vec![PlayerEvent::CurrentTimeChanged {
            seconds: 75.4,
            text: "01:15".into()
        }]
    );
}

#[test]
fn fine_tick_reports_fine_grained_time() {
    let mut harness = ready_harness();
    harness.controller.play();
    harness.forget();

    harness.tick(FINE, 3.25);

    assert_eq!(
        harness.listener.events(),
        vec![
            PlayerEvent::CurrentTimeChanged {
                seconds: 3.25,
                text: "00:03".into()
            },
            PlayerEvent::CurrentTimeChangedFine {
                seconds: 3.25,
                text: "00:03".into()
            },
        ]
    );
}

#[test]
fn ticks_are_skipped_while_finished() {
    let mut harness = ready_harness();
    harness.controller.play();
    harness.send(EngineSignal::PlayedToEnd);
    harness.forget();

    harness.tick(COARSE, 59.0);
    harness.tick(FINE, 59.5);

    assert!(harness.listener.events().is_empty());
    assert_eq!(harness.controller.current_time(), 0.0);
}

#[test]
fn ticks_from_released_observers_are_ignored() {
    let mut harness = ready_harness();
    let old_fine = harness.engine.periodic_observer(FINE);

    harness.load(ready_asset("https://cdn.example.com/next.mp3", 30.0));
    harness.forget();
    harness.send(EngineSignal::PeriodicTick {
        observer: old_fine,
        elapsed: 12.0,
    });

    assert!(harness.listener.events().is_empty());
    assert_eq!(harness.controller.current_time(), 0.0);
}

// ===== Seeking =====

#[test]
fn seek_without_asset_is_ignored() {
    let mut harness = Harness::new();

    harness.controller.seek_to(10.0);

    assert_eq!(
        harness
            .engine
            .count(|c| matches!(c, EngineCall::Seek { .. })),
        0
    );
}

#[test]
fn completed_seek_reports_new_time() {
    let mut harness = ready_harness();

    harness.controller.seek_to(42.0);
    harness.controller.process_pending();

    assert_eq!(harness.controller.current_time(), 42.0);
    assert_eq!(
        harness.listener.events(),
        vec![PlayerEvent::CurrentTimeChanged {
            seconds: 42.0,
            text: "00:42".into()
        }]
    );
}

#[test]
fn only_latest_seek_completion_counts() {
    let mut harness = Harness::with_engine(|log| MockEngine::new(log).manual_seeks());
    harness.load(ready_asset("https://cdn.example.com/track.mp3", 60.0));
    harness.forget();

    harness.controller.seek_to(10.0);
    harness.controller.seek_to(20.0);
    let requests: Vec<SeekRequest> = harness
        .engine
        .calls()
        .iter()
        .filter_map(|c| match c {
            EngineCall::Seek { request, .. } => Some(*request),
            _ => None,
        })
        .collect();
    assert_eq!(requests.len(), 2);

    harness.send(EngineSignal::SeekCompleted {
        request: requests[0],
        finished: false,
    });
    assert!(harness.listener.events().is_empty());

    harness.send(EngineSignal::SeekCompleted {
        request: requests[1],
        finished: true,
    });
    assert_eq!(harness.controller.current_time(), 20.0);
}

#[test]
fn seek_and_rate_during_validation_are_ignored() {
    let mut harness = Harness::new();
    harness
        .controller
        .setup(Asset::new("https://cdn.example.com/track.mp3"), false);

    harness.controller.seek_to(30.0);
    harness.controller.set_rate(1.5);
    harness.controller.process_pending();

    assert_eq!(
        harness
            .engine
            .count(|c| matches!(c, EngineCall::Seek { .. } | EngineCall::SetRate(_))),
        0
    );
    assert_eq!(harness.controller.rate(), 1.0);

    let ticket = harness.engine.last_ticket();
    harness.resolve(ticket, ready_asset("https://cdn.example.com/track.mp3", 60.0));

    assert_eq!(harness.controller.state(), &PlaybackState::Uninitialized);
    assert_eq!(harness.controller.current_time(), 0.0);
    assert_eq!(harness.controller.rate(), 1.0);
}

// ===== Looping =====

#[test]
fn loop_end_restarts_from_loop_start() {
    let mut harness = looping_harness(5.0, 20.0);

    harness.tick(FINE, 20.0);

    assert!(harness.controller.state().is_playing());
    assert_eq!(harness.controller.current_time(), 5.0);
    assert_eq!(harness.controller.current_time_text(), "00:05");
    assert_eq!(harness.listener.count(|e| *e == PlayerEvent::PlaybackEnded), 0);

    let transitions: Vec<(PlaybackState, PlaybackState)> = harness
        .listener
        .events()
        .into_iter()
        .filter_map(|e| match e {
            PlayerEvent::StateChanged { previous, current } => Some((previous, current)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transitions,
        vec![
            (PlaybackState::Playing, PlaybackState::Finished),
            (PlaybackState::Finished, PlaybackState::Playing),
        ]
    );

    assert!(harness
        .engine
        .calls()
        .iter()
        .any(|c| matches!(c, EngineCall::Seek { seconds, .. } if *seconds == 5.0)));
}

#[test]
fn disabling_loop_before_restart_completes_stays_finished() {
    let mut harness = Harness::with_engine(|log| MockEngine::new(log).manual_seeks());
    harness.load(ready_asset("https://cdn.example.com/track.mp3", 60.0));
    harness.controller.set_should_loop(true);
    harness.controller.set_loop_start(5.0);
    harness.controller.set_loop_end(20.0);
    harness.controller.play();
    harness.forget();

    harness.tick(FINE, 20.0);
    assert_eq!(harness.controller.state(), &PlaybackState::Finished);
    let request = harness
        .engine
        .calls()
        .iter()
        .find_map(|c| match c {
            EngineCall::Seek { seconds, request } if *seconds == 5.0 => Some(*request),
            _ => None,
        })
        .expect("loop restart seek issued");

    harness.controller.set_should_loop(false);
    harness.send(EngineSignal::SeekCompleted {
        request,
        finished: true,
    });

    assert_eq!(harness.controller.state(), &PlaybackState::Finished);
    assert_eq!(harness.controller.current_time(), 5.0);
}

#[test]
fn coarse_tick_past_loop_end_does_not_finish() {
    let mut harness = looping_harness(0.0, 20.0);

    harness.tick(COARSE, 21.0);

    assert!(harness.controller.state().is_playing());
}

#[test]
fn end_of_media_while_looping_restarts() {
    let mut harness = looping_harness(3.0, 60.0);

    harness.send(EngineSignal::PlayedToEnd);

    assert!(harness.controller.state().is_playing());
    assert_eq!(harness.controller.current_time(), 3.0);
    assert_eq!(harness.listener.count(|e| *e == PlayerEvent::PlaybackEnded), 0);
}

#[test]
fn loop_end_is_clamped_to_duration() {
    let mut harness = ready_harness();

    harness.controller.set_loop_end(100.0);
    assert_eq!(harness.controller.loop_config().end_time(), Some(60.0));

    harness.controller.set_loop_end(-4.0);
    assert_eq!(harness.controller.loop_config().end_time(), Some(0.0));
}

#[test]
fn loop_end_without_duration_keeps_previous_value() {
    let mut harness = ready_harness();
    harness.controller.set_loop_end(30.0);

    harness.controller.setup(Asset::new("https://cdn.example.com/live"), false);
    assert_eq!(harness.controller.duration(), 0.0);
    harness.controller.set_loop_end(10.0);

    assert_eq!(harness.controller.loop_config().end_time(), Some(30.0));
}

#[test]
fn negative_loop_start_resets_to_zero() {
    let mut harness = ready_harness();

    harness.controller.set_loop_start(7.5);
    assert_eq!(harness.controller.loop_config().start_time(), 7.5);

    harness.controller.set_loop_start(-1.0);
    assert_eq!(harness.controller.loop_config().start_time(), 0.0);
}

#[test]
fn shorter_duration_pulls_loop_end_back() {
    let mut harness = ready_harness();
    harness.controller.set_loop_end(50.0);

    harness.send(EngineSignal::DurationChanged(40.0));

    assert_eq!(harness.controller.loop_config().end_time(), Some(40.0));
}

// ===== Rate =====

#[test]
fn rate_selects_pitch_algorithm() {
    let mut harness = ready_harness();

    for (rate, expected) in [
        (1.5, PitchAlgorithm::TimeDomain),
        (2.0, PitchAlgorithm::TimeDomain),
        (2.5, PitchAlgorithm::Spectral),
    ] {
        harness.controller.set_rate(rate);
        assert_eq!(harness.controller.pitch_algorithm(), expected);
        assert_eq!(harness.engine.last_pitch_algorithm(), Some(expected));
    }
}

#[test]
fn rate_without_asset_is_ignored() {
    let mut harness = Harness::new();

    harness.controller.set_rate(3.0);

    assert_eq!(harness.controller.rate(), 1.0);
    assert!(harness.engine.calls().is_empty());
}

#[test]
fn rate_reaches_engine_when_playing() {
    let mut harness = ready_harness();

    harness.controller.set_rate(1.5);
    assert_eq!(
        harness
            .engine
            .count(|c| matches!(c, EngineCall::SetRate(_))),
        0
    );

    harness.controller.play();
    assert!(harness.engine.calls().contains(&EngineCall::Play(1.5)));

    harness.controller.set_rate(0.75);
    assert!(harness.engine.calls().contains(&EngineCall::SetRate(0.75)));
}
