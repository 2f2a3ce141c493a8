use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pixelplane_core::Bounds;
use pixelplane_render::session::POLL_INTERVAL;
use pixelplane_render::{FrameBuffer, PlotSession, Rgba, ViewportState};

const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Poll `cond` until it holds or the timeout runs out.
fn wait_for(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + SETTLE_TIMEOUT;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    cond()
}

/// One shade per unit-wide vertical strip of the plane.
fn strips(x: f64, _y: f64) -> Rgba {
    Rgba::rgb(x.floor().rem_euclid(256.0) as u8, 0, 0)
}

/// A view that lies entirely inside strip `k`.
fn strip_view(k: i32) -> Bounds {
    let x = f64::from(k);
    Bounds::new(x, x + 0.5, -1.0, 1.0).unwrap()
}

fn is_uniform(frame: &FrameBuffer) -> bool {
    let mut px = frame.pixels().chunks_exact(4);
    let first = px.next();
    px.all(|p| Some(p) == first)
}

fn session(bounds: Bounds, w: u32, h: u32) -> PlotSession {
    let state = Arc::new(ViewportState::new(bounds, w, h).unwrap());
    PlotSession::spawn(state, strips).unwrap()
}

#[test]
fn first_frame_is_published() {
    let session = session(strip_view(3), 32, 16);
    let state = Arc::clone(session.state());

    assert!(wait_for(|| state.frame_seq() >= 1));
    state.with_frame(|f| {
        assert!(f.has_dims(32, 16));
        assert_eq!(f.pixel(0, 0), Rgba::rgb(3, 0, 0));
        assert_eq!(f.pixel(31, 15), Rgba::rgb(3, 0, 0));
    });
    assert!(session.stats().published() >= 1);
}

#[test]
fn burst_of_view_changes_settles_on_the_last() {
    let session = session(strip_view(0), 64, 48);
    let state = Arc::clone(session.state());

    for k in 1..=50 {
        session.view_changed(strip_view(k));
    }

    assert!(wait_for(|| state.with_frame(|f| f.pixel(0, 0) == Rgba::rgb(50, 0, 0))));
    state.with_frame(|f| assert!(is_uniform(f)));
    assert_eq!(state.read_bounds_and_dims().0, strip_view(50));
}

#[test]
fn frames_are_never_torn_under_random_resizes() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let session = session(strip_view(0), 40, 30);
    let state = Arc::clone(session.state());
    let mut last_k = 0;

    for _ in 0..300 {
        last_k = rng.gen_range(0..200);
        if rng.gen_bool(0.3) {
            let w = rng.gen_range(1..=96);
            let h = rng.gen_range(1..=96);
            session.resized(strip_view(last_k), w, h).unwrap();
        } else {
            session.view_changed(strip_view(last_k));
        }

        // Only this thread changes dimensions, so they can't move between
        // the two reads below.
        let (_, w, h) = state.read_bounds_and_dims();
        state.with_frame(|f| {
            assert!(f.is_consistent());
            assert!(f.has_dims(w, h), "front buffer does not match {w}×{h}");
            assert!(is_uniform(f), "front buffer mixes two passes");
        });

        if rng.gen_bool(0.1) {
            std::thread::sleep(Duration::from_micros(rng.gen_range(0..500)));
        }
    }

    let expected = Rgba::rgb(last_k as u8, 0, 0);
    assert!(wait_for(|| state.with_frame(|f| f.pixel(0, 0) == expected)));
    assert!(state.with_frame(is_uniform));
}

#[test]
fn resize_keeps_old_picture_until_recomputed() {
    // A shader that never matches the backdrop makes the resampled frame
    // distinguishable from a fresh allocation.
    let state = Arc::new(ViewportState::new(strip_view(7), 8, 8).unwrap());
    let session = PlotSession::spawn(Arc::clone(&state), strips).unwrap();
    assert!(wait_for(|| state.frame_seq() >= 1));

    session.resized(strip_view(7), 16, 4).unwrap();
    state.with_frame(|f| {
        assert!(f.has_dims(16, 4));
        assert_eq!(f.pixel(15, 3), Rgba::rgb(7, 0, 0));
    });
}

#[test]
fn zero_sized_resize_is_rejected() {
    let session = session(strip_view(0), 8, 8);
    assert!(session.resized(strip_view(0), 0, 8).is_err());
    assert_eq!(session.state().read_bounds_and_dims().1, 8);
}

#[test]
fn shutdown_joins_worker() {
    let mut session = session(strip_view(1), 16, 16);
    assert!(wait_for(|| session.state().frame_seq() >= 1));
    assert!(session.is_alive());

    session.shutdown().unwrap();
    assert!(!session.is_alive());
    // Idempotent.
    session.shutdown().unwrap();
}

#[test]
fn shutdown_interrupts_a_long_pass() {
    // 400 one-pixel rows at 20 ms each: a full pass takes seconds.
    let slow = |_x: f64, _y: f64| {
        std::thread::sleep(Duration::from_millis(20));
        Rgba::BLACK
    };
    let state = Arc::new(ViewportState::new(strip_view(0), 1, 400).unwrap());
    let mut session = PlotSession::spawn(Arc::clone(&state), slow).unwrap();
    std::thread::sleep(Duration::from_millis(100));

    let start = Instant::now();
    session.shutdown().unwrap();
    let took = start.elapsed();
    assert!(
        took < POLL_INTERVAL * 4,
        "shutdown took {took:?} with a pass in flight"
    );
    assert_eq!(state.frame_seq(), 0, "the interrupted pass must not publish");
}

#[test]
fn requested_shutdown_stops_idle_worker() {
    let session = session(strip_view(1), 16, 16);
    let state = Arc::clone(session.state());
    assert!(wait_for(|| state.frame_seq() >= 1));

    state.request_shutdown();
    assert!(wait_for(|| !session.is_alive()));
    drop(session);
}
