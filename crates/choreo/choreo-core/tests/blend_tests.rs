use approx::assert_abs_diff_eq;
use choreo_core::{Choreographer, ChoreoError, ChoreoEvent, ClipId, Config};
use choreo_test_fixtures::ScriptedClip;

const DT: f32 = 1.0 / 60.0;

fn engine_with_pair(
    from_duration: u32,
    to_duration: u32,
) -> (Choreographer, ScriptedClip, ClipId, ScriptedClip, ClipId) {
    let mut engine = Choreographer::new(Config::default());
    let from = ScriptedClip::new(from_duration);
    from.start(true);
    let to = ScriptedClip::new(to_duration);
    let from_id = engine.register_clip(Box::new(from.clone()));
    let to_id = engine.register_clip(Box::new(to.clone()));
    (engine, from, from_id, to, to_id)
}

/// it should reject step sizes outside (0, 1] without touching the clips
#[test]
fn rejects_bad_step_sizes() {
    let (mut engine, from, from_id, to, to_id) = engine_with_pair(200, 160);
    for step in [0.0, -0.25, 1.5, f32::NAN] {
        let err = engine.begin_blend(from_id, to_id, step).unwrap_err();
        assert!(matches!(err, ChoreoError::InvalidStepSize { .. }));
    }
    assert_eq!(engine.active_blends(), 0);
    assert!(from.weight_log().is_empty());
    assert!(to.weight_log().is_empty());
}

/// it should reject unknown clips at call time
#[test]
fn rejects_unknown_clips() {
    let (mut engine, _from, from_id, _to, _to_id) = engine_with_pair(200, 160);
    let bogus = ClipId(99);
    let err = engine.begin_blend(from_id, bogus, 0.01).unwrap_err();
    assert_eq!(err, ChoreoError::ClipNotFound { clip: bogus });
}

/// it should reach a full cross-fade after exactly 100 ticks at step 0.01
#[test]
fn full_blend_after_100_ticks() {
    let (mut engine, idle, idle_id, run, run_id) = engine_with_pair(200, 160);
    let blend = engine.begin_blend(idle_id, run_id, 0.01).unwrap();

    // Nothing is applied until the first tick.
    assert_eq!(run.play_calls(), 0);

    for _ in 0..99 {
        engine.tick(DT);
    }
    assert!(run.weight() < 1.0);
    assert!(idle.weight() > 0.0);

    let out = engine.tick(DT);
    assert_eq!(run.weight(), 1.0);
    assert_eq!(idle.weight(), 0.0);
    assert!(out
        .events
        .contains(&ChoreoEvent::BlendCompleted { blend }));

    // The target clip was started exactly once, in looping mode.
    assert_eq!(run.play_calls(), 1);
    assert!(run.last_played_looping());

    // Terminal blends stop consuming ticks: no further weight writes.
    let writes = run.weight_log().len();
    engine.tick(DT);
    engine.tick(DT);
    assert_eq!(run.weight_log().len(), writes);
    assert_eq!(engine.active_blends(), 0);
}

/// it should finish in ceil(1/step) ticks for a range of step sizes
#[test]
fn completes_in_ceil_inverse_step_ticks() {
    for step in [0.1_f32, 0.25, 1.0 / 3.0, 0.5, 0.7, 1.0] {
        let (mut engine, from, from_id, to, to_id) = engine_with_pair(200, 160);
        engine.begin_blend(from_id, to_id, step).unwrap();
        let ticks = (1.0 / step).ceil() as u32;
        for _ in 0..(ticks - 1) {
            engine.tick(DT);
        }
        assert!(
            to.weight() < 1.0,
            "step {step}: blend finished a tick early"
        );
        engine.tick(DT);
        assert_eq!(to.weight(), 1.0, "step {step}");
        assert_eq!(from.weight(), 0.0, "step {step}");
        assert_eq!(engine.active_blends(), 0, "step {step}");
    }
}

/// it should ramp monotonically: target up, source down
#[test]
fn ramp_is_monotonic() {
    let (mut engine, idle, idle_id, run, run_id) = engine_with_pair(200, 160);
    engine.begin_blend(idle_id, run_id, 0.05).unwrap();
    for _ in 0..20 {
        engine.tick(DT);
    }
    let up = run.weight_log();
    assert!(up.windows(2).all(|w| w[1] >= w[0]));
    let down = idle.weight_log();
    assert!(down.windows(2).all(|w| w[1] <= w[0]));
}

/// it should abort and freeze weights when a clip disappears mid-blend
#[test]
fn aborts_when_clip_removed() {
    let (mut engine, idle, idle_id, run, run_id) = engine_with_pair(200, 160);
    let blend = engine.begin_blend(idle_id, run_id, 0.01).unwrap();
    for _ in 0..50 {
        engine.tick(DT);
    }
    assert_abs_diff_eq!(run.weight(), 0.5, epsilon = 1e-4);

    engine.remove_clip(idle_id);
    let out = engine.tick(DT);
    assert!(out.events.contains(&ChoreoEvent::BlendAborted {
        blend,
        error: ChoreoError::ClipUnavailable { clip: idle_id },
    }));
    assert_eq!(engine.active_blends(), 0);

    // The surviving clip keeps its last-set weight: a frozen cross-fade.
    assert_abs_diff_eq!(run.weight(), 0.5, epsilon = 1e-4);
    let writes = run.weight_log().len();
    engine.tick(DT);
    assert_eq!(run.weight_log().len(), writes);
}

/// it should run concurrent blends on disjoint clips independently
#[test]
fn concurrent_blends_are_independent() {
    let mut engine = Choreographer::new(Config::default());
    let a = ScriptedClip::new(100);
    let b = ScriptedClip::new(100);
    let c = ScriptedClip::new(100);
    let d = ScriptedClip::new(100);
    let a_id = engine.register_clip(Box::new(a.clone()));
    let b_id = engine.register_clip(Box::new(b.clone()));
    let c_id = engine.register_clip(Box::new(c.clone()));
    let d_id = engine.register_clip(Box::new(d.clone()));

    engine.begin_blend(a_id, b_id, 0.5).unwrap();
    engine.begin_blend(c_id, d_id, 0.25).unwrap();

    engine.tick(DT);
    engine.tick(DT);
    // First blend finished in 2 ticks; second is halfway.
    assert_eq!(b.weight(), 1.0);
    assert_eq!(a.weight(), 0.0);
    assert_abs_diff_eq!(d.weight(), 0.5, epsilon = 1e-5);
    assert_eq!(engine.active_blends(), 1);

    engine.tick(DT);
    engine.tick(DT);
    assert_eq!(d.weight(), 1.0);
    assert_eq!(c.weight(), 0.0);
    assert_eq!(engine.active_blends(), 0);
}
