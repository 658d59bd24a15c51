use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use futures::executor::block_on;
use tweenkit::prelude::*;

/// End-to-end behaviour of single tweens driven through the engine
#[cfg(test)]
mod engine_scenarios {
    use super::*;

    fn view_at(left: f64, top: f64) -> Rc<RefCell<ViewState>> {
        let _ = env_logger::builder().is_test(true).try_init();
        Rc::new(RefCell::new(ViewState::new(left, top, 100.0, 100.0)))
    }

    fn counter() -> (Rc<Cell<u32>>, impl FnOnce(&mut TweenEngine) + 'static) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        (count, move |_: &mut TweenEngine| inner.set(inner.get() + 1))
    }

    #[test]
    fn test_linear_blend_at_half_and_end() {
        let view = view_at(0.0, 0.0);
        let (fired, on_complete) = counter();
        let mut engine = TweenEngine::new();
        engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::Left, 10.0)
                    .duration_ms(1000)
                    .easing("linear")
                    .on_complete(on_complete),
            )
            .unwrap();

        engine.tick(500.0);
        assert_eq!(view.borrow().left, 5.0);
        assert_eq!(fired.get(), 0);

        engine.tick(500.0);
        assert_eq!(view.borrow().left, 10.0);
        assert_eq!(fired.get(), 1);

        engine.tick(500.0);
        assert_eq!(fired.get(), 1);
        assert!(engine.is_idle());
        assert!(!engine.is_animating(&view));
    }

    #[test]
    fn test_end_values_are_exact_for_every_curve() {
        let end = 0.1 + 0.2;
        for easing in Easing::NAMED {
            let view = view_at(13.0, 0.0);
            let (fired, on_complete) = counter();
            let mut engine = TweenEngine::new();
            engine
                .start(
                    TweenSpec::new(&view)
                        .to(PropertyKey::Left, end)
                        .to(PropertyKey::BackgroundColor, Color::rgba(0.2, 0.4, 0.6, 0.8))
                        .duration_ms(300)
                        .easing(easing)
                        .on_complete(on_complete),
                )
                .unwrap();
            for _ in 0..7 {
                engine.tick(45.0);
            }
            let view = view.borrow();
            assert_eq!(view.left, end, "{} left residue", easing);
            assert_eq!(
                view.background_color,
                Color::rgba(0.2, 0.4, 0.6, 0.8),
                "{} color residue",
                easing
            );
            assert_eq!(fired.get(), 1, "{} fired {} times", easing, fired.get());
        }
    }

    #[test]
    fn test_kill_all_stops_mutation_and_callbacks() {
        let view = view_at(0.0, 0.0);
        let (fired, on_complete) = counter();
        let mut engine = TweenEngine::new();
        let handle = engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::Top, 100.0)
                    .duration_ms(100)
                    .on_complete(on_complete),
            )
            .unwrap();
        let completion = engine.completion(handle).unwrap();

        engine.tick(50.0);
        assert_eq!(view.borrow().top, 50.0);
        engine.kill_all();
        assert!(engine.is_idle());
        assert!(!engine.is_animating(&view));

        for _ in 0..10 {
            engine.tick(50.0);
        }
        assert_eq!(view.borrow().top, 50.0);
        assert_eq!(fired.get(), 0);
        assert_eq!(block_on(completion), Outcome::Cancelled);

        // idle kill is a no-op
        engine.kill_all();
    }

    #[test]
    fn test_kill_all_from_completion_callback() {
        let view = view_at(0.0, 0.0);
        let other = view_at(0.0, 0.0);
        let mut engine = TweenEngine::new();
        engine
            .start(
                TweenSpec::new(&other)
                    .to(PropertyKey::Left, 100.0)
                    .duration_ms(1000),
            )
            .unwrap();
        engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::Left, 100.0)
                    .duration_ms(100)
                    .on_complete(|engine| engine.kill_all()),
            )
            .unwrap();

        engine.tick(100.0);
        assert_eq!(view.borrow().left, 100.0);
        assert_eq!(other.borrow().left, 10.0);
        assert!(engine.is_idle());

        engine.tick(100.0);
        assert_eq!(other.borrow().left, 10.0);
    }

    #[test]
    fn test_completion_future_resolves_once() {
        let view = view_at(0.0, 0.0);
        let mut engine = TweenEngine::new();
        let handle = engine
            .start(TweenSpec::new(&view).to(PropertyKey::Opacity, 0.0).duration_ms(20))
            .unwrap();
        let mut completion = engine.completion(handle).unwrap();
        assert_eq!(completion.try_outcome(), None);

        engine.tick(20.0);
        assert_eq!(completion.try_outcome(), Some(Outcome::Completed));
        assert!(engine.completion(handle).is_none());
    }

    #[test]
    fn test_cancel_individual_tween() {
        let view = view_at(0.0, 0.0);
        let (fired, on_complete) = counter();
        let mut engine = TweenEngine::new();
        let handle = engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::Width, 200.0)
                    .duration_ms(100)
                    .on_complete(on_complete),
            )
            .unwrap();
        let completion = engine.completion(handle).unwrap();

        engine.tick(25.0);
        assert!(engine.cancel(handle));
        assert!(!engine.cancel(handle));
        engine.tick(100.0);

        assert_eq!(view.borrow().width, 125.0);
        assert_eq!(fired.get(), 0);
        assert_eq!(block_on(completion), Outcome::Cancelled);
    }

    #[test]
    fn test_dropped_target_cancels_silently() {
        let view = view_at(0.0, 0.0);
        let (fired, on_complete) = counter();
        let mut engine = TweenEngine::new();
        let events = engine.subscribe();
        let handle = engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::Left, 10.0)
                    .duration_ms(100)
                    .on_complete(on_complete),
            )
            .unwrap();
        let completion = engine.completion(handle).unwrap();

        drop(view);
        engine.tick(100.0);
        assert!(engine.is_idle());
        assert_eq!(fired.get(), 0);
        assert_eq!(block_on(completion), Outcome::Cancelled);

        let received: Vec<AnimationEvent> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                AnimationEvent::Started(handle),
                AnimationEvent::Cancelled(handle)
            ]
        );
    }

    #[test]
    fn test_dropped_target_cancels_during_delay() {
        let view = view_at(0.0, 0.0);
        let mut engine = TweenEngine::new();
        let handle = engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::Left, 10.0)
                    .duration_ms(100)
                    .delay_ms(1000),
            )
            .unwrap();
        let completion = engine.completion(handle).unwrap();

        drop(view);
        engine.tick(10.0);
        assert_eq!(engine.active_tween_count(), 0);
        assert_eq!(engine.animated_target_count(), 0);
        assert!(engine.is_idle());
        assert_eq!(block_on(completion), Outcome::Cancelled);
    }

    #[test]
    fn test_unsupported_value_kind_fails_without_stopping_others() {
        let view = view_at(0.0, 0.0);
        let mut engine = TweenEngine::new();
        let events = engine.subscribe();
        let bad = engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::Opacity, Color::WHITE)
                    .duration_ms(100),
            )
            .unwrap();
        engine
            .start(TweenSpec::new(&view).to(PropertyKey::Top, 100.0).duration_ms(100))
            .unwrap();

        engine.tick(50.0);
        assert!(!engine.is_active(bad));
        assert_eq!(view.borrow().opacity, 1.0);
        assert_eq!(view.borrow().top, 50.0);
        assert!(events
            .try_iter()
            .any(|e| matches!(e, AnimationEvent::Failed { handle, .. } if handle == bad)));
    }

    #[test]
    fn test_submission_errors() {
        let view = view_at(0.0, 0.0);
        let mut engine = TweenEngine::new();

        let err = engine
            .start(TweenSpec::new(&view).to(PropertyKey::Top, 1.0))
            .unwrap_err();
        assert!(matches!(err, TweenError::InvalidDuration(0)));

        let err = engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::Top, 1.0)
                    .duration_ms(10)
                    .easing("ease-sideways"),
            )
            .unwrap_err();
        assert!(matches!(err, TweenError::UnknownEasingKind(_)));

        let err = engine
            .start(TweenSpec::new(&view).to("sparkle", 1.0).duration_ms(10))
            .unwrap_err();
        assert!(matches!(err, TweenError::UnknownProperty(_)));

        let gone = view_at(0.0, 0.0);
        let spec = TweenSpec::new(&gone).to(PropertyKey::Top, 1.0).duration_ms(10);
        drop(gone);
        assert!(matches!(engine.start(spec), Err(TweenError::StaleTarget)));

        assert!(engine.is_idle());
        assert!(!engine.is_animating(&view));
    }

    #[test]
    fn test_pause_and_resume() {
        let view = view_at(0.0, 0.0);
        let mut engine = TweenEngine::new();
        let handle = engine
            .start(TweenSpec::new(&view).to(PropertyKey::Left, 100.0).duration_ms(100))
            .unwrap();

        engine.tick(20.0);
        assert!(engine.pause(handle));
        assert!(engine.is_paused(handle));
        engine.tick(500.0);
        assert_eq!(view.borrow().left, 20.0);
        assert_eq!(engine.progress(handle), Some(0.2));

        assert!(engine.resume(handle));
        engine.tick(30.0);
        assert_eq!(view.borrow().left, 50.0);
    }

    #[test]
    fn test_delay_postpones_mutation() {
        let view = view_at(0.0, 0.0);
        let mut engine = TweenEngine::new();
        engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::Left, 100.0)
                    .duration_ms(100)
                    .delay_ms(200),
            )
            .unwrap();

        engine.tick(100.0);
        engine.tick(100.0);
        assert_eq!(view.borrow().left, 0.0);
        engine.tick(50.0);
        assert_eq!(view.borrow().left, 50.0);
    }

    #[test]
    fn test_start_value_captured_at_start() {
        let view = view_at(40.0, 0.0);
        let mut engine = TweenEngine::new();
        engine
            .start(TweenSpec::new(&view).to(PropertyKey::Left, 80.0).duration_ms(100))
            .unwrap();
        // moved by someone else before the first frame
        view.borrow_mut().left = 0.0;
        engine.tick(50.0);
        assert_eq!(view.borrow().left, 60.0);
    }

    #[test]
    fn test_explicit_start_value() {
        let view = view_at(40.0, 0.0);
        let mut engine = TweenEngine::new();
        engine
            .start(
                TweenSpec::new(&view)
                    .from_to(PropertyKey::Left, 0.0, 10.0)
                    .duration_ms(100),
            )
            .unwrap();
        engine.tick(50.0);
        assert_eq!(view.borrow().left, 5.0);
    }

    #[test]
    fn test_rotation_crosses_the_seam() {
        let view = view_at(0.0, 0.0);
        view.borrow_mut().rotation = 350.0;
        let mut engine = TweenEngine::new();
        engine
            .start(TweenSpec::new(&view).to(PropertyKey::Rotation, 10.0).duration_ms(100))
            .unwrap();
        engine.tick(50.0);
        assert_eq!(view.borrow().rotation, 360.0);
        engine.tick(50.0);
        assert_eq!(view.borrow().rotation, 10.0);
    }

    #[test]
    fn test_transform_reaches_end_with_translation() {
        let view = view_at(0.0, 0.0);
        let end = Transform::new(2.0, 2.0, 45.0, Point::new(10.0, 20.0));
        let mut engine = TweenEngine::new();
        engine
            .start(TweenSpec::new(&view).to(PropertyKey::Transform, end).duration_ms(100))
            .unwrap();

        engine.tick(50.0);
        assert_eq!(view.borrow().translation, Point::new(5.0, 10.0));
        engine.tick(50.0);
        assert_eq!(view.borrow().transform(), end);
        assert_eq!(view.borrow().translation, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_hex_colors_animate() {
        let view = view_at(0.0, 0.0);
        let mut engine = TweenEngine::new();
        engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::BackgroundColor, Color::from_hex("#FF0000").unwrap())
                    .to(PropertyKey::BorderColor, Color::from_hex("#80000000").unwrap())
                    .to(PropertyKey::TextColor, Color::from_hex("#fff").unwrap())
                    .duration_ms(100),
            )
            .unwrap();
        engine.tick(100.0);
        let view = view.borrow();
        assert_eq!(view.background_color, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(view.border_color.to_rgba8(), [0, 0, 0, 0x80]);
        assert_eq!(view.text_color, Color::WHITE);
    }

    #[test]
    fn test_kill_target_leaves_other_targets() {
        let a = view_at(0.0, 0.0);
        let b = view_at(0.0, 0.0);
        let mut engine = TweenEngine::new();
        engine
            .start(TweenSpec::new(&a).to(PropertyKey::Left, 100.0).duration_ms(100))
            .unwrap();
        engine
            .start(TweenSpec::new(&a).to(PropertyKey::Top, 100.0).duration_ms(100))
            .unwrap();
        engine
            .start(TweenSpec::new(&b).to(PropertyKey::Left, 100.0).duration_ms(100))
            .unwrap();
        assert_eq!(engine.active_handles(&a).len(), 2);
        assert_eq!(engine.animated_target_count(), 2);

        assert_eq!(engine.kill_target(&a), 2);
        assert!(!engine.is_animating(&a));
        assert!(engine.is_animating(&b));

        engine.tick(100.0);
        assert_eq!(a.borrow().left, 0.0);
        assert_eq!(b.borrow().left, 100.0);
    }

    #[test]
    fn test_tween_started_in_callback_waits_for_next_tick() {
        let view = view_at(0.0, 0.0);
        let follow_up = view.clone();
        let mut engine = TweenEngine::new();
        engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::Left, 100.0)
                    .duration_ms(100)
                    .on_complete(move |engine| {
                        engine
                            .start(
                                TweenSpec::new(&follow_up)
                                    .to(PropertyKey::Top, 100.0)
                                    .duration_ms(100),
                            )
                            .unwrap();
                    }),
            )
            .unwrap();

        engine.tick(100.0);
        assert_eq!(view.borrow().top, 0.0);
        assert_eq!(engine.active_tween_count(), 1);
        engine.tick(50.0);
        assert_eq!(view.borrow().top, 50.0);
    }

    #[test]
    fn test_on_update_reports_linear_progress() {
        let view = view_at(0.0, 0.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut engine = TweenEngine::new();
        engine
            .start(
                TweenSpec::new(&view)
                    .to(PropertyKey::Left, 100.0)
                    .duration_ms(100)
                    .easing(Easing::InQuad)
                    .on_update(move |progress| sink.borrow_mut().push(progress)),
            )
            .unwrap();
        for _ in 0..4 {
            engine.tick(25.0);
        }
        assert_eq!(*seen.borrow(), vec![0.25, 0.5, 0.75, 1.0]);
        assert_eq!(view.borrow().left, 100.0);
    }

    #[test]
    fn test_configured_default_easing() {
        let options = EngineOptions::from_json_str(r#"{ "defaults": { "easing": "InQuad" } }"#)
            .unwrap();
        let view = view_at(0.0, 0.0);
        let mut engine = TweenEngine::with_options(options);
        engine
            .start(TweenSpec::new(&view).to(PropertyKey::Left, 100.0).duration_ms(100))
            .unwrap();
        engine.tick(50.0);
        assert_eq!(view.borrow().left, 25.0);
    }

    #[test]
    fn test_update_uses_frame_clock() {
        let view = view_at(0.0, 0.0);
        let mut engine = TweenEngine::with_profile(EngineProfile::HighRefresh);
        engine
            .start(TweenSpec::new(&view).to(PropertyKey::Left, 100.0).duration_ms(60_000))
            .unwrap();
        assert_eq!(engine.update(), 0.0);
        let dt = engine.update();
        assert!(dt <= engine.options().frame.max_frame_delta_ms);
        assert_eq!(engine.frame_count(), 2);
    }
}
