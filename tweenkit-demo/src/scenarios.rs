//! The demo buttons, one scenario each
//!
//! Follow-ups that the mobile harness scheduled with a timer inside a
//! completion callback are written here as plain async continuations: await
//! the completion future, sleep, start the next tween.

use std::{cell::RefCell, rc::Rc, time::Duration};

use anyhow::Result;
use tweenkit::prelude::*;

use crate::stage::Stage;

pub type SharedEngine = Rc<RefCell<TweenEngine>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Background,
    TextColor,
    Rainbow,
    Bounce,
    Elastic,
    CornerSpin,
    MaterialShadow,
    ColoredShadow,
    Serial,
    Parallel,
    Pulse,
    Shake,
    FadeOut,
    Reset,
    KillAll,
}

impl Scenario {
    pub const ALL: [Scenario; 15] = [
        Scenario::Background,
        Scenario::TextColor,
        Scenario::Rainbow,
        Scenario::Bounce,
        Scenario::Elastic,
        Scenario::CornerSpin,
        Scenario::MaterialShadow,
        Scenario::ColoredShadow,
        Scenario::Serial,
        Scenario::Parallel,
        Scenario::Pulse,
        Scenario::Shake,
        Scenario::FadeOut,
        Scenario::Reset,
        Scenario::KillAll,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Scenario::Background => "background",
            Scenario::TextColor => "text-color",
            Scenario::Rainbow => "rainbow",
            Scenario::Bounce => "bounce",
            Scenario::Elastic => "elastic",
            Scenario::CornerSpin => "corner-spin",
            Scenario::MaterialShadow => "material-shadow",
            Scenario::ColoredShadow => "colored-shadow",
            Scenario::Serial => "serial",
            Scenario::Parallel => "parallel",
            Scenario::Pulse => "pulse",
            Scenario::Shake => "shake",
            Scenario::FadeOut => "fade-out",
            Scenario::Reset => "reset",
            Scenario::KillAll => "kill-all",
        }
    }

    pub fn from_name(name: &str) -> Option<Scenario> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Every scenario starts from a clean engine, like a button press.
    pub async fn run(self, engine: &SharedEngine, stage: &Stage) -> Result<()> {
        engine.borrow_mut().kill_all();
        let p = &stage.palette;

        match self {
            Scenario::Background => {
                let first = start(
                    engine,
                    TweenSpec::new(&stage.box1)
                        .to("backgroundColor", Color::from_hex("#9333EA")?)
                        .duration_ms(800)
                        .easing("EASE_IN_OUT_SINE"),
                )?;
                follow_up(
                    engine,
                    first,
                    500,
                    TweenSpec::new(&stage.box1)
                        .to("backgroundColor", p.primary)
                        .duration_ms(800)
                        .easing(Easing::InOutSine),
                )
                .await?;
            }
            Scenario::TextColor => {
                let first = start(
                    engine,
                    TweenSpec::new(&stage.label)
                        .to(PropertyKey::TextColor, p.warning)
                        .duration_ms(600)
                        .easing(Easing::OutCubic),
                )?;
                follow_up(
                    engine,
                    first,
                    800,
                    TweenSpec::new(&stage.label)
                        .to(PropertyKey::TextColor, p.text_primary)
                        .duration_ms(600)
                        .easing(Easing::InCubic),
                )
                .await?;
            }
            Scenario::Rainbow => {
                let mut colors = Vec::new();
                for hex in ["#EF4444", "#F59E0B", "#10B981", "#3B82F6", "#8B5CF6"] {
                    colors.push(Color::from_hex(hex)?);
                }
                colors.push(p.success);
                let steps = colors.into_iter().map(|color| {
                    TweenSpec::new(&stage.box2)
                        .to(PropertyKey::BackgroundColor, color)
                        .duration_ms(300)
                });
                run_sequence(engine, SequenceSpec::serial().steps(steps)).await?;
            }
            Scenario::Bounce => {
                let handle = start(
                    engine,
                    TweenSpec::new(&stage.box1)
                        .to(PropertyKey::Top, 80.0)
                        .duration_ms(1000)
                        .easing(Easing::OutBounce),
                )?;
                finished(engine, handle).await;
            }
            Scenario::Elastic => {
                let handle = start(
                    engine,
                    TweenSpec::new(&stage.box2)
                        .to(PropertyKey::ScaleX, 1.5)
                        .to(PropertyKey::ScaleY, 1.5)
                        .to(PropertyKey::Rotation, 180.0)
                        .rotation(RotationDirection::Direct)
                        .duration_ms(1200)
                        .easing(Easing::OutElastic),
                )?;
                finished(engine, handle).await;
            }
            Scenario::CornerSpin => {
                let spin = SequenceSpec::serial()
                    .step(
                        TweenSpec::new(&stage.box3)
                            .to(PropertyKey::AnchorPoint, [0.0, 1.0])
                            .duration_ms(100),
                    )
                    .step(
                        TweenSpec::new(&stage.box3)
                            .to(PropertyKey::Rotation, 90.0)
                            .duration_ms(600)
                            .easing(Easing::OutBack),
                    )
                    .step(
                        TweenSpec::new(&stage.box3)
                            .to(PropertyKey::Rotation, 0.0)
                            .duration_ms(600)
                            .easing(Easing::InOutCubic),
                    )
                    .step(
                        TweenSpec::new(&stage.box3)
                            .to(PropertyKey::AnchorPoint, [0.5, 0.5])
                            .duration_ms(100),
                    );
                run_sequence(engine, spin).await?;
            }
            Scenario::MaterialShadow => {
                stage.box1.borrow_mut().shadow_opacity = 0.0;
                let handle = start(
                    engine,
                    TweenSpec::new(&stage.box1)
                        .to(PropertyKey::ShadowOpacity, 0.5)
                        .to(PropertyKey::ShadowRadius, 20.0)
                        .to(PropertyKey::ShadowOffsetY, 12.0)
                        .to(PropertyKey::ShadowColor, Color::from_hex("#000000")?)
                        .duration_ms(800)
                        .easing(Easing::OutCubic),
                )?;
                finished(engine, handle).await;
            }
            Scenario::ColoredShadow => {
                let handle = start(
                    engine,
                    TweenSpec::new(&stage.box2)
                        .to(PropertyKey::ShadowOpacity, 0.8)
                        .to(PropertyKey::ShadowRadius, 25.0)
                        .to(PropertyKey::ShadowOffsetX, 15.0)
                        .to(PropertyKey::ShadowOffsetY, 15.0)
                        .to(PropertyKey::ShadowColor, p.danger)
                        .duration_ms(1000)
                        .easing(Easing::OutBack),
                )?;
                finished(engine, handle).await;
            }
            Scenario::Serial => {
                let box1 = &stage.box1;
                let serial = SequenceSpec::serial()
                    .step(
                        TweenSpec::new(box1)
                            .to(PropertyKey::Top, 100.0)
                            .duration_ms(400)
                            .easing(Easing::OutQuad),
                    )
                    .step(
                        TweenSpec::new(box1)
                            .to(PropertyKey::ScaleX, 1.3)
                            .to(PropertyKey::ScaleY, 1.3)
                            .duration_ms(400)
                            .easing(Easing::OutBack),
                    )
                    .step(
                        TweenSpec::new(box1)
                            .to(PropertyKey::Top, 50.0)
                            .to(PropertyKey::ScaleX, 1.0)
                            .to(PropertyKey::ScaleY, 1.0)
                            .duration_ms(600)
                            .easing(Easing::InOutCubic),
                    );
                run_sequence(engine, serial).await?;
            }
            Scenario::Parallel => {
                let parallel = SequenceSpec::parallel()
                    .step(
                        TweenSpec::new(&stage.box1)
                            .to(PropertyKey::Top, 90.0)
                            .duration_ms(800)
                            .easing(Easing::OutBounce),
                    )
                    .step(
                        TweenSpec::new(&stage.box2)
                            .to(PropertyKey::Top, 80.0)
                            .to(PropertyKey::Rotation, 180.0)
                            .rotation(RotationDirection::Direct)
                            .duration_ms(600)
                            .easing(Easing::OutBack),
                    )
                    .step(
                        TweenSpec::new(&stage.box3)
                            .to(PropertyKey::Top, 70.0)
                            .to(PropertyKey::ScaleX, 1.5)
                            .to(PropertyKey::ScaleY, 1.5)
                            .duration_ms(1000)
                            .easing(Easing::OutElastic),
                    );
                run_sequence(engine, parallel).await?;
            }
            Scenario::Pulse => {
                let pulse = |scale: f64, opacity: f64| {
                    TweenSpec::new(&stage.box1)
                        .to(PropertyKey::ScaleX, scale)
                        .to(PropertyKey::ScaleY, scale)
                        .to(PropertyKey::Opacity, opacity)
                        .duration_ms(400)
                };
                let steps = [
                    pulse(1.2, 0.7),
                    pulse(1.0, 1.0),
                    pulse(1.2, 0.7),
                    pulse(1.0, 1.0),
                ];
                run_sequence(engine, SequenceSpec::serial().steps(steps)).await?;
            }
            Scenario::Shake => {
                let origin = stage.box2.borrow().left;
                let steps = [10.0, -10.0, 10.0, -10.0, 0.0].map(|offset| {
                    TweenSpec::new(&stage.box2)
                        .to(PropertyKey::Left, origin + offset)
                        .duration_ms(50)
                });
                run_sequence(engine, SequenceSpec::serial().steps(steps)).await?;
            }
            Scenario::FadeOut => {
                let first = start(
                    engine,
                    TweenSpec::new(&stage.box3)
                        .to(PropertyKey::Opacity, 0.0)
                        .duration_ms(600)
                        .easing(Easing::InSine),
                )?;
                follow_up(
                    engine,
                    first,
                    500,
                    TweenSpec::new(&stage.box3)
                        .to(PropertyKey::Opacity, 1.0)
                        .duration_ms(600)
                        .easing(Easing::OutSine),
                )
                .await?;
            }
            Scenario::Reset => run_sequence(engine, reset(stage)).await?,
            Scenario::KillAll => {
                let handle = start(
                    engine,
                    TweenSpec::new(&stage.box1)
                        .to(PropertyKey::Left, 200.0)
                        .duration_ms(2000),
                )?;
                let completion = engine.borrow_mut().completion(handle);
                tokio::time::sleep(Duration::from_millis(300)).await;
                engine.borrow_mut().kill_all();
                log::info!("All animations killed");
                if let Some(completion) = completion {
                    log::info!("box1 stopped mid-flight: {:?}", completion.await);
                }
            }
        }
        Ok(())
    }
}

/// Every box back to its initial layout, then the label text.
fn reset(stage: &Stage) -> SequenceSpec {
    let p = &stage.palette;
    let base = |view: &crate::stage::View, top: f64, left: f64, size: f64, color: Color| {
        TweenSpec::new(view)
            .to(PropertyKey::Top, top)
            .to(PropertyKey::Left, left)
            .to(PropertyKey::Width, size)
            .to(PropertyKey::Height, size)
            .to(PropertyKey::Opacity, 1.0)
            .to(PropertyKey::Rotation, 0.0)
            .to(PropertyKey::ScaleX, 1.0)
            .to(PropertyKey::ScaleY, 1.0)
            .to(PropertyKey::BackgroundColor, color)
            .to(PropertyKey::ZPosition, 0.0)
            .duration_ms(600)
            .easing(Easing::OutCubic)
    };
    let shadow = |spec: TweenSpec, radius: f64| {
        spec.to(PropertyKey::ShadowOpacity, 0.3)
            .to(PropertyKey::ShadowRadius, radius)
            .to(PropertyKey::ShadowOffsetX, 0.0)
            .to(PropertyKey::ShadowOffsetY, 4.0)
    };

    let label = stage.label.clone();
    let label_text = stage.label_text.clone();
    let text_color = p.text_primary;

    SequenceSpec::parallel()
        .step(
            shadow(base(&stage.box1, 50.0, 24.0, 100.0, p.primary), 10.0)
                .to(PropertyKey::AnchorPoint, [0.5, 0.5]),
        )
        .step(shadow(base(&stage.box2, 60.0, 16.0, 80.0, p.success), 8.0))
        .step(base(&stage.box3, 70.0, 16.0, 60.0, p.warning))
        .on_complete(move |_| {
            *label_text.borrow_mut() = Stage::LABEL_TEXT.to_string();
            label.borrow_mut().text_color = text_color;
            log::info!("All reset!");
        })
}

fn start(engine: &SharedEngine, spec: TweenSpec) -> Result<Handle> {
    Ok(engine.borrow_mut().start(spec)?)
}

/// Wait for `handle` to end. Handles that already ended report `None`.
async fn finished(engine: &SharedEngine, handle: Handle) -> Option<Outcome> {
    let completion = engine.borrow_mut().completion(handle);
    match completion {
        Some(completion) => Some(completion.await),
        None => None,
    }
}

/// After `first` completes, pause for `delay_ms` and start `next`.
async fn follow_up(
    engine: &SharedEngine,
    first: Handle,
    delay_ms: u64,
    next: TweenSpec,
) -> Result<()> {
    if finished(engine, first).await != Some(Outcome::Completed) {
        log::info!("{} did not complete, skipping follow-up", first);
        return Ok(());
    }
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    let second = start(engine, next)?;
    finished(engine, second).await;
    Ok(())
}

async fn run_sequence(engine: &SharedEngine, spec: SequenceSpec) -> Result<()> {
    let handle = engine.borrow_mut().sequence(spec)?;
    let outcome = finished(engine, handle).await;
    log::debug!("{} ended: {:?}", handle, outcome);
    Ok(())
}
