//! Easing functions for smooth animations
//!
//! Every curve maps normalized time to normalized progress and is pinned to
//! exactly `0.0` at `t = 0` and `1.0` at `t = 1`, so the curves that overshoot
//! in between (elastic, back, bounce) still land on their end values.

use fxhash::FxHashMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{f64::consts::PI, fmt, str::FromStr};

use crate::core::constants::{BACK_OVERSHOOT, BOUNCE_D1, BOUNCE_N1};
use crate::TweenError;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InElastic,
    OutElastic,
    InOutElastic,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
    /// CSS-style cubic bezier with control points `(x1, y1)` and `(x2, y2)`.
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Every named curve, in declaration order.
    pub const NAMED: [Easing; 31] = [
        Easing::Linear,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
        Easing::InQuart,
        Easing::OutQuart,
        Easing::InOutQuart,
        Easing::InQuint,
        Easing::OutQuint,
        Easing::InOutQuint,
        Easing::InSine,
        Easing::OutSine,
        Easing::InOutSine,
        Easing::InExpo,
        Easing::OutExpo,
        Easing::InOutExpo,
        Easing::InCirc,
        Easing::OutCirc,
        Easing::InOutCirc,
        Easing::InElastic,
        Easing::OutElastic,
        Easing::InOutElastic,
        Easing::InBack,
        Easing::OutBack,
        Easing::InOutBack,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
    ];

    /// Apply the easing function to a normalized time value (0.0 to 1.0)
    pub fn apply(&self, t: f64) -> f64 {
        // Endpoints are always exact
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match *self {
            Easing::Linear => t,
            Easing::InQuad => t * t,
            Easing::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::InCubic => t * t * t,
            Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::InQuart => t.powi(4),
            Easing::OutQuart => 1.0 - (1.0 - t).powi(4),
            Easing::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Easing::InQuint => t.powi(5),
            Easing::OutQuint => 1.0 - (1.0 - t).powi(5),
            Easing::InOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            Easing::InSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::OutSine => (t * PI / 2.0).sin(),
            Easing::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::InExpo => 2.0_f64.powf(10.0 * t - 10.0),
            Easing::OutExpo => 1.0 - 2.0_f64.powf(-10.0 * t),
            Easing::InOutExpo => {
                if t < 0.5 {
                    2.0_f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2.0_f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Easing::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Easing::OutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Easing::InOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            Easing::InElastic => {
                let c4 = (2.0 * PI) / 3.0;
                -(2.0_f64.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * c4).sin()
            }
            Easing::OutElastic => {
                let c4 = (2.0 * PI) / 3.0;
                2.0_f64.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
            }
            Easing::InOutElastic => {
                let c5 = (2.0 * PI) / 4.5;
                if t < 0.5 {
                    -(2.0_f64.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
                } else {
                    (2.0_f64.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
                        + 1.0
                }
            }
            Easing::InBack => {
                let c3 = BACK_OVERSHOOT + 1.0;
                c3 * t * t * t - BACK_OVERSHOOT * t * t
            }
            Easing::OutBack => {
                let c3 = BACK_OVERSHOOT + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + BACK_OVERSHOOT * (t - 1.0).powi(2)
            }
            Easing::InOutBack => {
                let c2 = BACK_OVERSHOOT * 1.525;
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (t * 2.0 - 2.0) + c2) + 2.0) / 2.0
                }
            }
            Easing::InBounce => 1.0 - bounce_out(1.0 - t),
            Easing::OutBounce => bounce_out(t),
            Easing::InOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier_ease(t, x1, y1, x2, y2),
        }
    }

    /// Canonical kebab-case name, e.g. `ease-out-elastic`.
    pub fn name(&self) -> String {
        let family = match self {
            Easing::Linear => return "linear".to_string(),
            Easing::CubicBezier(x1, y1, x2, y2) => {
                return format!("cubic-bezier({}, {}, {}, {})", x1, y1, x2, y2)
            }
            Easing::InQuad | Easing::OutQuad | Easing::InOutQuad => "quad",
            Easing::InCubic | Easing::OutCubic | Easing::InOutCubic => "cubic",
            Easing::InQuart | Easing::OutQuart | Easing::InOutQuart => "quart",
            Easing::InQuint | Easing::OutQuint | Easing::InOutQuint => "quint",
            Easing::InSine | Easing::OutSine | Easing::InOutSine => "sine",
            Easing::InExpo | Easing::OutExpo | Easing::InOutExpo => "expo",
            Easing::InCirc | Easing::OutCirc | Easing::InOutCirc => "circ",
            Easing::InElastic | Easing::OutElastic | Easing::InOutElastic => "elastic",
            Easing::InBack | Easing::OutBack | Easing::InOutBack => "back",
            Easing::InBounce | Easing::OutBounce | Easing::InOutBounce => "bounce",
        };
        let direction = match self {
            Easing::InQuad
            | Easing::InCubic
            | Easing::InQuart
            | Easing::InQuint
            | Easing::InSine
            | Easing::InExpo
            | Easing::InCirc
            | Easing::InElastic
            | Easing::InBack
            | Easing::InBounce => "in",
            Easing::OutQuad
            | Easing::OutCubic
            | Easing::OutQuart
            | Easing::OutQuint
            | Easing::OutSine
            | Easing::OutExpo
            | Easing::OutCirc
            | Easing::OutElastic
            | Easing::OutBack
            | Easing::OutBounce => "out",
            _ => "in-out",
        };
        format!("ease-{}-{}", direction, family)
    }
}

static EASING_NAMES: Lazy<FxHashMap<String, Easing>> =
    Lazy::new(|| Easing::NAMED.iter().map(|e| (e.name(), *e)).collect());

impl FromStr for Easing {
    type Err = TweenError;

    /// Accepts kebab-case names (`ease-in-out-sine`), constant-style names
    /// (`EASE_IN_OUT_SINE`) and `cubic-bezier(x1, y1, x2, y2)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");

        if let Some(easing) = EASING_NAMES.get(&normalized) {
            return Ok(*easing);
        }

        if let Some(args) = normalized
            .strip_prefix("cubic-bezier(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let points: Vec<f64> = args
                .split(',')
                .map(|p| p.trim().parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|_| TweenError::UnknownEasingKind(s.to_string()))?;
            if let [x1, y1, x2, y2] = points[..] {
                return Ok(Easing::CubicBezier(x1, y1, x2, y2));
            }
        }

        Err(TweenError::UnknownEasingKind(s.to_string()))
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn bounce_out(t: f64) -> f64 {
    if t < 1.0 / BOUNCE_D1 {
        BOUNCE_N1 * t * t
    } else if t < 2.0 / BOUNCE_D1 {
        let t = t - 1.5 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.75
    } else if t < 2.5 / BOUNCE_D1 {
        let t = t - 2.25 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / BOUNCE_D1;
        BOUNCE_N1 * t * t + 0.984375
    }
}

/// Cubic bezier easing calculation (same curve as the CSS `cubic-bezier()` timing function).
///
/// Newton-Raphson on x, falling back to bisection.
fn cubic_bezier_ease(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    // Solve for parameter `p` where bezier_x(p) == x
    let mut p = x;
    for _ in 0..8 {
        let err = bezier_sample(p, x1, x2) - x;
        if err.abs() < 1e-9 {
            return bezier_sample(p, y1, y2);
        }
        let slope = bezier_slope(p, x1, x2);
        if slope.abs() < 1e-9 {
            break;
        }
        p -= err / slope;
    }

    let mut lo = 0.0_f64;
    let mut hi = 1.0_f64;
    p = x;
    for _ in 0..40 {
        let val = bezier_sample(p, x1, x2);
        if (val - x).abs() < 1e-9 {
            break;
        }
        if val < x {
            lo = p;
        } else {
            hi = p;
        }
        p = (lo + hi) * 0.5;
    }

    bezier_sample(p, y1, y2)
}

/// B(t) = 3(1-t)²t·p1 + 3(1-t)t²·p2 + t³
#[inline]
fn bezier_sample(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    ((a * t + b) * t + c) * t
}

#[inline]
fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let a = 1.0 - 3.0 * p2 + 3.0 * p1;
    let b = 3.0 * p2 - 6.0 * p1;
    let c = 3.0 * p1;
    (3.0 * a * t + 2.0 * b) * t + c
}
