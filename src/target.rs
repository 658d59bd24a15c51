//! Animation targets
//!
//! A target is any caller-owned object that exposes a set of properties by
//! [`PropertyKey`]. The engine only ever holds a weak reference to it; the
//! target can be dropped at any time and its tweens cancel themselves.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::core::{
    color::Color, geo::Point, transform::Transform, value::Value, value::ValueKind,
};
use crate::TweenError;

/// An object whose properties can be animated
pub trait Animatable {
    /// Current value of `key`, or `None` if the target has no such property.
    fn get(&self, key: PropertyKey) -> Option<Value>;

    /// Store a new value for `key`. Values arrive already blended and of the
    /// kind [`PropertyKey::kind`] declares.
    fn set(&mut self, key: PropertyKey, value: Value);
}

macro_rules! property_keys {
    ($($variant:ident => $name:literal, $kebab:literal, $kind:ident;)*) => {
        /// The closed set of animatable view properties
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum PropertyKey {
            $($variant,)*
        }

        impl PropertyKey {
            pub const ALL: &'static [PropertyKey] = &[$(PropertyKey::$variant,)*];

            /// Name as used in property dictionaries, e.g. `backgroundColor`.
            pub fn name(&self) -> &'static str {
                match self {
                    $(PropertyKey::$variant => $name,)*
                }
            }

            /// How values of this property are blended.
            pub fn kind(&self) -> ValueKind {
                match self {
                    $(PropertyKey::$variant => ValueKind::$kind,)*
                }
            }

            #[allow(unreachable_patterns)]
            fn lookup(name: &str) -> Option<PropertyKey> {
                match name {
                    $($name | $kebab => Some(PropertyKey::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

property_keys! {
    Top => "top", "top", Scalar;
    Left => "left", "left", Scalar;
    Width => "width", "width", Scalar;
    Height => "height", "height", Scalar;
    CenterX => "centerX", "center-x", Scalar;
    CenterY => "centerY", "center-y", Scalar;
    Opacity => "opacity", "opacity", Scalar;
    BackgroundColor => "backgroundColor", "background-color", Color;
    TintColor => "tintColor", "tint-color", Color;
    TextColor => "textColor", "text-color", Color;
    ScaleX => "scaleX", "scale-x", Scalar;
    ScaleY => "scaleY", "scale-y", Scalar;
    Rotation => "rotation", "rotation", Angle;
    AnchorPoint => "anchorPoint", "anchor-point", Point2;
    ZPosition => "zPosition", "z-position", Scalar;
    BorderRadius => "borderRadius", "border-radius", Scalar;
    BorderWidth => "borderWidth", "border-width", Scalar;
    BorderColor => "borderColor", "border-color", Color;
    ShadowOpacity => "shadowOpacity", "shadow-opacity", Scalar;
    ShadowRadius => "shadowRadius", "shadow-radius", Scalar;
    ShadowOffsetX => "shadowOffsetX", "shadow-offset-x", Scalar;
    ShadowOffsetY => "shadowOffsetY", "shadow-offset-y", Scalar;
    ShadowColor => "shadowColor", "shadow-color", Color;
    Transform => "transform", "transform", Transform;
}

impl FromStr for PropertyKey {
    type Err = TweenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyKey::lookup(s.trim()).ok_or_else(|| TweenError::UnknownProperty(s.to_string()))
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// In-memory state of a mobile view: frame, visuals, transform, border and
/// shadow. Usable directly as a target or as a model to mirror onto a real
/// widget after each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub background_color: Color,
    pub tint_color: Color,
    pub text_color: Color,
    pub scale_x: f64,
    pub scale_y: f64,
    /// Degrees
    pub rotation: f64,
    /// Offset applied on top of the frame, as by a view's transform
    pub translation: Point,
    pub anchor_point: Point,
    pub z_position: f64,
    pub border_radius: f64,
    pub border_width: f64,
    pub border_color: Color,
    pub shadow_opacity: f64,
    pub shadow_radius: f64,
    pub shadow_offset: Point,
    pub shadow_color: Color,
}

impl ViewState {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Scale, rotation and translation as one composite transform.
    pub fn transform(&self) -> Transform {
        Transform::new(self.scale_x, self.scale_y, self.rotation, self.translation)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            top: 0.0,
            left: 0.0,
            width: 0.0,
            height: 0.0,
            opacity: 1.0,
            background_color: Color::TRANSPARENT,
            tint_color: Color::BLACK,
            text_color: Color::BLACK,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            translation: Point::default(),
            anchor_point: Point::center_anchor(),
            z_position: 0.0,
            border_radius: 0.0,
            border_width: 0.0,
            border_color: Color::TRANSPARENT,
            shadow_opacity: 0.0,
            shadow_radius: 3.0,
            shadow_offset: Point::new(0.0, -3.0),
            shadow_color: Color::BLACK,
        }
    }
}

impl Animatable for ViewState {
    fn get(&self, key: PropertyKey) -> Option<Value> {
        let value = match key {
            PropertyKey::Top => Value::Scalar(self.top),
            PropertyKey::Left => Value::Scalar(self.left),
            PropertyKey::Width => Value::Scalar(self.width),
            PropertyKey::Height => Value::Scalar(self.height),
            PropertyKey::CenterX => Value::Scalar(self.center().x),
            PropertyKey::CenterY => Value::Scalar(self.center().y),
            PropertyKey::Opacity => Value::Scalar(self.opacity),
            PropertyKey::BackgroundColor => Value::Color(self.background_color),
            PropertyKey::TintColor => Value::Color(self.tint_color),
            PropertyKey::TextColor => Value::Color(self.text_color),
            PropertyKey::ScaleX => Value::Scalar(self.scale_x),
            PropertyKey::ScaleY => Value::Scalar(self.scale_y),
            PropertyKey::Rotation => Value::Scalar(self.rotation),
            PropertyKey::AnchorPoint => Value::Point(self.anchor_point),
            PropertyKey::ZPosition => Value::Scalar(self.z_position),
            PropertyKey::BorderRadius => Value::Scalar(self.border_radius),
            PropertyKey::BorderWidth => Value::Scalar(self.border_width),
            PropertyKey::BorderColor => Value::Color(self.border_color),
            PropertyKey::ShadowOpacity => Value::Scalar(self.shadow_opacity),
            PropertyKey::ShadowRadius => Value::Scalar(self.shadow_radius),
            PropertyKey::ShadowOffsetX => Value::Scalar(self.shadow_offset.x),
            PropertyKey::ShadowOffsetY => Value::Scalar(self.shadow_offset.y),
            PropertyKey::ShadowColor => Value::Color(self.shadow_color),
            PropertyKey::Transform => Value::Transform(self.transform()),
        };
        Some(value)
    }

    fn set(&mut self, key: PropertyKey, value: Value) {
        match (key, value) {
            (PropertyKey::Transform, Value::Transform(t)) => {
                self.scale_x = t.scale_x;
                self.scale_y = t.scale_y;
                self.rotation = t.rotation;
                self.translation = t.translation;
            }
            (PropertyKey::AnchorPoint, Value::Point(p)) => self.anchor_point = p,
            (PropertyKey::BackgroundColor, Value::Color(c)) => self.background_color = c,
            (PropertyKey::TintColor, Value::Color(c)) => self.tint_color = c,
            (PropertyKey::TextColor, Value::Color(c)) => self.text_color = c,
            (PropertyKey::BorderColor, Value::Color(c)) => self.border_color = c,
            (PropertyKey::ShadowColor, Value::Color(c)) => self.shadow_color = c,
            (key, value) => {
                let Some(v) = value.as_f64() else {
                    log::warn!("ViewState ignores {} value for {}", value.type_name(), key);
                    return;
                };
                match key {
                    PropertyKey::Top => self.top = v,
                    PropertyKey::Left => self.left = v,
                    PropertyKey::Width => self.width = v,
                    PropertyKey::Height => self.height = v,
                    PropertyKey::CenterX => self.left = v - self.width / 2.0,
                    PropertyKey::CenterY => self.top = v - self.height / 2.0,
                    PropertyKey::Opacity => self.opacity = v,
                    PropertyKey::ScaleX => self.scale_x = v,
                    PropertyKey::ScaleY => self.scale_y = v,
                    PropertyKey::Rotation => self.rotation = v,
                    PropertyKey::ZPosition => self.z_position = v,
                    PropertyKey::BorderRadius => self.border_radius = v,
                    PropertyKey::BorderWidth => self.border_width = v,
                    PropertyKey::ShadowOpacity => self.shadow_opacity = v,
                    PropertyKey::ShadowRadius => self.shadow_radius = v,
                    PropertyKey::ShadowOffsetX => self.shadow_offset.x = v,
                    PropertyKey::ShadowOffsetY => self.shadow_offset.y = v,
                    _ => log::warn!("ViewState ignores scalar value for {}", key),
                }
            }
        }
    }
}
