//! The three demo boxes and the text label, as plain view models

use std::{cell::RefCell, fmt, rc::Rc};

use anyhow::Result;
use tweenkit::prelude::*;

/// Palette of the demo screen
pub struct Palette {
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    pub danger: Color,
    pub text_primary: Color,
}

impl Palette {
    pub fn load() -> Result<Self> {
        Ok(Self {
            primary: "#6366F1".parse()?,
            success: "#10B981".parse()?,
            warning: "#F59E0B".parse()?,
            danger: "#EF4444".parse()?,
            text_primary: "#F9FAFB".parse()?,
        })
    }
}

pub type View = Rc<RefCell<ViewState>>;

pub struct Stage {
    pub palette: Palette,
    pub box1: View,
    pub box2: View,
    pub box3: View,
    pub label: View,
    pub label_text: Rc<RefCell<String>>,
}

impl Stage {
    pub const LABEL_TEXT: &'static str = "Text Animation";

    pub fn new() -> Result<Self> {
        let palette = Palette::load()?;
        let view = |left, top, size, color| {
            Rc::new(RefCell::new(
                ViewState::new(left, top, size, size).with_background(color),
            ))
        };

        let label = Rc::new(RefCell::new(ViewState::new(16.0, 180.0, 200.0, 24.0)));
        label.borrow_mut().text_color = palette.text_primary;

        Ok(Self {
            box1: view(24.0, 50.0, 100.0, palette.primary),
            box2: view(16.0, 60.0, 80.0, palette.success),
            box3: view(16.0, 70.0, 60.0, palette.warning),
            label,
            label_text: Rc::new(RefCell::new(Self::LABEL_TEXT.to_string())),
            palette,
        })
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, view) in [("box1", &self.box1), ("box2", &self.box2), ("box3", &self.box3)] {
            let v = view.borrow();
            writeln!(
                f,
                "  {name}: pos=({:.1}, {:.1}) size={:.0}x{:.0} scale=({:.2}, {:.2}) rot={:.1} \
                 opacity={:.2} bg={} shadow={:.2}/{:.1}",
                v.left,
                v.top,
                v.width,
                v.height,
                v.scale_x,
                v.scale_y,
                v.rotation,
                v.opacity,
                v.background_color,
                v.shadow_opacity,
                v.shadow_radius,
            )?;
        }
        write!(
            f,
            "  label: {:?} color={}",
            self.label_text.borrow(),
            self.label.borrow().text_color
        )
    }
}
