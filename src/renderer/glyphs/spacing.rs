use serde::Serialize;

use super::{Bounds, Glyph, LayoutContext};

/// Empty space of a fixed width, optionally zoomed with the layout scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpacingGlyph {
    #[serde(flatten)]
    bounds: Bounds,
    #[serde(skip)]
    base_width: f64,
    #[serde(skip)]
    scaled: bool,
}

impl SpacingGlyph {
    pub fn new(x: f64, y: f64, width: f64, scaled: bool) -> Self {
        Self {
            bounds: Bounds::at(x, y),
            base_width: width,
            scaled,
        }
    }
}

impl Glyph for SpacingGlyph {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn bounds_mut(&mut self) -> &mut Bounds {
        &mut self.bounds
    }

    fn do_layout(&mut self, ctx: &LayoutContext) {
        self.bounds.width = if self.scaled {
            self.base_width * ctx.scale
        } else {
            self.base_width
        };
    }
}
