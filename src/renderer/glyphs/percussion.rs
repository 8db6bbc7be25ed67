use serde::Serialize;

use super::{Bounds, Glyph, LayoutContext};
use crate::renderer::constants::*;

/// Ride cymbal note head on a percussion tab line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideCymbalGlyph {
    #[serde(flatten)]
    bounds: Bounds,
    is_grace: bool,
}

impl RideCymbalGlyph {
    pub fn new(x: f64, y: f64, is_grace: bool) -> Self {
        Self {
            bounds: Bounds::at(x, y),
            is_grace,
        }
    }
}

impl Glyph for RideCymbalGlyph {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn bounds_mut(&mut self) -> &mut Bounds {
        &mut self.bounds
    }

    fn do_layout(&mut self, ctx: &LayoutContext) {
        let grace = if self.is_grace { GRACE_SCALE } else { 1.0 };
        self.bounds.width = RIDE_CYMBAL_WIDTH * grace * ctx.scale;
    }

    fn can_scale(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_follows_grace_and_scale() {
        let ctx = LayoutContext {
            scale: 1.5,
            ..LayoutContext::default()
        };
        let mut normal = RideCymbalGlyph::new(0.0, 0.0, false);
        normal.do_layout(&ctx);
        assert_eq!(normal.width(), 13.5);

        let mut grace = RideCymbalGlyph::new(0.0, 0.0, true);
        grace.do_layout(&ctx);
        assert!((grace.width() - 9.0 * 0.7 * 1.5).abs() < 1e-9);
    }

    #[test]
    fn spacing_is_ignored() {
        let mut g = RideCymbalGlyph::new(0.0, 0.0, false);
        g.do_layout(&LayoutContext::default());
        g.apply_glyph_spacing(4.0);
        assert_eq!(g.width(), 9.0);
    }
}
