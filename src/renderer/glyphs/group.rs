//! Horizontal glyph composition.

use serde::Serialize;

use super::{AnyGlyph, Bounds, Glyph, LayoutContext};

/// An ordered row of glyphs laid out left to right with no gap.
///
/// Insertion order is layout order. Callers that build children back to
/// front (digits, for instance) call [`GlyphGroup::reverse`] first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlyphGroup {
    #[serde(flatten)]
    bounds: Bounds,
    glyphs: Vec<AnyGlyph>,
}

impl GlyphGroup {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            bounds: Bounds::at(x, y),
            glyphs: Vec::new(),
        }
    }

    pub fn add(&mut self, glyph: impl Into<AnyGlyph>) {
        self.glyphs.push(glyph.into());
    }

    pub fn reverse(&mut self) {
        self.glyphs.reverse();
    }

    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.bounds.width = 0.0;
    }

    pub fn glyphs(&self) -> &[AnyGlyph] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Widen the laid-out row to `target_width` by spreading the surplus
    /// evenly over children that can scale, shifting later siblings right.
    ///
    /// Does nothing when the row is already wide enough or no child can
    /// take extra space.
    pub fn stretch_to(&mut self, target_width: f64) {
        let surplus = target_width - self.bounds.width;
        let scalable = self.glyphs.iter().filter(|g| g.can_scale()).count();
        if surplus <= 0.0 || scalable == 0 {
            return;
        }
        let per_glyph = surplus / scalable as f64;

        let mut cursor = self.bounds.x;
        for g in &mut self.glyphs {
            let dx = cursor - g.x();
            g.translate(dx, 0.0);
            g.apply_glyph_spacing(per_glyph);
            cursor += g.width();
        }
        self.bounds.width = cursor - self.bounds.x;
    }
}

impl Glyph for GlyphGroup {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn bounds_mut(&mut self) -> &mut Bounds {
        &mut self.bounds
    }

    fn do_layout(&mut self, ctx: &LayoutContext) {
        let mut cursor = self.bounds.x;
        for g in &mut self.glyphs {
            g.set_position(cursor, self.bounds.y);
            g.do_layout(ctx);
            cursor += g.width();
        }
        self.bounds.width = cursor - self.bounds.x;
        tracing::trace!(children = self.glyphs.len(), width = self.bounds.width, "group laid out");
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.bounds.x += dx;
        self.bounds.y += dy;
        for g in &mut self.glyphs {
            g.translate(dx, dy);
        }
    }
}
