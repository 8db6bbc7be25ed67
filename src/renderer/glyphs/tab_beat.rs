//! One beat of tablature: its notes stacked on their string lines.

use serde::Serialize;

use super::{AnyGlyph, Bounds, Glyph, LayoutContext};

/// A note glyph bound to the tab line it sits on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabNoteSlot {
    /// 1-based string, 1 being the top line
    pub string: usize,
    pub glyph: AnyGlyph,
}

/// A vertical column of note glyphs sharing one x position.
///
/// Unlike [`GlyphGroup`](super::GlyphGroup), children do not advance a
/// cursor: each is placed on its string line and the column is as wide
/// as its widest child.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TabBeatGlyph {
    #[serde(flatten)]
    bounds: Bounds,
    notes: Vec<TabNoteSlot>,
}

impl TabBeatGlyph {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            bounds: Bounds::at(x, y),
            notes: Vec::new(),
        }
    }

    pub fn add_note(&mut self, string: usize, glyph: impl Into<AnyGlyph>) {
        self.notes.push(TabNoteSlot {
            string,
            glyph: glyph.into(),
        });
    }

    pub fn notes(&self) -> &[TabNoteSlot] {
        &self.notes
    }
}

impl Glyph for TabBeatGlyph {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn bounds_mut(&mut self) -> &mut Bounds {
        &mut self.bounds
    }

    fn do_layout(&mut self, ctx: &LayoutContext) {
        let line_spacing = ctx.string_spacing * ctx.scale;
        let mut width: f64 = 0.0;
        for slot in &mut self.notes {
            let line = slot.string.saturating_sub(1) as f64;
            slot.glyph
                .set_position(self.bounds.x, self.bounds.y + line * line_spacing);
            slot.glyph.do_layout(ctx);
            width = width.max(slot.glyph.width());
        }
        self.bounds.width = width;
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.bounds.x += dx;
        self.bounds.y += dy;
        for slot in &mut self.notes {
            slot.glyph.translate(dx, dy);
        }
    }
}
