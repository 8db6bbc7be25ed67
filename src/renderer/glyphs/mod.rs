//! Glyph layout engine.
//!
//! A glyph is a positioned box whose width is only known after
//! [`Glyph::do_layout`]. Composite glyphs own their children and lay them
//! out in a single left-to-right pass; no child may depend on a sibling
//! laid out after it.
//!
//! The set of glyph kinds is closed: [`AnyGlyph`] enumerates them and
//! forwards the [`Glyph`] capabilities to the concrete type.

mod group;
mod number;
mod percussion;
mod spacing;
mod tab_beat;

use serde::Serialize;

pub use group::GlyphGroup;
pub use number::{DigitGlyph, NumberGlyph};
pub use percussion::RideCymbalGlyph;
pub use spacing::SpacingGlyph;
pub use tab_beat::{TabBeatGlyph, TabNoteSlot};

use super::LayoutSettings;

/// Position and laid-out width of a glyph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
}

impl Bounds {
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, width: 0.0 }
    }
}

/// Read-only state passed down the glyph tree during layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    /// Global zoom applied to every glyph width
    pub scale: f64,
    /// Unscaled distance between two tab lines
    pub string_spacing: f64,
}

impl LayoutContext {
    pub fn new(settings: &LayoutSettings) -> Self {
        Self {
            scale: settings.scale,
            string_spacing: settings.string_spacing,
        }
    }
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new(&LayoutSettings::default())
    }
}

/// Capabilities shared by every glyph kind.
pub trait Glyph {
    fn bounds(&self) -> &Bounds;

    fn bounds_mut(&mut self) -> &mut Bounds;

    /// Compute this glyph's width (and its children's positions) from its
    /// current origin.
    fn do_layout(&mut self, ctx: &LayoutContext);

    /// Whether an outer justification step may widen this glyph.
    fn can_scale(&self) -> bool {
        true
    }

    fn x(&self) -> f64 {
        self.bounds().x
    }

    fn y(&self) -> f64 {
        self.bounds().y
    }

    fn width(&self) -> f64 {
        self.bounds().width
    }

    fn set_position(&mut self, x: f64, y: f64) {
        let b = self.bounds_mut();
        b.x = x;
        b.y = y;
    }

    /// Move an already laid-out glyph, children included.
    fn translate(&mut self, dx: f64, dy: f64) {
        let b = self.bounds_mut();
        b.x += dx;
        b.y += dy;
    }

    /// Add justification space; fixed-size glyphs ignore it.
    fn apply_glyph_spacing(&mut self, spacing: f64) {
        if self.can_scale() {
            self.bounds_mut().width += spacing;
        }
    }
}

/// Every glyph kind the layout engine knows about.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnyGlyph {
    Group(GlyphGroup),
    Spacing(SpacingGlyph),
    Digit(DigitGlyph),
    Number(NumberGlyph),
    RideCymbal(RideCymbalGlyph),
    TabBeat(TabBeatGlyph),
}

macro_rules! dispatch {
    ($self:expr, $g:ident => $body:expr) => {
        match $self {
            AnyGlyph::Group($g) => $body,
            AnyGlyph::Spacing($g) => $body,
            AnyGlyph::Digit($g) => $body,
            AnyGlyph::Number($g) => $body,
            AnyGlyph::RideCymbal($g) => $body,
            AnyGlyph::TabBeat($g) => $body,
        }
    };
}

impl Glyph for AnyGlyph {
    fn bounds(&self) -> &Bounds {
        dispatch!(self, g => g.bounds())
    }

    fn bounds_mut(&mut self) -> &mut Bounds {
        dispatch!(self, g => g.bounds_mut())
    }

    fn do_layout(&mut self, ctx: &LayoutContext) {
        dispatch!(self, g => g.do_layout(ctx))
    }

    fn can_scale(&self) -> bool {
        dispatch!(self, g => g.can_scale())
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        dispatch!(self, g => g.translate(dx, dy))
    }

    fn apply_glyph_spacing(&mut self, spacing: f64) {
        dispatch!(self, g => g.apply_glyph_spacing(spacing))
    }
}

macro_rules! impl_from_glyph {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for AnyGlyph {
                fn from(g: $ty) -> Self {
                    AnyGlyph::$variant(g)
                }
            }
        )*
    };
}

impl_from_glyph!(
    Group(GlyphGroup),
    Spacing(SpacingGlyph),
    Digit(DigitGlyph),
    Number(NumberGlyph),
    RideCymbal(RideCymbalGlyph),
    TabBeat(TabBeatGlyph),
);
