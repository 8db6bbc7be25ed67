//! Fret numbers: a number decomposed into one glyph per decimal digit.

use serde::Serialize;

use super::{AnyGlyph, Bounds, Glyph, GlyphGroup, LayoutContext};
use crate::error::{TabError, TabResult};
use crate::renderer::constants::*;

/// A single decimal digit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigitGlyph {
    #[serde(flatten)]
    bounds: Bounds,
    digit: u8,
    #[serde(skip)]
    scale: f64,
}

impl DigitGlyph {
    /// `digit` is taken modulo 10.
    pub fn new(x: f64, y: f64, digit: u8, scale: f64) -> Self {
        Self {
            bounds: Bounds::at(x, y),
            digit: digit % 10,
            scale,
        }
    }

    pub fn digit(&self) -> u8 {
        self.digit
    }

    fn base_width(&self) -> f64 {
        match self.digit {
            1 => DIGIT_ONE_WIDTH,
            _ => DIGIT_WIDTH,
        }
    }
}

impl Glyph for DigitGlyph {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn bounds_mut(&mut self) -> &mut Bounds {
        &mut self.bounds
    }

    fn do_layout(&mut self, ctx: &LayoutContext) {
        self.bounds.width = self.base_width() * self.scale * ctx.scale;
    }

    fn can_scale(&self) -> bool {
        false
    }
}

/// A non-negative integer drawn as a row of digits, most significant first.
///
/// Zero is drawn as a single `0` so open strings stay visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberGlyph {
    number: u32,
    is_grace: bool,
    #[serde(flatten)]
    group: GlyphGroup,
}

impl NumberGlyph {
    /// Fails with [`TabError::NegativeNumber`] for values below zero.
    pub fn new(x: f64, y: f64, number: i32, is_grace: bool) -> TabResult<Self> {
        let number = u32::try_from(number).map_err(|_| TabError::NegativeNumber(number))?;
        Ok(Self {
            number,
            is_grace,
            group: GlyphGroup::new(x, y),
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Digits in drawing order; empty before layout.
    pub fn digits(&self) -> Vec<u8> {
        self.group
            .glyphs()
            .iter()
            .filter_map(|g| match g {
                AnyGlyph::Digit(d) => Some(d.digit()),
                _ => None,
            })
            .collect()
    }

    pub fn glyphs(&self) -> &[AnyGlyph] {
        self.group.glyphs()
    }
}

impl Glyph for NumberGlyph {
    fn bounds(&self) -> &Bounds {
        self.group.bounds()
    }

    fn bounds_mut(&mut self) -> &mut Bounds {
        self.group.bounds_mut()
    }

    fn do_layout(&mut self, ctx: &LayoutContext) {
        let scale = if self.is_grace { GRACE_SCALE } else { 1.0 };

        self.group.clear();
        let mut i = self.number;
        loop {
            self.group.add(DigitGlyph::new(0.0, 0.0, (i % 10) as u8, scale));
            i /= 10;
            if i == 0 {
                break;
            }
        }
        self.group.reverse();
        self.group.do_layout(ctx);
    }

    fn can_scale(&self) -> bool {
        false
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.group.translate(dx, dy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn laid_out(number: i32, is_grace: bool) -> NumberGlyph {
        let mut n = NumberGlyph::new(3.0, 4.0, number, is_grace).unwrap();
        n.do_layout(&LayoutContext::default());
        n
    }

    #[test]
    fn digits_are_most_significant_first() {
        let n = laid_out(307, false);
        assert_eq!(n.digits(), vec![3, 0, 7]);
        let widths: f64 = n.glyphs().iter().map(|g| g.width()).sum();
        assert_eq!(n.width(), widths);
        assert_eq!(n.width(), 42.0);
        assert_eq!(n.glyphs()[0].x(), 3.0);
        assert_eq!(n.glyphs()[2].x(), 31.0);
    }

    #[test]
    fn zero_renders_one_digit() {
        let n = laid_out(0, false);
        assert_eq!(n.digits(), vec![0]);
        assert_eq!(n.width(), DIGIT_WIDTH);
    }

    #[test]
    fn one_is_narrow() {
        let n = laid_out(11, false);
        assert_eq!(n.width(), 2.0 * DIGIT_ONE_WIDTH);
    }

    #[test]
    fn negative_numbers_are_rejected() {
        assert_eq!(
            NumberGlyph::new(0.0, 0.0, -1, false),
            Err(TabError::NegativeNumber(-1))
        );
    }

    #[test]
    fn grace_and_global_scale_multiply() {
        let mut n = NumberGlyph::new(0.0, 0.0, 5, true).unwrap();
        let ctx = LayoutContext {
            scale: 2.0,
            ..LayoutContext::default()
        };
        n.do_layout(&ctx);
        assert!((n.width() - DIGIT_WIDTH * GRACE_SCALE * 2.0).abs() < 1e-9);
        assert!(!n.can_scale());
    }

    #[test]
    fn layout_twice_does_not_duplicate_digits() {
        let mut n = laid_out(42, false);
        n.do_layout(&LayoutContext::default());
        assert_eq!(n.digits(), vec![4, 2]);
    }
}
