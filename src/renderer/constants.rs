//! Shared constants for tablature glyph layout (all in unscaled user units).

// ── Sizing ──────────────────────────────────────────────────────────
pub(super) const DEFAULT_SCALE: f64 = 1.0;
pub(super) const GRACE_SCALE: f64 = 0.7; // grace notes and their digits

// ── Tab staff ───────────────────────────────────────────────────────
pub(super) const DEFAULT_STRING_SPACING: f64 = 10.0; // distance between tab lines
pub(super) const DEFAULT_BEAT_PADDING: f64 = 6.0; // gap before each beat column

// ── Glyph widths ────────────────────────────────────────────────────
pub(super) const DIGIT_WIDTH: f64 = 14.0;
pub(super) const DIGIT_ONE_WIDTH: f64 = 10.0; // "1" is narrower than the other digits
pub(super) const RIDE_CYMBAL_WIDTH: f64 = 9.0;

// ── Percussion ──────────────────────────────────────────────────────
/// General MIDI ride cymbal 1, ride bell and ride cymbal 2.
pub(super) const RIDE_CYMBAL_VALUES: [i32; 3] = [51, 53, 59];
