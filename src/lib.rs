//! tablib: tablature note relationship resolution and glyph layout.
//!
//! A document is assembled (by an importer or the [`Track`] builder API),
//! finished once so that ties, hammer-ons/pull-offs and slides point at
//! their partner notes, and then rendered into laid-out glyph trees.
//!
//! # Example
//! ```
//! use tablib::{finish_track, layout_track, Duration, LayoutSettings, Note, Track};
//! use tablib::STANDARD_GUITAR_TUNING;
//!
//! let mut track = Track::new("Guitar", STANDARD_GUITAR_TUNING.to_vec());
//! let bar = track.add_bar();
//! let voice = track.add_voice(bar).unwrap();
//! let first = track.add_beat(voice, Duration::Quarter).unwrap();
//! track.add_note(first, Note::new(2, 5)).unwrap();
//! let second = track.add_beat(voice, Duration::Quarter).unwrap();
//! track.add_note(second, Note::tied(2)).unwrap();
//!
//! finish_track(&mut track).unwrap();
//! let rows = layout_track(&track, &LayoutSettings::default()).unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

pub mod error;
pub mod model;
pub mod renderer;
pub mod resolver;

pub use error::{TabError, TabResult};
pub use model::*;
pub use renderer::glyphs::{AnyGlyph, Glyph, GlyphGroup, LayoutContext, NumberGlyph};
pub use renderer::{build_beat_glyph, glyph_tree_to_json, layout_track, layout_voice_row, LayoutSettings};
pub use resolver::{finish_note, finish_score, finish_track};

/// Convert a score to a JSON string.
pub fn score_to_json(score: &Score) -> TabResult<String> {
    Ok(serde_json::to_string_pretty(score)?)
}

/// Read a score back from JSON produced by [`score_to_json`].
///
/// Every track is checked with [`Track::validate`] while loading, so a
/// document with dangling ids or looping beat links is rejected here. The
/// result is not finished; run [`finish_score`] before rendering.
pub fn score_from_json(json: &str) -> TabResult<Score> {
    Ok(serde_json::from_str(json)?)
}

/// Finish every track of a score and lay each one out.
pub fn finish_and_layout(
    score: &mut Score,
    settings: &LayoutSettings,
) -> TabResult<Vec<Vec<GlyphGroup>>> {
    finish_score(score)?;
    score
        .tracks
        .iter()
        .map(|t| layout_track(t, settings))
        .collect()
}
