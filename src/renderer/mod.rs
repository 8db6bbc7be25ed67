//! Tablature renderer: turns a finished track into laid-out glyph trees.
//!
//! The renderer only reads the document. Note relationships must already
//! be resolved (see [`crate::resolver::finish_track`]) because ties change
//! the frets drawn here. The resulting glyph trees carry final coordinates
//! and can be handed to any painter, directly or as JSON.

mod constants;
pub mod glyphs;

use serde::{Deserialize, Serialize};

use crate::error::{TabError, TabResult};
use crate::model::*;
use constants::*;
use glyphs::*;

// ═══════════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════════

/// Runtime layout knobs. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Global zoom applied to glyph widths and line spacing
    pub scale: f64,
    /// Unscaled distance between two tab lines
    pub string_spacing: f64,
    /// Unscaled gap placed before every beat column
    pub beat_padding: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            string_spacing: DEFAULT_STRING_SPACING,
            beat_padding: DEFAULT_BEAT_PADDING,
        }
    }
}

impl LayoutSettings {
    /// Parse settings from JSON and check they describe a drawable layout.
    pub fn from_json(json: &str) -> TabResult<Self> {
        let settings: LayoutSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> TabResult<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(TabError::InvalidSettings(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        if !(self.string_spacing.is_finite() && self.string_spacing >= 0.0) {
            return Err(TabError::InvalidSettings(format!(
                "string_spacing must be non-negative, got {}",
                self.string_spacing
            )));
        }
        if !(self.beat_padding.is_finite() && self.beat_padding >= 0.0) {
            return Err(TabError::InvalidSettings(format!(
                "beat_padding must be non-negative, got {}",
                self.beat_padding
            )));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Glyph construction
// ═══════════════════════════════════════════════════════════════════════

fn ensure_finished(track: &Track) -> TabResult<()> {
    if track.is_finished() {
        Ok(())
    } else {
        Err(TabError::TrackNotFinished(track.name.clone()))
    }
}

/// Glyph for a single note, or `None` when the note has nothing to draw.
fn note_glyph(track: &Track, note: &Note, is_grace: bool) -> TabResult<Option<AnyGlyph>> {
    if !note.is_fret_set() {
        return Ok(None);
    }
    if track.is_percussion && RIDE_CYMBAL_VALUES.contains(&note.fret) {
        return Ok(Some(RideCymbalGlyph::new(0.0, 0.0, is_grace).into()));
    }
    Ok(Some(NumberGlyph::new(0.0, 0.0, note.fret, is_grace)?.into()))
}

/// Build the (not yet laid out) column of note glyphs for one beat.
#[tracing::instrument(skip(track), fields(track_name = %track.name))]
pub fn build_beat_glyph(track: &Track, beat: BeatId) -> TabResult<TabBeatGlyph> {
    ensure_finished(track)?;
    let b = track.beat(beat)?;

    let mut glyph = TabBeatGlyph::new(0.0, 0.0);
    for id in &b.notes {
        let note = track.note(*id)?;
        if let Some(g) = note_glyph(track, note, b.is_grace)? {
            glyph.add_note(note.string, g);
        }
    }
    Ok(glyph)
}

/// Lay out one voice as a row of beat columns, each preceded by padding,
/// starting at `(x, y)`.
pub fn layout_voice_row(
    track: &Track,
    voice: VoiceId,
    x: f64,
    y: f64,
    settings: &LayoutSettings,
) -> TabResult<GlyphGroup> {
    settings.validate()?;
    let v = track.voice(voice)?;

    let mut row = GlyphGroup::new(x, y);
    for beat in &v.beats {
        row.add(SpacingGlyph::new(0.0, 0.0, settings.beat_padding, true));
        row.add(build_beat_glyph(track, *beat)?);
    }
    row.do_layout(&LayoutContext::new(settings));
    Ok(row)
}

/// Lay out every bar of a track side by side, using each bar's first voice.
///
/// Bars without voices produce an empty row of zero width.
#[tracing::instrument(skip(track, settings), fields(track_name = %track.name))]
pub fn layout_track(track: &Track, settings: &LayoutSettings) -> TabResult<Vec<GlyphGroup>> {
    ensure_finished(track)?;
    let mut rows = Vec::with_capacity(track.bars().len());
    let mut x = 0.0;
    for bar in track.bars() {
        let row = match bar.voices.first() {
            Some(voice) => layout_voice_row(track, *voice, x, 0.0, settings)?,
            None => GlyphGroup::new(x, 0.0),
        };
        x += row.width();
        rows.push(row);
    }
    tracing::debug!(bars = rows.len(), width = x, "track laid out");
    Ok(rows)
}

/// Serialize a laid-out glyph tree for an external painter.
pub fn glyph_tree_to_json<G: Serialize>(glyph: &G) -> TabResult<String> {
    Ok(serde_json::to_string_pretty(glyph)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::finish_track;
    use pretty_assertions::assert_eq;

    fn one_beat_track(notes: Vec<Note>) -> (Track, BeatId) {
        let mut t = Track::new("Guitar", STANDARD_GUITAR_TUNING.to_vec());
        let bar = t.add_bar();
        let v = t.add_voice(bar).unwrap();
        let beat = t.add_beat(v, Duration::Quarter).unwrap();
        for n in notes {
            t.add_note(beat, n).unwrap();
        }
        (t, beat)
    }

    #[test]
    fn unfinished_track_cannot_render() {
        let (t, beat) = one_beat_track(vec![Note::new(1, 3)]);
        assert_eq!(
            build_beat_glyph(&t, beat),
            Err(TabError::TrackNotFinished("Guitar".into()))
        );
    }

    #[test]
    fn unset_frets_are_skipped() {
        let (mut t, beat) = one_beat_track(vec![Note::new(1, 3), Note::new(2, FRET_UNSET)]);
        finish_track(&mut t).unwrap();
        let glyph = build_beat_glyph(&t, beat).unwrap();
        assert_eq!(glyph.notes().len(), 1);
        assert_eq!(glyph.notes()[0].string, 1);
    }

    #[test]
    fn settings_fill_missing_fields_from_defaults() {
        let s = LayoutSettings::from_json(r#"{ "scale": 1.5 }"#).unwrap();
        assert_eq!(s.scale, 1.5);
        assert_eq!(s.string_spacing, DEFAULT_STRING_SPACING);
        assert_eq!(s.beat_padding, DEFAULT_BEAT_PADDING);
    }

    #[test]
    fn settings_reject_non_positive_scale() {
        assert!(matches!(
            LayoutSettings::from_json(r#"{ "scale": 0 }"#),
            Err(TabError::InvalidSettings(_))
        ));
        assert!(matches!(
            LayoutSettings::from_json("{ not json"),
            Err(TabError::Serde(_))
        ));
    }

    #[test]
    fn percussion_ride_values_use_cymbal_heads() {
        let mut t = Track::percussion("Drums");
        let bar = t.add_bar();
        let v = t.add_voice(bar).unwrap();
        let beat = t.add_beat(v, Duration::Eighth).unwrap();
        t.add_note(beat, Note::new(1, 51)).unwrap();
        t.add_note(beat, Note::new(2, 38)).unwrap();
        finish_track(&mut t).unwrap();

        let glyph = build_beat_glyph(&t, beat).unwrap();
        assert!(matches!(glyph.notes()[0].glyph, AnyGlyph::RideCymbal(_)));
        assert!(matches!(glyph.notes()[1].glyph, AnyGlyph::Number(_)));
    }
}
