//! Data model for a fretted-instrument score.
//!
//! A [`Track`] owns flat arenas of bars, voices, beats and notes. Every
//! cross reference (note → beat, tie origin, hammer-on origin, slide
//! target, beat navigation) is a typed index into those arenas, so
//! relationships never own each other.

use serde::{Deserialize, Serialize};

use crate::error::{TabError, TabResult};

/// Sentinel fret value meaning "no fret assigned yet".
pub const FRET_UNSET: i32 = -1;

/// Standard six-string guitar tuning (E2 A2 D3 G3 B3 E4), lowest string first.
pub const STANDARD_GUITAR_TUNING: [i32; 6] = [40, 45, 50, 55, 59, 64];

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

arena_id!(
    /// Index of a [`Bar`] within its track.
    BarId
);
arena_id!(
    /// Index of a [`Voice`] within its track.
    VoiceId
);
arena_id!(
    /// Index of a [`Beat`] within its track.
    BeatId
);
arena_id!(
    /// Index of a [`Note`] within its track.
    NoteId
);

// ═══════════════════════════════════════════════════════════════════════
// Note effects
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmonicType {
    #[default]
    None,
    Natural,
    Artificial,
    Pinch,
    Tap,
    Semi,
    Feedback,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VibratoType {
    #[default]
    None,
    Slight,
    Wide,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlideType {
    #[default]
    None,
    Shift,
    Legato,
    IntoFromBelow,
    IntoFromAbove,
    OutUp,
    OutDown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccentuationType {
    #[default]
    None,
    Normal,
    Heavy,
}

/// Fingering annotation for either hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fingers {
    Unknown,
    #[default]
    NoOrDead,
    Thumb,
    IndexFinger,
    MiddleFinger,
    AnnularFinger,
    LittleFinger,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DynamicValue {
    PPP,
    PP,
    P,
    MP,
    MF,
    #[default]
    F,
    FF,
    FFF,
}

/// Rhythmic value of a beat (or of a trill's alternation speed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Duration {
    Whole,
    Half,
    #[default]
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
}

/// One point of a bend curve: `offset` along the note (0–60), `value` in
/// quarter tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BendPoint {
    pub offset: i32,
    pub value: i32,
}

// ═══════════════════════════════════════════════════════════════════════
// Note
// ═══════════════════════════════════════════════════════════════════════

/// A single played sound: a fret on a string, plus its effects and its
/// relationships to neighbouring notes on the same string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Fret offset; [`FRET_UNSET`] until assigned
    pub fret: i32,
    /// 1-based string number, 1 being the highest-pitched string
    pub string: usize,
    /// Fraction of the beat's nominal duration actually sounded
    pub duration_percent: f64,

    pub is_ghost: bool,
    pub is_let_ring: bool,
    pub is_palm_mute: bool,
    pub is_dead: bool,
    pub is_staccato: bool,

    pub harmonic_type: HarmonicType,
    pub harmonic_value: f64,
    pub vibrato: VibratoType,
    /// Absolute pitch alternated with in a trill; `-1` when there is no trill
    pub trill_value: i32,
    pub trill_speed: Duration,
    pub bend_points: Vec<BendPoint>,

    pub accentuated: AccentuationType,
    pub left_hand_finger: Fingers,
    pub right_hand_finger: Fingers,
    pub is_fingering: bool,
    pub dynamic: DynamicValue,
    pub octave: i32,
    pub swap_accidentals: bool,

    pub tie_origin: Option<NoteId>,
    pub is_tie_origin: bool,
    pub is_tie_destination: bool,

    pub hammer_pull_origin: Option<NoteId>,
    pub is_hammer_pull_origin: bool,
    pub is_hammer_pull_destination: bool,

    pub slide_type: SlideType,
    pub slide_target: Option<NoteId>,

    /// Owning beat, assigned once by [`Track::add_note`]
    beat: Option<BeatId>,
}

impl Note {
    /// Create a detached note with every effect at its default.
    pub fn new(string: usize, fret: i32) -> Self {
        Self {
            fret,
            string,
            duration_percent: 1.0,
            is_ghost: false,
            is_let_ring: false,
            is_palm_mute: false,
            is_dead: false,
            is_staccato: false,
            harmonic_type: HarmonicType::None,
            harmonic_value: 0.0,
            vibrato: VibratoType::None,
            trill_value: -1,
            trill_speed: Duration::ThirtySecond,
            bend_points: Vec::new(),
            accentuated: AccentuationType::None,
            left_hand_finger: Fingers::NoOrDead,
            right_hand_finger: Fingers::NoOrDead,
            is_fingering: false,
            dynamic: DynamicValue::F,
            octave: -1,
            swap_accidentals: false,
            tie_origin: None,
            is_tie_origin: false,
            is_tie_destination: false,
            hammer_pull_origin: None,
            is_hammer_pull_origin: false,
            is_hammer_pull_destination: false,
            slide_type: SlideType::None,
            slide_target: None,
            beat: None,
        }
    }

    /// A note whose fret is carried over from the previous note on its string.
    pub fn tied(string: usize) -> Self {
        Self {
            is_tie_destination: true,
            ..Self::new(string, FRET_UNSET)
        }
    }

    /// The beat this note was added to, if any.
    pub fn beat(&self) -> Option<BeatId> {
        self.beat
    }

    pub fn has_bend(&self) -> bool {
        !self.bend_points.is_empty()
    }

    pub fn is_trill(&self) -> bool {
        self.trill_value >= 0
    }

    pub fn is_fret_set(&self) -> bool {
        self.fret != FRET_UNSET
    }

    /// Copy the note without its references to other notes.
    ///
    /// The copy keeps every flag, relationship flags and slide type
    /// included, but has no beat and no tie origin, hammer-on origin or
    /// slide target. Finishing it after it is added to a beat resolves
    /// those again.
    pub fn clone_effects(&self) -> Note {
        Note {
            tie_origin: None,
            hammer_pull_origin: None,
            slide_target: None,
            beat: None,
            ..self.clone()
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Self::new(1, FRET_UNSET)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Containers
// ═══════════════════════════════════════════════════════════════════════

/// A rhythmic event within a voice holding at most one note per string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beat {
    pub voice: VoiceId,
    /// Position within the owning voice
    pub index: usize,
    pub duration: Duration,
    pub is_grace: bool,
    pub notes: Vec<NoteId>,
    pub previous: Option<BeatId>,
    pub next: Option<BeatId>,
}

/// One independent rhythmic lane inside a bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub bar: BarId,
    /// Lane number within the bar; beats chain across bars per lane
    pub index: usize,
    pub beats: Vec<BeatId>,
}

/// A measure of the track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Monotonic position within the track (0-based)
    pub index: usize,
    pub voices: Vec<VoiceId>,
}

/// One instrument's full part together with the storage for all of its
/// bars, voices, beats and notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrackParts")]
pub struct Track {
    pub name: String,
    /// Open-string pitches, lowest string first
    pub tuning: Vec<i32>,
    pub is_percussion: bool,
    bars: Vec<Bar>,
    voices: Vec<Voice>,
    beats: Vec<Beat>,
    notes: Vec<Note>,
    #[serde(skip)]
    finished: bool,
}

/// Deserialized track storage, checked by [`Track::validate`] before it
/// becomes a [`Track`].
#[derive(Deserialize)]
struct TrackParts {
    name: String,
    tuning: Vec<i32>,
    is_percussion: bool,
    bars: Vec<Bar>,
    voices: Vec<Voice>,
    beats: Vec<Beat>,
    notes: Vec<Note>,
}

impl TryFrom<TrackParts> for Track {
    type Error = TabError;

    fn try_from(p: TrackParts) -> TabResult<Self> {
        let track = Track {
            name: p.name,
            tuning: p.tuning,
            is_percussion: p.is_percussion,
            bars: p.bars,
            voices: p.voices,
            beats: p.beats,
            notes: p.notes,
            finished: false,
        };
        track.validate()?;
        Ok(track)
    }
}

/// A complete document: metadata plus its tracks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub tracks: Vec<Track>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bars in the longest track.
    pub fn bar_count(&self) -> usize {
        self.tracks.iter().map(|t| t.bars.len()).max().unwrap_or(0)
    }
}

impl Track {
    /// Create an empty fretted track with the given tuning (lowest string first).
    pub fn new(name: impl Into<String>, tuning: Vec<i32>) -> Self {
        Self {
            name: name.into(),
            tuning,
            is_percussion: false,
            bars: Vec::new(),
            voices: Vec::new(),
            beats: Vec::new(),
            notes: Vec::new(),
            finished: false,
        }
    }

    /// Create an empty percussion track. Percussion notes carry their
    /// instrument value in `fret` and are not bound to a tuning.
    pub fn percussion(name: impl Into<String>) -> Self {
        Self {
            is_percussion: true,
            ..Self::new(name, Vec::new())
        }
    }

    pub fn string_count(&self) -> usize {
        self.tuning.len()
    }

    /// Whether note relationships have been resolved for the whole track.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn mark_finished(&mut self) {
        self.finished = true;
    }

    // ── Building ────────────────────────────────────────────────────

    /// Append a bar at the end of the track.
    pub fn add_bar(&mut self) -> BarId {
        let id = BarId(self.bars.len());
        self.bars.push(Bar {
            index: id.0,
            voices: Vec::new(),
        });
        self.finished = false;
        id
    }

    /// Append a voice lane to a bar.
    pub fn add_voice(&mut self, bar: BarId) -> TabResult<VoiceId> {
        let id = VoiceId(self.voices.len());
        let b = self.bars.get_mut(bar.0).ok_or(TabError::UnknownBar(bar.0))?;
        let index = b.voices.len();
        b.voices.push(id);
        self.voices.push(Voice {
            bar,
            index,
            beats: Vec::new(),
        });
        self.finished = false;
        Ok(id)
    }

    /// Append a beat to a voice and chain it after the preceding beat of
    /// the same voice lane, which may live in an earlier bar.
    ///
    /// Beats must be appended in document order.
    pub fn add_beat(&mut self, voice: VoiceId, duration: Duration) -> TabResult<BeatId> {
        let v = self.voices.get(voice.0).ok_or(TabError::UnknownVoice(voice.0))?;
        let previous = self.last_beat_in_lane(v.bar, v.index);
        let index = v.beats.len();

        let id = BeatId(self.beats.len());
        self.beats.push(Beat {
            voice,
            index,
            duration,
            is_grace: false,
            notes: Vec::new(),
            previous,
            next: None,
        });
        self.voices[voice.0].beats.push(id);
        if let Some(prev) = previous {
            self.beats[prev.0].next = Some(id);
        }
        self.finished = false;
        Ok(id)
    }

    /// Place a note into a beat, taking ownership of it.
    pub fn add_note(&mut self, beat: BeatId, mut note: Note) -> TabResult<NoteId> {
        self.check_string(note.string)?;
        if self.beats.get(beat.0).is_none() {
            return Err(TabError::UnknownBeat(beat.0));
        }
        if self.note_on_string(beat, note.string).is_some() {
            return Err(TabError::StringOccupied { string: note.string });
        }

        let id = NoteId(self.notes.len());
        note.beat = Some(beat);
        self.notes.push(note);
        self.beats[beat.0].notes.push(id);
        self.finished = false;
        Ok(id)
    }

    /// Edit a note in place. The track has to be finished again afterwards.
    ///
    /// A string change goes through the same checks as [`Track::add_note`];
    /// on error the note is left untouched. The beat back-reference cannot
    /// be changed.
    pub fn update_note(&mut self, id: NoteId, edit: impl FnOnce(&mut Note)) -> TabResult<()> {
        let current = self.note(id)?;
        let beat = current.beat;
        let mut edited = current.clone();
        edit(&mut edited);
        edited.beat = beat;

        if edited.string != current.string {
            self.check_string(edited.string)?;
            if let Some(beat) = beat {
                if self.note_on_string(beat, edited.string).is_some() {
                    return Err(TabError::StringOccupied {
                        string: edited.string,
                    });
                }
            }
        }

        *self.notes.get_mut(id.0).ok_or(TabError::UnknownNote(id.0))? = edited;
        self.finished = false;
        Ok(())
    }

    /// Mark a beat as a grace beat (or a regular one).
    pub fn set_grace(&mut self, beat: BeatId, is_grace: bool) -> TabResult<()> {
        self.beats
            .get_mut(beat.0)
            .ok_or(TabError::UnknownBeat(beat.0))?
            .is_grace = is_grace;
        self.finished = false;
        Ok(())
    }

    fn check_string(&self, string: usize) -> TabResult<()> {
        let string_count = self.string_count();
        if string == 0 || (!self.is_percussion && string > string_count) {
            return Err(TabError::StringOutOfRange {
                string,
                string_count,
            });
        }
        Ok(())
    }

    fn last_beat_in_lane(&self, bar: BarId, lane: usize) -> Option<BeatId> {
        (0..=bar.0).rev().find_map(|bi| {
            let vid = self.bars.get(bi)?.voices.get(lane)?;
            self.voices.get(vid.0)?.beats.last().copied()
        })
    }

    // ── Access ──────────────────────────────────────────────────────

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn bar(&self, id: BarId) -> TabResult<&Bar> {
        self.bars.get(id.0).ok_or(TabError::UnknownBar(id.0))
    }

    pub fn voice(&self, id: VoiceId) -> TabResult<&Voice> {
        self.voices.get(id.0).ok_or(TabError::UnknownVoice(id.0))
    }

    pub fn beat(&self, id: BeatId) -> TabResult<&Beat> {
        self.beats.get(id.0).ok_or(TabError::UnknownBeat(id.0))
    }

    pub fn note(&self, id: NoteId) -> TabResult<&Note> {
        self.notes.get(id.0).ok_or(TabError::UnknownNote(id.0))
    }

    /// Resolution writes links through this without clearing `finished`.
    pub(crate) fn note_mut(&mut self, id: NoteId) -> TabResult<&mut Note> {
        self.notes.get_mut(id.0).ok_or(TabError::UnknownNote(id.0))
    }

    /// Note ids in document order: bar, then voice lane, then beat, then
    /// the order notes were added to the beat.
    pub fn note_ids_in_order(&self) -> Vec<NoteId> {
        let mut ids = Vec::with_capacity(self.notes.len());
        for bar in &self.bars {
            for voice in bar.voices.iter().filter_map(|v| self.voices.get(v.0)) {
                for beat in voice.beats.iter().filter_map(|b| self.beats.get(b.0)) {
                    ids.extend_from_slice(&beat.notes);
                }
            }
        }
        ids
    }

    // ── Timeline cursor ─────────────────────────────────────────────

    pub fn next_beat(&self, beat: BeatId) -> Option<BeatId> {
        self.beats.get(beat.0)?.next
    }

    pub fn previous_beat(&self, beat: BeatId) -> Option<BeatId> {
        self.beats.get(beat.0)?.previous
    }

    /// The note a beat holds on `string`, if any.
    pub fn note_on_string(&self, beat: BeatId, string: usize) -> Option<NoteId> {
        self.beats
            .get(beat.0)?
            .notes
            .iter()
            .copied()
            .find(|n| self.notes.get(n.0).is_some_and(|note| note.string == string))
    }

    /// Index of the bar containing `beat`.
    pub fn bar_index_of(&self, beat: BeatId) -> Option<usize> {
        let voice = self.voices.get(self.beats.get(beat.0)?.voice.0)?;
        Some(self.bars.get(voice.bar.0)?.index)
    }

    // ── Consistency ─────────────────────────────────────────────────

    /// Check that the arenas fit together the way the builder leaves them.
    ///
    /// Every id is in range and agrees with its owner's back-reference,
    /// notes sit on valid and distinct strings, `previous`/`next` links
    /// mirror each other, and following `next` always moves forward in
    /// (bar, beat) order, so beat chains cannot cycle.
    pub fn validate(&self) -> TabResult<()> {
        let fail = |reason: String| TabError::InconsistentTrack {
            track: self.name.clone(),
            reason,
        };

        for (bi, bar) in self.bars.iter().enumerate() {
            if bar.index != bi {
                return Err(fail(format!("bar {bi} claims index {}", bar.index)));
            }
            for vid in &bar.voices {
                let voice = self.voice(*vid).map_err(|e| fail(e.to_string()))?;
                if voice.bar != BarId(bi) {
                    return Err(fail(format!("voice {} is listed by bar {bi}", vid.0)));
                }
            }
        }

        for (vi, voice) in self.voices.iter().enumerate() {
            self.bar(voice.bar).map_err(|e| fail(e.to_string()))?;
            for (pos, bid) in voice.beats.iter().enumerate() {
                let beat = self.beat(*bid).map_err(|e| fail(e.to_string()))?;
                if beat.voice != VoiceId(vi) || beat.index != pos {
                    return Err(fail(format!("beat {} is misplaced in voice {vi}", bid.0)));
                }
            }
        }

        for (bi, beat) in self.beats.iter().enumerate() {
            let id = BeatId(bi);
            self.voice(beat.voice).map_err(|e| fail(e.to_string()))?;
            let mut strings = Vec::with_capacity(beat.notes.len());
            for nid in &beat.notes {
                let note = self.note(*nid).map_err(|e| fail(e.to_string()))?;
                if note.beat != Some(id) {
                    return Err(fail(format!("note {} is listed by beat {bi}", nid.0)));
                }
                self.check_string(note.string)
                    .map_err(|e| fail(e.to_string()))?;
                if strings.contains(&note.string) {
                    let e = TabError::StringOccupied { string: note.string };
                    return Err(fail(format!("beat {bi}: {e}")));
                }
                strings.push(note.string);
            }

            if let Some(next) = beat.next {
                let n = self.beat(next).map_err(|e| fail(e.to_string()))?;
                if n.previous != Some(id) {
                    return Err(fail(format!("beat {bi} -> {} is not linked back", next.0)));
                }
                if self.beat_order(next) <= self.beat_order(id) {
                    return Err(fail(format!("beat {bi} -> {} goes backwards", next.0)));
                }
            }
            if let Some(previous) = beat.previous {
                let p = self.beat(previous).map_err(|e| fail(e.to_string()))?;
                if p.next != Some(id) {
                    return Err(fail(format!("beat {bi} <- {} is not linked back", previous.0)));
                }
            }
        }

        for (ni, note) in self.notes.iter().enumerate() {
            let listed = note
                .beat
                .and_then(|b| self.beats.get(b.0))
                .is_some_and(|b| b.notes.contains(&NoteId(ni)));
            if !listed {
                return Err(fail(format!("note {ni} is not held by its beat")));
            }
            for link in [note.tie_origin, note.hammer_pull_origin, note.slide_target]
                .into_iter()
                .flatten()
            {
                self.note(link).map_err(|e| fail(e.to_string()))?;
            }
        }
        Ok(())
    }

    fn beat_order(&self, beat: BeatId) -> Option<(usize, usize)> {
        Some((self.bar_index_of(beat)?, self.beats.get(beat.0)?.index))
    }

    // ── Pitch ───────────────────────────────────────────────────────

    /// Open-string pitch of the string a note is played on.
    ///
    /// Tuning is stored lowest string first while strings are numbered from
    /// the highest, so string `s` maps to `tuning[len - s]`.
    pub fn string_tuning(&self, note: &Note) -> Option<i32> {
        let count = self.tuning.len();
        if note.string == 0 || note.string > count {
            return None;
        }
        Some(self.tuning[count - note.string])
    }

    /// Absolute pitch of a note; `None` while its fret is unset.
    pub fn real_value(&self, note: &Note) -> Option<i32> {
        if !note.is_fret_set() {
            return None;
        }
        Some(note.fret + self.string_tuning(note)?)
    }

    /// Fret that the trill alternates with.
    pub fn trill_fret(&self, note: &Note) -> Option<i32> {
        if !note.is_trill() {
            return None;
        }
        Some(note.trill_value - self.string_tuning(note)?)
    }
}
