//! Note relationship resolution.
//!
//! After a document is fully assembled, every note is finished once:
//! tie destinations find their origin, hammer-on/pull-off origins find
//! their destination, and slides find their target. Partners are searched
//! along the note's string, beat by beat, no further than
//! [`MAX_BAR_OFFSET_FOR_SAME_STRING_SEARCH`] bars away.
//!
//! A marked relationship whose partner cannot be found is downgraded
//! (the flag is cleared) instead of being reported as an error. Slides are
//! the exception: a slide may trail off, so it keeps its type and simply
//! has no target.

use crate::error::TabResult;
use crate::model::*;

/// How many bars a same-string search may move away from the origin bar.
pub const MAX_BAR_OFFSET_FOR_SAME_STRING_SEARCH: usize = 3;

#[cfg(test)]
thread_local! {
    static SEARCHES: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Find the closest later note on the same string, within the bar window.
pub fn next_note_on_same_string(track: &Track, note: NoteId) -> TabResult<Option<NoteId>> {
    search_same_string(track, note, Direction::Forward)
}

/// Find the closest earlier note on the same string, within the bar window.
pub fn previous_note_on_same_string(track: &Track, note: NoteId) -> TabResult<Option<NoteId>> {
    search_same_string(track, note, Direction::Backward)
}

fn search_same_string(
    track: &Track,
    note: NoteId,
    direction: Direction,
) -> TabResult<Option<NoteId>> {
    #[cfg(test)]
    SEARCHES.with(|c| c.set(c.get() + 1));

    let n = track.note(note)?;
    let Some(origin_beat) = n.beat() else {
        return Ok(None);
    };
    let string = n.string;
    let Some(origin_bar) = track.bar_index_of(origin_beat) else {
        return Ok(None);
    };

    let step = |beat: BeatId| match direction {
        Direction::Forward => track.next_beat(beat),
        Direction::Backward => track.previous_beat(beat),
    };
    let within_window = |bar: usize| match direction {
        Direction::Forward => bar <= origin_bar + MAX_BAR_OFFSET_FOR_SAME_STRING_SEARCH,
        Direction::Backward => bar + MAX_BAR_OFFSET_FOR_SAME_STRING_SEARCH >= origin_bar,
    };

    let mut current = step(origin_beat);
    while let Some(beat) = current {
        match track.bar_index_of(beat) {
            Some(bar) if within_window(bar) => {}
            _ => break,
        }
        if let Some(found) = track.note_on_string(beat, string) {
            return Ok(Some(found));
        }
        current = step(beat);
    }
    Ok(None)
}

/// Both search directions for one note, each computed on first use.
struct SameStringNeighbours {
    note: NoteId,
    next: Option<Option<NoteId>>,
    previous: Option<Option<NoteId>>,
}

impl SameStringNeighbours {
    fn new(note: NoteId) -> Self {
        Self {
            note,
            next: None,
            previous: None,
        }
    }

    fn next(&mut self, track: &Track) -> TabResult<Option<NoteId>> {
        if let Some(found) = self.next {
            return Ok(found);
        }
        let found = next_note_on_same_string(track, self.note)?;
        self.next = Some(found);
        Ok(found)
    }

    fn previous(&mut self, track: &Track) -> TabResult<Option<NoteId>> {
        if let Some(found) = self.previous {
            return Ok(found);
        }
        let found = previous_note_on_same_string(track, self.note)?;
        self.previous = Some(found);
        Ok(found)
    }
}

/// Resolve the tie, hammer-on/pull-off and slide links of one note.
///
/// Calling this again without changing the document leaves the links as
/// they are: a cleared flag stays cleared and a found partner is found
/// again.
pub fn finish_note(track: &mut Track, note: NoteId) -> TabResult<()> {
    let mut neighbours = SameStringNeighbours::new(note);

    if track.note(note)?.is_tie_destination {
        match neighbours.previous(track)? {
            Some(origin) => {
                let origin_fret = {
                    let o = track.note_mut(origin)?;
                    o.is_tie_origin = true;
                    o.fret
                };
                let n = track.note_mut(note)?;
                n.tie_origin = Some(origin);
                n.fret = origin_fret;
            }
            None => {
                tracing::debug!(note = note.0, "tie without origin, clearing tie destination");
                track.note_mut(note)?.is_tie_destination = false;
            }
        }
    }

    if track.note(note)?.is_hammer_pull_origin {
        match neighbours.next(track)? {
            Some(destination) => {
                let d = track.note_mut(destination)?;
                d.is_hammer_pull_destination = true;
                d.hammer_pull_origin = Some(note);
            }
            None => {
                tracing::debug!(
                    note = note.0,
                    "hammer-on/pull-off without destination, clearing origin"
                );
                track.note_mut(note)?.is_hammer_pull_origin = false;
            }
        }
    }

    if track.note(note)?.slide_type != SlideType::None {
        let target = neighbours.next(track)?;
        if target.is_none() {
            tracing::debug!(note = note.0, "slide has no target note");
        }
        track.note_mut(note)?.slide_target = target;
    }

    Ok(())
}

/// Finish every note of a track in document order, then mark it finished.
///
/// Document order matters for chained ties: an origin is finished before
/// the destination copies its fret.
#[tracing::instrument(skip(track), fields(track_name = %track.name))]
pub fn finish_track(track: &mut Track) -> TabResult<()> {
    let ids = track.note_ids_in_order();
    for id in &ids {
        finish_note(track, *id)?;
    }
    track.mark_finished();
    tracing::debug!(notes = ids.len(), "track finished");
    Ok(())
}

/// Finish every track of a score.
#[tracing::instrument(skip(score), fields(tracks = score.tracks.len()))]
pub fn finish_score(score: &mut Score) -> TabResult<()> {
    for track in &mut score.tracks {
        finish_track(track)?;
    }
    Ok(())
}
