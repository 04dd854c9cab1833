//! Per-block event transformation.
//!
//! One pass over the block, in input order. Every MIDI event produces exactly
//! one output event; only Note-Ons may change. Events that are not MIDI are
//! dropped. With the `enabled` switch off, MIDI is copied unchanged and no
//! random numbers are drawn.
//!
//! ```text
//! Note-On ──► draw % < amount? ──no──► original 3 bytes, original time
//!                   │
//!                  yes
//!                   ▼
//!   velocity ± jitter·0.63 (clamped 1..=127)
//!   time     ± jitter·0.05·rate (clamped to the ordering window)
//! ```

use strand::prelude::{
    EventSink, MidiEvent, NoteOn, ProcessContext, MAX_DATA_VALUE, MIN_NOTE_ON_VELOCITY,
};

use crate::controls::Controls;
use crate::rng::RandomSource;

/// Scale applied to the velocity draw.
pub const VELOCITY_DAMPING: f32 = 0.63;

/// Scale applied to the timing draw, in seconds per unit of jitter.
pub const TIMING_DAMPING: f32 = 0.05;

/// What happened to one block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockReport {
    /// Events written to the output.
    pub emitted: usize,
    /// Note-Ons that took the randomized path.
    pub randomized: usize,
    /// Non-MIDI events skipped.
    pub dropped: usize,
    /// The output ran out of space; later events were not written.
    pub overflowed: bool,
}

/// Randomize one block of events into `output`.
///
/// Randomized notes are shifted in time but never past a neighbour: a note
/// is clamped to `[last emitted frame, min(next input frame, last frame of
/// the block)]`, and never before frame 0. The output therefore stays sorted
/// and inside the block, and every other event keeps its exact time stamp.
///
/// A timing draw of `t` can move a note by up to `t * 50 ms`, which at the
/// default of 15 is far wider than a typical block, so most shifted notes
/// end up on one edge of their window rather than spread across it.
pub fn randomize_block<'a, I, R, S>(
    input: I,
    controls: &Controls,
    context: &ProcessContext,
    rng: &mut R,
    output: &mut S,
) -> BlockReport
where
    I: IntoIterator<Item = MidiEvent<'a>>,
    R: RandomSource + ?Sized,
    S: EventSink + ?Sized,
{
    let mut report = BlockReport::default();
    let mut input = input.into_iter().peekable();
    let mut last_emitted: i64 = 0;

    while let Some(event) = input.next() {
        let Some(bytes) = event.as_midi() else {
            report.dropped += 1;
            continue;
        };

        let note_bytes: [u8; NoteOn::LEN];
        let note = NoteOn::parse(bytes).filter(|_| controls.enabled);
        let (frames, payload): (i64, &[u8]) = match note {
            // Also covers a Note-On status with fewer than 3 bytes
            None => (event.frames, bytes),
            Some(note) => {
                let frames = if rng.percent() < controls.effect_probability {
                    report.randomized += 1;
                    let note = if controls.velocity_jitter > 0.0 {
                        note.with_velocity(jitter_velocity(
                            note.velocity,
                            controls.velocity_jitter,
                            rng,
                        ))
                    } else {
                        note
                    };
                    note_bytes = note.to_bytes();

                    if controls.timing_jitter > 0.0 {
                        let next = input.peek().map(|next| next.frames);
                        let window = ordering_window(last_emitted, next, context);
                        jitter_time(
                            event.frames,
                            controls.timing_jitter,
                            context.sample_rate,
                            rng,
                            window,
                        )
                    } else {
                        event.frames
                    }
                } else {
                    note_bytes = note.to_bytes();
                    event.frames
                };
                (frames, &note_bytes[..])
            }
        };

        if !output.push(frames, payload) {
            report.overflowed = true;
            break;
        }
        report.emitted += 1;
        last_emitted = frames;
    }

    report
}

fn jitter_velocity<R: RandomSource + ?Sized>(velocity: u8, jitter: f32, rng: &mut R) -> u8 {
    let delta = (rng.uniform(-jitter, jitter) * VELOCITY_DAMPING) as i32;
    i32::from(velocity).saturating_add(delta).clamp(
        i32::from(MIN_NOTE_ON_VELOCITY),
        i32::from(MAX_DATA_VALUE),
    ) as u8
}

/// Inclusive frame range a shifted note may land in.
fn ordering_window(last_emitted: i64, next: Option<i64>, context: &ProcessContext) -> (i64, i64) {
    let lo = last_emitted.max(0);
    let block_end = context.last_frame();
    let hi = next.map_or(block_end, |next| next.min(block_end));
    (lo, hi.max(lo))
}

fn jitter_time<R: RandomSource + ?Sized>(
    frames: i64,
    jitter: f32,
    sample_rate: f64,
    rng: &mut R,
    (lo, hi): (i64, i64),
) -> i64 {
    let seconds = rng.uniform(-jitter, jitter) * TIMING_DAMPING;
    let shift = (f64::from(seconds) * sample_rate) as i64;
    frames.saturating_add(shift).clamp(lo, hi)
}
