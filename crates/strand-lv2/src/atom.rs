//! Atom sequence reading and writing.
//!
//! MIDI travels between host and plugin as an `atom:Sequence`:
//!
//! ```text
//! | size u32 | type u32 | unit u32 | pad u32 |             sequence header
//! | frames i64 | size u32 | type u32 | bytes... | pad |     event 0
//! | frames i64 | size u32 | type u32 | bytes... | pad |     event 1
//! ```
//!
//! All fields are native-endian and every event is padded to 8 bytes. Both
//! sides work on byte slices with explicit bounds checks, so a malformed
//! host buffer can at worst end a block early.

use strand_core::{EventSink, MidiEvent};

use crate::sys::{pad_size, Lv2Urid, ATOM_HEADER_SIZE, EVENT_HEADER_SIZE, SEQUENCE_HEADER_SIZE};

#[inline]
fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[at..at + 4]);
    u32::from_ne_bytes(raw)
}

#[inline]
fn read_i64(bytes: &[u8], at: usize) -> i64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&bytes[at..at + 8]);
    i64::from_ne_bytes(raw)
}

#[inline]
fn write_u32(bytes: &mut [u8], at: usize, value: u32) {
    bytes[at..at + 4].copy_from_slice(&value.to_ne_bytes());
}

#[inline]
fn write_i64(bytes: &mut [u8], at: usize, value: i64) {
    bytes[at..at + 8].copy_from_slice(&value.to_ne_bytes());
}

// =============================================================================
// Reader
// =============================================================================

/// Iterates over the events of an input sequence.
///
/// Events whose type is `midi:MidiEvent` are yielded as
/// [`EventBody::Midi`](strand_core::EventBody::Midi); every other type as
/// [`EventBody::Unknown`](strand_core::EventBody::Unknown). Iteration stops
/// at the first event that does not fit inside the declared sequence size.
#[derive(Debug, Clone)]
pub struct SequenceReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    end: usize,
    midi_event: Lv2Urid,
}

impl<'a> SequenceReader<'a> {
    /// Read a sequence. `bytes` starts at the sequence's atom header and may
    /// extend past the sequence.
    pub fn new(bytes: &'a [u8], midi_event: Lv2Urid) -> Self {
        if bytes.len() < SEQUENCE_HEADER_SIZE {
            return Self::empty(midi_event);
        }

        let declared = ATOM_HEADER_SIZE.saturating_add(read_u32(bytes, 0) as usize);
        Self {
            bytes,
            pos: SEQUENCE_HEADER_SIZE,
            end: declared.min(bytes.len()),
            midi_event,
        }
    }

    /// A reader that yields nothing, for an unconnected input port.
    pub fn empty(midi_event: Lv2Urid) -> Self {
        Self {
            bytes: &[],
            pos: 0,
            end: 0,
            midi_event,
        }
    }
}

impl<'a> Iterator for SequenceReader<'a> {
    type Item = MidiEvent<'a>;

    fn next(&mut self) -> Option<MidiEvent<'a>> {
        if self.pos.saturating_add(EVENT_HEADER_SIZE) > self.end {
            return None;
        }

        let frames = read_i64(self.bytes, self.pos);
        let size = read_u32(self.bytes, self.pos + 8) as usize;
        let type_urid = read_u32(self.bytes, self.pos + 12);
        let start = self.pos + EVENT_HEADER_SIZE;

        let Some(stop) = start.checked_add(size).filter(|&stop| stop <= self.end) else {
            // Truncated event: nothing after it can be trusted either
            self.pos = self.end;
            return None;
        };

        self.pos = start.saturating_add(pad_size(size));

        Some(if type_urid == self.midi_event {
            MidiEvent::midi(frames, &self.bytes[start..stop])
        } else {
            MidiEvent::unknown(frames, type_urid)
        })
    }
}

// =============================================================================
// Writer
// =============================================================================

/// Writes MIDI events as an `atom:Sequence` into a host output buffer.
///
/// The capacity is the length of the slice, which the wrapper takes from the
/// `atom.size` the host placed in the output port before `run`. The sequence
/// header always reflects the events written so far, so there is no separate
/// finish step.
///
/// A buffer too short for the sequence header accepts no events. That alone
/// is not an overflow: [`has_overflowed`](EventSink::has_overflowed) only
/// turns true once a push has actually been refused.
#[derive(Debug)]
pub struct SequenceWriter<'a> {
    bytes: &'a mut [u8],
    used: usize,
    midi_event: Lv2Urid,
    overflowed: bool,
}

impl<'a> SequenceWriter<'a> {
    /// Start an empty sequence at the beginning of `bytes`.
    pub fn new(bytes: &'a mut [u8], sequence: Lv2Urid, midi_event: Lv2Urid) -> Self {
        if bytes.len() < SEQUENCE_HEADER_SIZE {
            // Not even room for the header: leave a blank atom if possible
            if bytes.len() >= ATOM_HEADER_SIZE {
                write_u32(bytes, 0, 0);
                write_u32(bytes, 4, 0);
            }
            return Self {
                bytes,
                used: 0,
                midi_event,
                overflowed: false,
            };
        }

        write_u32(bytes, 0, (SEQUENCE_HEADER_SIZE - ATOM_HEADER_SIZE) as u32);
        write_u32(bytes, 4, sequence);
        write_u32(bytes, 8, 0); // unit: audio frames
        write_u32(bytes, 12, 0);

        Self {
            bytes,
            used: SEQUENCE_HEADER_SIZE,
            midi_event,
            overflowed: false,
        }
    }

    /// Capacity of the underlying buffer.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl EventSink for SequenceWriter<'_> {
    fn push(&mut self, frames: i64, bytes: &[u8]) -> bool {
        if self.overflowed {
            return false;
        }
        // No header was written
        if self.used == 0 {
            self.overflowed = true;
            return false;
        }

        let Ok(size) = u32::try_from(bytes.len()) else {
            self.overflowed = true;
            return false;
        };
        let needed = EVENT_HEADER_SIZE + pad_size(bytes.len());
        if self.used + needed > self.bytes.len() {
            self.overflowed = true;
            return false;
        }

        let at = self.used;
        write_i64(self.bytes, at, frames);
        write_u32(self.bytes, at + 8, size);
        write_u32(self.bytes, at + 12, self.midi_event);

        let start = at + EVENT_HEADER_SIZE;
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        self.bytes[start + bytes.len()..at + needed].fill(0);

        self.used += needed;
        write_u32(self.bytes, 0, (self.used - ATOM_HEADER_SIZE) as u32);
        true
    }

    #[inline]
    fn has_overflowed(&self) -> bool {
        self.overflowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_core::EventBody;

    const SEQUENCE: Lv2Urid = 7;
    const MIDI: Lv2Urid = 9;
    const OTHER: Lv2Urid = 11;

    /// Build an input sequence by hand, independently of the writer.
    fn build(events: &[(i64, Lv2Urid, &[u8])]) -> Vec<u8> {
        let mut out = vec![0u8; SEQUENCE_HEADER_SIZE];
        for (frames, type_urid, body) in events {
            out.extend_from_slice(&frames.to_ne_bytes());
            out.extend_from_slice(&(body.len() as u32).to_ne_bytes());
            out.extend_from_slice(&type_urid.to_ne_bytes());
            out.extend_from_slice(body);
            out.resize(out.len() + pad_size(body.len()) - body.len(), 0);
        }
        let size = (out.len() - ATOM_HEADER_SIZE) as u32;
        out[0..4].copy_from_slice(&size.to_ne_bytes());
        out[4..8].copy_from_slice(&SEQUENCE.to_ne_bytes());
        out
    }

    #[test]
    fn test_reader_yields_events_in_order() {
        let bytes = build(&[
            (0, MIDI, &[0x90, 60, 100]),
            (5, OTHER, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
            (9, MIDI, &[0xF0, 1, 2, 3, 4, 5, 6, 7, 0xF7]),
        ]);
        let events: Vec<_> = SequenceReader::new(&bytes, MIDI).collect();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0], MidiEvent::midi(0, &[0x90, 60, 100]));
        assert_eq!(events[1].body, EventBody::Unknown { type_id: OTHER });
        assert_eq!(events[1].frames, 5);
        assert_eq!(events[2].as_midi().map(<[u8]>::len), Some(9));
    }

    #[test]
    fn test_reader_stops_at_truncated_event() {
        let mut bytes = build(&[(0, MIDI, &[0x90, 60, 100]), (3, MIDI, &[0x80, 60, 0])]);
        // Claim a much larger body for the second event
        let second = SEQUENCE_HEADER_SIZE + EVENT_HEADER_SIZE + 8;
        bytes[second + 8..second + 12].copy_from_slice(&1000u32.to_ne_bytes());

        let events: Vec<_> = SequenceReader::new(&bytes, MIDI).collect();
        assert_eq!(events, vec![MidiEvent::midi(0, &[0x90, 60, 100])]);
    }

    #[test]
    fn test_reader_respects_declared_size_and_short_buffers() {
        let mut bytes = build(&[(0, MIDI, &[0x90, 60, 100])]);
        // Declared size says the sequence is empty
        bytes[0..4].copy_from_slice(&8u32.to_ne_bytes());
        assert_eq!(SequenceReader::new(&bytes, MIDI).count(), 0);

        assert_eq!(SequenceReader::new(&[0u8; 4], MIDI).count(), 0);
        assert_eq!(SequenceReader::empty(MIDI).count(), 0);
    }

    #[test]
    fn test_writer_output_reads_back() {
        let mut buffer = vec![0xAAu8; 128];
        let mut writer = SequenceWriter::new(&mut buffer, SEQUENCE, MIDI);
        assert!(writer.push(3, &[0x90, 64, 90]));
        assert!(writer.push(7, &[0xB0, 1, 2]));
        assert!(!writer.has_overflowed());

        assert_eq!(read_u32(&buffer, 0) as usize, 8 + 2 * 24);
        assert_eq!(read_u32(&buffer, 4), SEQUENCE);
        // Padding is zeroed
        assert_eq!(&buffer[SEQUENCE_HEADER_SIZE + 19..SEQUENCE_HEADER_SIZE + 24], &[0; 5]);

        let events: Vec<_> = SequenceReader::new(&buffer, MIDI).collect();
        assert_eq!(
            events,
            vec![
                MidiEvent::midi(3, &[0x90, 64, 90]),
                MidiEvent::midi(7, &[0xB0, 1, 2]),
            ]
        );
    }

    #[test]
    fn test_writer_never_touches_guard_region() {
        const CAPACITY: usize = SEQUENCE_HEADER_SIZE + 3 * 24 + 10;
        const GUARD: usize = 64;
        let mut memory = vec![0u8; CAPACITY + GUARD];
        memory[CAPACITY..].fill(0x5A);

        let (region, _) = memory.split_at_mut(CAPACITY);
        let mut writer = SequenceWriter::new(region, SEQUENCE, MIDI);
        let mut accepted = 0;
        for i in 0..10 {
            if writer.push(i, &[0x90, 60, 100]) {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 3);
        assert!(writer.has_overflowed());
        // Small events still fail once the writer has overflowed
        assert!(!writer.push(20, &[0xF8]));

        assert!(memory[CAPACITY..].iter().all(|&b| b == 0x5A));
        assert_eq!(SequenceReader::new(&memory, MIDI).count(), 3);
    }

    #[test]
    fn test_writer_without_room_for_header() {
        let mut buffer = [0xFFu8; 12];
        let mut writer = SequenceWriter::new(&mut buffer, SEQUENCE, MIDI);
        // Nothing was dropped yet
        assert!(!writer.has_overflowed());
        assert!(!writer.push(0, &[0x90, 60, 100]));
        assert!(writer.has_overflowed());
        assert_eq!(read_u32(&buffer, 0), 0);
        assert_eq!(&buffer[8..], &[0xFF; 4]);
    }
}
