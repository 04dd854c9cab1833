//! Bounded MIDI output.
//!
//! Plugins never write into host memory directly. They push events into an
//! [`EventSink`], which owns the capacity check. Once a sink runs out of room
//! it stays full for the rest of the block: later events are dropped rather
//! than written out of bounds.

/// A bounded destination for timestamped MIDI messages.
pub trait EventSink {
    /// Append a message at `frames`.
    ///
    /// Returns `false` if the message did not fit. After the first failure
    /// every further push also fails until the sink is reset.
    fn push(&mut self, frames: i64, bytes: &[u8]) -> bool;

    /// Returns true if any push failed since the sink was (re)started.
    fn has_overflowed(&self) -> bool;
}

/// Default event capacity of a [`MidiBuffer`].
pub const MAX_MIDI_EVENTS: usize = 1024;

/// Default payload capacity of a [`MidiBuffer`], in bytes.
pub const MAX_MIDI_BYTES: usize = 16 * 1024;

#[derive(Debug, Clone, Copy)]
struct Slot {
    frames: i64,
    start: usize,
    len: usize,
}

/// A pre-allocated buffer for collecting MIDI output.
///
/// All storage is reserved up front, so [`push`](EventSink::push) never
/// allocates. Messages of any length are stored back to back in one byte
/// arena.
#[derive(Debug)]
pub struct MidiBuffer {
    slots: Vec<Slot>,
    data: Vec<u8>,
    max_events: usize,
    max_bytes: usize,
    /// Set to true when a push fails due to buffer exhaustion
    overflowed: bool,
}

impl MidiBuffer {
    /// Create a new empty buffer with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(MAX_MIDI_EVENTS, MAX_MIDI_BYTES)
    }

    /// Create a new buffer holding at most `events` messages and `bytes`
    /// payload bytes.
    pub fn with_capacity(events: usize, bytes: usize) -> Self {
        Self {
            slots: Vec::with_capacity(events),
            data: Vec::with_capacity(bytes),
            max_events: events,
            max_bytes: bytes,
            overflowed: false,
        }
    }

    /// Clear all events from the buffer without releasing storage.
    #[inline]
    pub fn clear(&mut self) {
        self.slots.clear();
        self.data.clear();
        self.overflowed = false;
    }

    /// Returns the number of events in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over `(frames, bytes)` pairs in push order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &[u8])> + '_ {
        self.slots
            .iter()
            .map(move |slot| (slot.frames, &self.data[slot.start..slot.start + slot.len]))
    }
}

impl EventSink for MidiBuffer {
    #[inline]
    fn push(&mut self, frames: i64, bytes: &[u8]) -> bool {
        if self.overflowed
            || self.slots.len() >= self.max_events
            || self.data.len() + bytes.len() > self.max_bytes
        {
            self.overflowed = true;
            return false;
        }

        let start = self.data.len();
        self.data.extend_from_slice(bytes);
        self.slots.push(Slot {
            frames,
            start,
            len: bytes.len(),
        });
        true
    }

    #[inline]
    fn has_overflowed(&self) -> bool {
        self.overflowed
    }
}

impl Default for MidiBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_iterate() {
        let mut buffer = MidiBuffer::with_capacity(4, 64);
        assert!(buffer.push(0, &[0x90, 60, 100]));
        assert!(buffer.push(12, &[0xF0, 0x7E, 0x7F, 0x06, 0x01, 0xF7]));

        let events: Vec<_> = buffer.iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], (0, &[0x90, 60, 100][..]));
        assert_eq!(events[1].0, 12);
        assert_eq!(events[1].1.len(), 6);
    }

    #[test]
    fn test_event_limit_is_sticky() {
        let mut buffer = MidiBuffer::with_capacity(1, 64);
        assert!(buffer.push(0, &[0x90, 60, 100]));
        assert!(!buffer.push(1, &[0x80, 60, 0]));
        assert!(buffer.has_overflowed());
        assert_eq!(buffer.len(), 1);

        buffer.clear();
        assert!(!buffer.has_overflowed());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_byte_limit_stops_later_small_events() {
        let mut buffer = MidiBuffer::with_capacity(8, 4);
        assert!(buffer.push(0, &[0x90, 60, 100]));
        // Does not fit the arena
        assert!(!buffer.push(1, &[0x90, 61, 100]));
        // Would fit, but the buffer is already exhausted for this block
        assert!(!buffer.push(2, &[0xF8]));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_push_does_not_reallocate() {
        let mut buffer = MidiBuffer::with_capacity(16, 48);
        let data_ptr = buffer.data.as_ptr();
        let slots_ptr = buffer.slots.as_ptr();
        for i in 0..16 {
            buffer.push(i, &[0x90, 60, 100]);
        }
        assert_eq!(buffer.data.as_ptr(), data_ptr);
        assert_eq!(buffer.slots.as_ptr(), slots_ptr);
    }
}
