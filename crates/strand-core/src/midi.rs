//! MIDI event types for real-time plugins.
//!
//! Events borrow their payload straight from the host's buffer, so reading a
//! block never copies or allocates. Payloads are kept as raw MIDI 1.0 bytes
//! and only interpreted as far as a plugin asks for (see [`NoteOn::parse`]).

// =============================================================================
// Basic MIDI Types
// =============================================================================

/// MIDI channel (0-15).
pub type MidiChannel = u8;

/// MIDI note number (0-127, where 60 = middle C).
pub type MidiNote = u8;

/// MIDI 1.0 status bytes (high nibble, channel stripped).
pub mod status {
    /// Note off.
    pub const NOTE_OFF: u8 = 0x80;
    /// Note on.
    pub const NOTE_ON: u8 = 0x90;
    /// Polyphonic key pressure.
    pub const POLY_PRESSURE: u8 = 0xA0;
    /// Control change.
    pub const CONTROL_CHANGE: u8 = 0xB0;
    /// Program change.
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    /// Channel pressure.
    pub const CHANNEL_PRESSURE: u8 = 0xD0;
    /// Pitch bend.
    pub const PITCH_BEND: u8 = 0xE0;
    /// System messages (SysEx, clock, ...).
    pub const SYSTEM: u8 = 0xF0;

    /// Mask selecting the message type nibble of a status byte.
    pub const TYPE_MASK: u8 = 0xF0;
    /// Mask selecting the channel nibble of a status byte.
    pub const CHANNEL_MASK: u8 = 0x0F;
}

/// Lowest velocity that still means "key pressed".
///
/// A Note-On with velocity 0 is the running-status spelling of a note off.
pub const MIN_NOTE_ON_VELOCITY: u8 = 1;

/// Highest MIDI 1.0 data byte value.
pub const MAX_DATA_VALUE: u8 = 127;

/// A 3-byte MIDI Note-On message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteOn {
    /// MIDI channel (0-15).
    pub channel: MidiChannel,
    /// Note number (0-127).
    pub pitch: MidiNote,
    /// Raw velocity byte (0-127).
    pub velocity: u8,
}

impl NoteOn {
    /// Length of a Note-On message in bytes.
    pub const LEN: usize = 3;

    /// Interpret a raw payload as a Note-On.
    ///
    /// Returns `None` when the status nibble is not `0x9` or when fewer than
    /// three bytes are present. Trailing bytes beyond the third are ignored.
    #[inline]
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [status_byte, pitch, velocity, ..]
                if status_byte & status::TYPE_MASK == status::NOTE_ON =>
            {
                Some(Self {
                    channel: status_byte & status::CHANNEL_MASK,
                    pitch: *pitch,
                    velocity: *velocity,
                })
            }
            _ => None,
        }
    }

    /// Encode back into MIDI 1.0 wire bytes.
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [
            status::NOTE_ON | (self.channel & status::CHANNEL_MASK),
            self.pitch,
            self.velocity,
        ]
    }

    /// Create a copy with a different velocity.
    #[inline]
    pub const fn with_velocity(self, velocity: u8) -> Self {
        Self { velocity, ..self }
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// The body of an event read from the host's event stream.
///
/// Hosts tag every record with a type identifier. Only MIDI payloads are
/// modelled; everything else is carried as `Unknown` so plugins can decide
/// to drop it without ever looking at its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventBody<'a> {
    /// Raw MIDI 1.0 message bytes.
    Midi(&'a [u8]),
    /// A record of some other type, identified by the host's type id.
    Unknown {
        /// Host-assigned type identifier.
        type_id: u32,
    },
}

/// A sample-accurate event.
///
/// `frames` is relative to the start of the current block (0 = first sample).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent<'a> {
    /// Offset in sample frames from the start of the block.
    pub frames: i64,
    /// Event payload.
    pub body: EventBody<'a>,
}

impl<'a> MidiEvent<'a> {
    /// Create a MIDI event.
    #[inline]
    pub const fn midi(frames: i64, bytes: &'a [u8]) -> Self {
        Self {
            frames,
            body: EventBody::Midi(bytes),
        }
    }

    /// Create an event of a type the plugin does not understand.
    #[inline]
    pub const fn unknown(frames: i64, type_id: u32) -> Self {
        Self {
            frames,
            body: EventBody::Unknown { type_id },
        }
    }

    /// Returns the MIDI payload, if this is a MIDI event.
    #[inline]
    pub fn as_midi(&self) -> Option<&'a [u8]> {
        match self.body {
            EventBody::Midi(bytes) => Some(bytes),
            EventBody::Unknown { .. } => None,
        }
    }
}
