//! Core plugin trait definitions.
//!
//! A Strand plugin is a MIDI processor with a fixed set of control inputs.
//! The format wrapper owns everything host-facing (ports, buffers, type
//! identifiers) and hands the plugin one block at a time:
//!
//! ```text
//! host run(n)
//!    ↓
//! format wrapper: read controls, wrap input/output buffers
//!    ↓
//! Plugin::process_midi(input events, controls, context, output sink)
//! ```

use crate::buffer::EventSink;
use crate::controls::ControlInfo;
use crate::midi::MidiEvent;
use crate::process_context::ProcessContext;

/// Audio configuration known when the host creates an instance.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioSetup {
    /// Sample rate in Hz (e.g., 44100.0, 48000.0, 96000.0)
    pub sample_rate: f64,
}

/// A real-time MIDI processor.
///
/// # Real-Time Safety
///
/// [`process_midi`](Plugin::process_midi) runs on the host's audio thread.
/// It must not allocate, lock, block or panic. All failure inside a block
/// degrades silently; the output sink already refuses writes past its
/// capacity.
///
/// # Example
///
/// ```ignore
/// struct Through;
///
/// impl Plugin for Through {
///     const CONTROLS: &'static [ControlInfo] = &[];
///
///     fn prepare(_setup: AudioSetup) -> Self {
///         Through
///     }
///
///     fn process_midi<'a, I, S>(
///         &mut self,
///         input: I,
///         _controls: &[f32],
///         _context: &ProcessContext,
///         output: &mut S,
///     ) where
///         I: Iterator<Item = MidiEvent<'a>>,
///         S: EventSink + ?Sized,
///     {
///         for event in input {
///             if let Some(bytes) = event.as_midi() {
///                 output.push(event.frames, bytes);
///             }
///         }
///     }
/// }
/// ```
pub trait Plugin: Sized + Send + 'static {
    /// Control input ports, in port order.
    ///
    /// The values handed to [`process_midi`](Plugin::process_midi) follow
    /// this order exactly. At most [`MAX_CONTROLS`](crate::MAX_CONTROLS)
    /// entries are honoured.
    const CONTROLS: &'static [ControlInfo];

    /// Create a processor for the given audio configuration.
    ///
    /// Called off the audio thread; allocation is fine here.
    fn prepare(setup: AudioSetup) -> Self;

    /// Process one block of MIDI.
    ///
    /// `input` yields events in non-decreasing time order. `controls` holds
    /// the current value of every port in [`CONTROLS`](Plugin::CONTROLS),
    /// already sanitized to finite numbers.
    fn process_midi<'a, I, S>(
        &mut self,
        input: I,
        controls: &[f32],
        context: &ProcessContext,
        output: &mut S,
    ) where
        I: Iterator<Item = MidiEvent<'a>>,
        S: EventSink + ?Sized;
}
