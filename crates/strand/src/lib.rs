//! # Strand
//!
//! LV2 MIDI plugin framework for Rust.
//!
//! Strand is a small framework for building real-time MIDI effects as LV2
//! plugins. It provides safe Rust abstractions over the LV2 C interface.
//!
//! ## Architecture
//!
//! ```text
//! Your Plugin (implements Plugin trait)
//!        ↓
//! Lv2Instance<P> (generic LV2 wrapper)
//!        ↓
//! LV2_Descriptor
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strand::prelude::*;
//!
//! struct Through;
//!
//! impl Plugin for Through {
//!     const CONTROLS: &'static [ControlInfo] = &[];
//!
//!     fn prepare(_setup: AudioSetup) -> Self {
//!         Through
//!     }
//!
//!     fn process_midi<'a, I, S>(
//!         &mut self,
//!         input: I,
//!         _controls: &[f32],
//!         _context: &ProcessContext,
//!         output: &mut S,
//!     ) where
//!         I: Iterator<Item = MidiEvent<'a>>,
//!         S: EventSink + ?Sized,
//!     {
//!         for event in input {
//!             if let Some(bytes) = event.as_midi() {
//!                 output.push(event.frames, bytes);
//!             }
//!         }
//!     }
//! }
//!
//! // Export
//! pub static CONFIG: PluginConfig = PluginConfig::new("Through");
//! pub const LV2_CONFIG: Lv2Config = Lv2Config::new(c"http://example.org/through");
//! export_lv2!(CONFIG, LV2_CONFIG, Through);
//! ```

// Re-export sub-crates
pub use strand_core as core;
pub use strand_lv2 as lv2;

/// Prelude module for convenient imports.
///
/// Import everything you need to build a plugin:
/// ```rust,ignore
/// use strand::prelude::*;
/// ```
pub mod prelude {
    // Core traits and types
    pub use strand_core::{
        // Traits
        EventSink, Plugin,
        // Setup and per-block context
        AudioSetup, ProcessContext,
        // Controls
        ControlInfo,
        // Error types
        PluginError, PluginResult,
        // MIDI types
        EventBody, MidiBuffer, MidiChannel, MidiEvent, MidiNote, NoteOn,
        MAX_DATA_VALUE, MIN_NOTE_ON_VELOCITY,
    };

    // LV2 implementation
    pub use strand_lv2::{export_lv2, Lv2Config, PluginConfig};
}
