//! # strand-core
//!
//! Core abstractions for the Strand LV2 MIDI plugin framework.
//!
//! This crate provides format-agnostic types that define the interface for
//! real-time MIDI plugins. It has no external dependencies, making it
//! suitable for use in any context.
//!
//! ## Main Traits
//!
//! - [`Plugin`] - A MIDI processor with static control port metadata
//! - [`EventSink`] - Bounded destination for MIDI output
//!
//! ## Types
//!
//! - [`MidiEvent`] / [`EventBody`] - Borrowed, sample-accurate input events
//! - [`NoteOn`] - Parsed Note-On message
//! - [`MidiBuffer`] - Pre-allocated [`EventSink`] implementation
//! - [`ControlInfo`] - Control port metadata
//! - [`ProcessContext`] - Sample rate and block length
//! - [`PluginConfig`] - Shared plugin metadata
//! - [`PluginError`] - Error types

pub mod buffer;
pub mod config;
pub mod controls;
pub mod error;
pub mod midi;
pub mod plugin;
pub mod process_context;

// Re-exports for convenience
pub use buffer::{EventSink, MidiBuffer, MAX_MIDI_BYTES, MAX_MIDI_EVENTS};
pub use config::PluginConfig;
pub use controls::{sanitize, ControlInfo, MAX_CONTROLS};
pub use error::{PluginError, PluginResult};
pub use midi::{
    status, EventBody, MidiChannel, MidiEvent, MidiNote, NoteOn, MAX_DATA_VALUE,
    MIN_NOTE_ON_VELOCITY,
};
pub use plugin::{AudioSetup, Plugin};
pub use process_context::ProcessContext;
