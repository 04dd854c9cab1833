//! Port numbering and connections.
//!
//! Port layout is fixed for every Strand plugin:
//!
//! | Index | Port |
//! |-------|------|
//! | 0 | MIDI input (`atom:Sequence`) |
//! | 1 | MIDI output (`atom:Sequence`) |
//! | 2.. | control inputs, in [`Plugin::CONTROLS`] order |
//!
//! [`Plugin::CONTROLS`]: strand_core::Plugin::CONTROLS

use std::ffi::c_void;
use std::ptr;

use strand_core::{sanitize, ControlInfo, MAX_CONTROLS};

use crate::sys::Lv2AtomSequence;

/// Index of the first control port.
pub const FIRST_CONTROL_PORT: u32 = 2;

/// A port of a Strand plugin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    MidiIn,
    MidiOut,
    /// Control input, by position in the plugin's control table.
    Control(usize),
}

impl Port {
    /// Resolve a host port index for a plugin with `num_controls` controls.
    pub fn from_index(index: u32, num_controls: usize) -> Option<Self> {
        match index {
            0 => Some(Self::MidiIn),
            1 => Some(Self::MidiOut),
            n => {
                let control = (n - FIRST_CONTROL_PORT) as usize;
                (control < num_controls.min(MAX_CONTROLS)).then_some(Self::Control(control))
            }
        }
    }
}

/// Host buffers currently connected to each port.
///
/// Pointers are stored as given; the host guarantees they stay valid until
/// the port is reconnected or the instance is cleaned up. A null pointer
/// means the port is disconnected.
pub struct PortBindings {
    midi_in: *const Lv2AtomSequence,
    midi_out: *mut Lv2AtomSequence,
    controls: [*const f32; MAX_CONTROLS],
}

impl Default for PortBindings {
    fn default() -> Self {
        Self {
            midi_in: ptr::null(),
            midi_out: ptr::null_mut(),
            controls: [ptr::null(); MAX_CONTROLS],
        }
    }
}

impl PortBindings {
    /// Record a connection. Passing null disconnects the port.
    pub fn connect(&mut self, port: Port, data: *mut c_void) {
        match port {
            Port::MidiIn => self.midi_in = data as *const Lv2AtomSequence,
            Port::MidiOut => self.midi_out = data as *mut Lv2AtomSequence,
            Port::Control(index) => self.controls[index] = data as *const f32,
        }
    }

    /// The connected input sequence, or null.
    #[inline]
    pub fn midi_in(&self) -> *const Lv2AtomSequence {
        self.midi_in
    }

    /// The connected output sequence, or null.
    #[inline]
    pub fn midi_out(&self) -> *mut Lv2AtomSequence {
        self.midi_out
    }

    /// Read every control into `values`, in table order.
    ///
    /// Unconnected controls take their declared default. Non-finite values
    /// become `0.0`.
    ///
    /// # Safety
    ///
    /// Every connected control pointer must be valid for reads.
    pub unsafe fn read_controls(&self, infos: &[ControlInfo], values: &mut [f32]) {
        for ((value, info), &location) in values.iter_mut().zip(infos).zip(&self.controls) {
            let raw = if location.is_null() {
                info.default
            } else {
                // SAFETY: guaranteed by the caller.
                unsafe { location.read() }
            };
            *value = sanitize(raw);
        }
    }
}
