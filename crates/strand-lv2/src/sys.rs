//! LV2 C ABI structures.
//!
//! These structures match the LV2 core, URID and atom headers.
//! Reference: https://lv2plug.in/ns/

use std::ffi::{c_char, c_void, CStr};

// =============================================================================
// URIs
// =============================================================================

/// `urid:map` feature.
pub const LV2_URID_MAP: &CStr = c"http://lv2plug.in/ns/ext/urid#map";

/// `atom:Sequence` type.
pub const LV2_ATOM_SEQUENCE: &CStr = c"http://lv2plug.in/ns/ext/atom#Sequence";

/// `midi:MidiEvent` type.
pub const LV2_MIDI_EVENT: &CStr = c"http://lv2plug.in/ns/ext/midi#MidiEvent";

// =============================================================================
// Core
// =============================================================================

/// Opaque plugin instance handle.
pub type Lv2Handle = *mut c_void;

/// Host feature entry. Feature arrays are null-terminated.
#[repr(C)]
pub struct Lv2Feature {
    pub uri: *const c_char,
    pub data: *mut c_void,
}

/// Plugin descriptor returned from `lv2_descriptor`.
#[repr(C)]
pub struct Lv2Descriptor {
    pub uri: *const c_char,
    pub instantiate: Option<
        unsafe extern "C" fn(
            descriptor: *const Lv2Descriptor,
            sample_rate: f64,
            bundle_path: *const c_char,
            features: *const *const Lv2Feature,
        ) -> Lv2Handle,
    >,
    pub connect_port:
        Option<unsafe extern "C" fn(instance: Lv2Handle, port: u32, data_location: *mut c_void)>,
    pub activate: Option<unsafe extern "C" fn(instance: Lv2Handle)>,
    pub run: Option<unsafe extern "C" fn(instance: Lv2Handle, sample_count: u32)>,
    pub deactivate: Option<unsafe extern "C" fn(instance: Lv2Handle)>,
    pub cleanup: Option<unsafe extern "C" fn(instance: Lv2Handle)>,
    pub extension_data: Option<unsafe extern "C" fn(uri: *const c_char) -> *const c_void>,
}

// =============================================================================
// URID
// =============================================================================

/// Integer identifier for a URI. 0 is never a valid URID.
pub type Lv2Urid = u32;

/// Data of the `urid:map` feature.
#[repr(C)]
pub struct Lv2UridMap {
    pub handle: *mut c_void,
    pub map: Option<unsafe extern "C" fn(handle: *mut c_void, uri: *const c_char) -> Lv2Urid>,
}

// =============================================================================
// Atom
// =============================================================================

/// Header shared by all atoms.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Lv2Atom {
    /// Size of the body in bytes (header excluded).
    pub size: u32,
    /// URID of the atom type.
    pub type_urid: Lv2Urid,
}

/// Body header of an `atom:Sequence`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Lv2AtomSequenceBody {
    /// URID of the time stamp unit, 0 for audio frames.
    pub unit: u32,
    pub pad: u32,
}

/// An `atom:Sequence` as connected to an atom port.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Lv2AtomSequence {
    pub atom: Lv2Atom,
    pub body: Lv2AtomSequenceBody,
}

/// Size of [`Lv2Atom`].
pub const ATOM_HEADER_SIZE: usize = 8;

/// Size of [`Lv2AtomSequence`] (atom header plus sequence body header).
pub const SEQUENCE_HEADER_SIZE: usize = 16;

/// Size of an event header: 8 byte time stamp plus an atom header.
pub const EVENT_HEADER_SIZE: usize = 16;

/// Round a body size up to the 8-byte atom alignment.
#[inline]
pub const fn pad_size(size: usize) -> usize {
    (size + 7) & !7
}
