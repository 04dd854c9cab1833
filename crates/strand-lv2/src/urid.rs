//! URID map capability.
//!
//! LV2 hosts identify types by small integers instead of URI strings. The
//! mapping service is offered as the `urid:map` feature; it is looked up
//! once at instantiation and every identifier the plugin needs is resolved
//! right away, so nothing string-based happens on the audio thread.

use std::ffi::{c_void, CStr};

use strand_core::{PluginError, PluginResult};

use crate::sys::{Lv2Feature, Lv2Urid, Lv2UridMap, LV2_ATOM_SEQUENCE, LV2_MIDI_EVENT, LV2_URID_MAP};

/// The host's `urid:map` feature.
pub struct UridMap {
    handle: *mut c_void,
    map: unsafe extern "C" fn(handle: *mut c_void, uri: *const std::ffi::c_char) -> Lv2Urid,
}

impl UridMap {
    /// Find the `urid:map` feature in a host feature array.
    ///
    /// Returns `None` if the array is null, the feature is absent, or the
    /// feature carries no usable map function.
    ///
    /// # Safety
    ///
    /// `features` must be null or point to a null-terminated array of valid
    /// feature pointers, as passed to `instantiate`.
    pub unsafe fn from_features(features: *const *const Lv2Feature) -> Option<Self> {
        if features.is_null() {
            return None;
        }

        let mut cursor = features;
        // SAFETY: the caller guarantees a null-terminated array; we stop at
        // the first null entry.
        unsafe {
            while !(*cursor).is_null() {
                let feature = &**cursor;
                cursor = cursor.add(1);

                if feature.uri.is_null() || CStr::from_ptr(feature.uri) != LV2_URID_MAP {
                    continue;
                }

                let data = feature.data as *const Lv2UridMap;
                if data.is_null() {
                    return None;
                }
                let map = (*data).map?;
                return Some(Self {
                    handle: (*data).handle,
                    map,
                });
            }
        }

        None
    }

    /// Map a URI to its integer identifier.
    ///
    /// Returns `None` if the host answers with the invalid URID 0.
    pub fn map(&self, uri: &CStr) -> Option<Lv2Urid> {
        // SAFETY: handle and function come from the host's feature and stay
        // valid for the lifetime of the instance being created.
        let urid = unsafe { (self.map)(self.handle, uri.as_ptr()) };
        (urid != 0).then_some(urid)
    }
}

/// Type identifiers resolved at instantiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uris {
    /// `atom:Sequence`
    pub atom_sequence: Lv2Urid,
    /// `midi:MidiEvent`
    pub midi_event: Lv2Urid,
}

impl Uris {
    /// Resolve every identifier the wrapper needs.
    pub fn map(map: &UridMap) -> PluginResult<Self> {
        Ok(Self {
            atom_sequence: map_required(map, LV2_ATOM_SEQUENCE)?,
            midi_event: map_required(map, LV2_MIDI_EVENT)?,
        })
    }
}

fn map_required(map: &UridMap, uri: &'static CStr) -> PluginResult<Lv2Urid> {
    map.map(uri)
        .ok_or(PluginError::UnmappedUri(uri.to_str().unwrap_or("<non-utf8 uri>")))
}
