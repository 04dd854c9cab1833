//! Static plugin descriptor.

use std::ptr;

use strand_core::{Plugin, PluginConfig};

use crate::config::Lv2Config;
use crate::instance::{cleanup, connect_port, instantiate, run};
use crate::sys::Lv2Descriptor;

/// The `LV2_Descriptor` handed to hosts, followed by the plugin's metadata.
///
/// The raw descriptor comes first, so a pointer to it is also a pointer to
/// the whole `Descriptor`. `instantiate` relies on this to find the config.
#[repr(C)]
pub struct Descriptor {
    raw: Lv2Descriptor,
    config: &'static PluginConfig,
}

// SAFETY: the descriptor is immutable; its raw pointers refer to 'static
// data (the URI string) and functions.
unsafe impl Sync for Descriptor {}

impl Descriptor {
    /// Build the descriptor for plugin type `P`.
    ///
    /// `activate`, `deactivate` and `extension_data` are left null: the
    /// wrapper keeps no state that depends on them.
    pub const fn new<P: Plugin>(config: &'static PluginConfig, lv2_config: Lv2Config) -> Self {
        Self {
            raw: Lv2Descriptor {
                uri: lv2_config.uri.as_ptr(),
                instantiate: Some(instantiate::<P>),
                connect_port: Some(connect_port::<P>),
                activate: None,
                run: Some(run::<P>),
                deactivate: None,
                cleanup: Some(cleanup::<P>),
                extension_data: None,
            },
            config,
        }
    }

    /// Pointer to hand to the host.
    pub fn as_raw(&self) -> *const Lv2Descriptor {
        ptr::addr_of!(self.raw)
    }

    /// Shared plugin metadata.
    pub fn config(&self) -> &'static PluginConfig {
        self.config
    }
}
