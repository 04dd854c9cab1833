//! # strand-lv2
//!
//! LV2 implementation layer for the Strand framework.
//!
//! This crate wraps a `strand_core::Plugin` into an LV2 plugin binary. It
//! handles all the LV2-specific details:
//!
//! - The `lv2_descriptor` entry point ([`export_lv2!`])
//! - Instance lifecycle and port connection ([`Lv2Instance`])
//! - The `urid:map` host feature ([`UridMap`])
//! - Reading and writing atom sequences ([`SequenceReader`], [`SequenceWriter`])
//!
//! ## Architecture
//!
//! ```text
//! User Plugin (implements strand_core::Plugin)
//!        ↓
//! Lv2Instance<P> (generic LV2 wrapper)
//!        ↓
//! LV2_Descriptor (instantiate, connect_port, run, cleanup)
//! ```
//!
//! ## Usage
//!
//! 1. Implement `strand_core::Plugin` for your plugin type
//! 2. Use the `export_lv2!` macro to generate the entry point
//! 3. Describe the ports in the bundle's Turtle file, in the same order
//!
//! ```rust,ignore
//! use strand_core::PluginConfig;
//! use strand_lv2::{export_lv2, Lv2Config};
//!
//! pub static CONFIG: PluginConfig = PluginConfig::new("My Plugin")
//!     .with_vendor("My Company");
//!
//! pub const LV2_CONFIG: Lv2Config = Lv2Config::new(c"http://example.org/my-plugin");
//!
//! export_lv2!(CONFIG, LV2_CONFIG, MyPlugin);
//! ```

pub mod atom;
pub mod config;
pub mod descriptor;
pub mod export;
pub mod instance;
pub mod logging;
pub mod ports;
pub mod sys;
pub mod urid;

// Re-exports
pub use atom::{SequenceReader, SequenceWriter};
pub use config::Lv2Config;
pub use descriptor::Descriptor;
pub use instance::Lv2Instance;
pub use ports::{Port, PortBindings, FIRST_CONTROL_PORT};
pub use urid::{UridMap, Uris};

// Re-export shared PluginConfig from strand-core
pub use strand_core::PluginConfig;
