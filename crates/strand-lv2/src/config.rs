//! LV2-specific plugin configuration.

use std::ffi::CStr;

/// LV2-specific configuration.
///
/// The URI is the plugin's global identity and must match the `lv2:Plugin`
/// subject in the bundle's Turtle files.
///
/// # Example
///
/// ```ignore
/// use strand_lv2::Lv2Config;
///
/// pub const LV2_CONFIG: Lv2Config = Lv2Config::new(c"http://example.org/my-plugin");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Lv2Config {
    /// Plugin URI.
    pub uri: &'static CStr,
}

impl Lv2Config {
    /// Create an LV2 configuration for the given plugin URI.
    pub const fn new(uri: &'static CStr) -> Self {
        Self { uri }
    }
}
