//! LV2 export macro and entry point.

/// Generate the `lv2_descriptor` entry point for a plugin.
///
/// The host calls `lv2_descriptor(0)`, `lv2_descriptor(1)`, ... until it gets
/// null. A Strand library exports exactly one plugin, at index 0. The first
/// call also installs the logger (see [`logging::init`](crate::logging::init)).
///
/// # Example
///
/// ```rust,ignore
/// use strand_core::PluginConfig;
/// use strand_lv2::{export_lv2, Lv2Config};
///
/// // Shared plugin configuration
/// pub static CONFIG: PluginConfig = PluginConfig::new("My Plugin")
///     .with_vendor("My Company");
///
/// // LV2-specific configuration
/// pub const LV2_CONFIG: Lv2Config = Lv2Config::new(c"http://example.org/my-plugin");
///
/// export_lv2!(CONFIG, LV2_CONFIG, MyPlugin);
/// ```
#[macro_export]
macro_rules! export_lv2 {
    ($config:expr, $lv2_config:expr, $plugin:ty) => {
        static __STRAND_LV2_DESCRIPTOR: $crate::Descriptor =
            $crate::Descriptor::new::<$plugin>(&$config, $lv2_config);

        /// LV2 discovery entry point.
        #[no_mangle]
        pub extern "C" fn lv2_descriptor(index: u32) -> *const $crate::sys::Lv2Descriptor {
            $crate::logging::init();

            match index {
                0 => __STRAND_LV2_DESCRIPTOR.as_raw(),
                _ => ::std::ptr::null(),
            }
        }
    };
}
