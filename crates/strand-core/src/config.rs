//! Plugin identity shared by every format layer.
//!
//! Format-specific settings (the LV2 plugin URI, for instance) live in the
//! format crate. Everything here is also written into the bundle's Turtle
//! description, which the plugin crates check against this struct in tests.
//!
//! ```ignore
//! use strand_core::PluginConfig;
//!
//! pub static CONFIG: PluginConfig = PluginConfig::new("Arpeggiator")
//!     .with_vendor("Strand")
//!     .with_version(env!("CARGO_PKG_VERSION"));
//! ```

/// Who the plugin is and who maintains it.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Name shown by hosts (`doap:name`).
    pub name: &'static str,
    /// Maintainer name (`doap:maintainer` / `foaf:name`).
    pub vendor: &'static str,
    /// Maintainer homepage; empty when there is none.
    pub url: &'static str,
    /// Semantic version, `major.minor.micro`.
    pub version: &'static str,
    /// LV2 plugin class without the `lv2:` prefix.
    pub category: &'static str,
}

impl PluginConfig {
    /// A config for `name` with an anonymous maintainer, version `0.1.0` and
    /// the `MIDIPlugin` class.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            vendor: "Unknown Vendor",
            url: "",
            version: "0.1.0",
            category: "MIDIPlugin",
        }
    }

    pub const fn with_vendor(mut self, vendor: &'static str) -> Self {
        self.vendor = vendor;
        self
    }

    pub const fn with_url(mut self, url: &'static str) -> Self {
        self.url = url;
        self
    }

    pub const fn with_version(mut self, version: &'static str) -> Self {
        self.version = version;
        self
    }

    pub const fn with_category(mut self, category: &'static str) -> Self {
        self.category = category;
        self
    }

    /// The `(lv2:minorVersion, lv2:microVersion)` pair for this version.
    ///
    /// LV2 has no major version: the major number is part of the URI. Returns
    /// `None` if the version is not of the form `major.minor.micro`.
    pub fn lv2_version(&self) -> Option<(u32, u32)> {
        // Pre-release and build suffixes ("1.2.3-rc.1") do not count
        let core = self.version.split(['-', '+']).next()?;
        let mut parts = core.split('.');
        let _major: u32 = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let micro = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some((minor, micro))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lv2_version() {
        let config = PluginConfig::new("Test");
        assert_eq!(config.lv2_version(), Some((1, 0)));
        let cases = [("2.4.10", (4, 10)), ("0.3.1-rc.1", (3, 1)), ("1.0.2+abc", (0, 2))];
        for (version, expected) in cases {
            let config = PluginConfig::new("Test").with_version(version);
            assert_eq!(config.lv2_version(), Some(expected), "{}", version);
        }
    }

    #[test]
    fn test_lv2_version_rejects_malformed() {
        for version in ["", "1", "1.2", "1.x.3", "1.2.3.4", "1.2.beta"] {
            let config = PluginConfig::new("Test").with_version(version);
            assert_eq!(config.lv2_version(), None, "{}", version);
        }
    }
}
