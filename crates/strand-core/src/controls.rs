//! Control port metadata.
//!
//! Control ports are plain `f32` values the host writes before each block.
//! A plugin describes them once, statically, through [`Plugin::CONTROLS`];
//! the format layer binds them to port indices in declaration order and the
//! bundle's Turtle description mirrors the same table.
//!
//! [`Plugin::CONTROLS`]: crate::Plugin::CONTROLS

/// Maximum number of control ports a plugin may declare.
pub const MAX_CONTROLS: usize = 16;

/// Static description of one control input port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlInfo {
    /// Port symbol (a valid C identifier, unique within the plugin).
    pub symbol: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Value used when the host has not connected the port.
    pub default: f32,
    /// Suggested lower bound (not enforced).
    pub min: f32,
    /// Suggested upper bound (not enforced).
    pub max: f32,
}

impl ControlInfo {
    /// Create a control description with a `0.0..=1.0` range.
    pub const fn new(symbol: &'static str, name: &'static str) -> Self {
        Self {
            symbol,
            name,
            default: 0.0,
            min: 0.0,
            max: 1.0,
        }
    }

    /// Set the default value.
    pub const fn with_default(mut self, default: f32) -> Self {
        self.default = default;
        self
    }

    /// Set the suggested range.
    pub const fn with_range(mut self, min: f32, max: f32) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

/// Replace NaN and infinities coming from the host with `0.0`.
#[inline]
pub fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
