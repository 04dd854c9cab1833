//! The randomizer's controls: three jitter settings and a bypass switch.

use strand::core::sanitize;
use strand::prelude::ControlInfo;

/// Velocity jitter, in velocity steps before damping.
pub const VELOCITY: ControlInfo = ControlInfo::new("velocity", "Velocity")
    .with_default(20.0)
    .with_range(0.0, 127.0);

/// Timing jitter. Each unit allows up to 50 ms of shift before the shift is
/// clamped to the block.
pub const TIMING: ControlInfo = ControlInfo::new("timing", "Timing")
    .with_default(15.0)
    .with_range(0.0, 100.0);

/// Chance, in percent, that a Note-On is randomized at all.
pub const AMOUNT: ControlInfo = ControlInfo::new("amount", "Amount")
    .with_default(50.0)
    .with_range(0.0, 100.0);

/// On/off switch, designated `lv2:enabled` so hosts can show it as the
/// plugin's bypass. Values above 0.5 mean on.
pub const ENABLED: ControlInfo = ControlInfo::new("enabled", "Enabled")
    .with_default(1.0)
    .with_range(0.0, 1.0);

/// Control table in port order.
pub const CONTROLS: [ControlInfo; 4] = [VELOCITY, TIMING, AMOUNT, ENABLED];

/// Control values for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    pub velocity_jitter: f32,
    pub timing_jitter: f32,
    /// Percentage, `0` never randomizes and `100` always does.
    pub effect_probability: f32,
    /// When off, MIDI passes through byte for byte.
    pub enabled: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            velocity_jitter: VELOCITY.default,
            timing_jitter: TIMING.default,
            effect_probability: AMOUNT.default,
            enabled: is_on(ENABLED.default),
        }
    }
}

impl Controls {
    /// Build from values in [`CONTROLS`] order.
    ///
    /// Missing entries take their default; non-finite values become `0.0`,
    /// which for the switch means off.
    pub fn from_values(values: &[f32]) -> Self {
        let value = |index: usize| {
            values
                .get(index)
                .map_or(CONTROLS[index].default, |&v| sanitize(v))
        };

        Self {
            velocity_jitter: value(0),
            timing_jitter: value(1),
            effect_probability: value(2),
            enabled: is_on(value(3)),
        }
    }
}

#[inline]
fn is_on(value: f32) -> bool {
    value > 0.5
}
