//! Strand MIDI Randomizer - LV2 MIDI effect that humanizes Note-On events.
//!
//! Every Note-On has an `amount` percent chance of being randomized:
//! - **Velocity**: moved by up to `velocity * 0.63` steps, kept in `1..=127`
//! - **Timing**: moved by up to `timing * 50 ms`, kept inside the block and
//!   never past a neighbouring event
//!
//! All other MIDI passes through untouched; non-MIDI events are dropped.
//! Switching `enabled` off passes every MIDI event through as it came in.
//!
//! # Ports
//!
//! | Index | Symbol | Range | Default |
//! |-------|--------|-------|---------|
//! | 0 | `midi_in` | | |
//! | 1 | `midi_out` | | |
//! | 2 | `velocity` | 0 - 127 | 20 |
//! | 3 | `timing` | 0 - 100 | 15 |
//! | 4 | `amount` | 0 - 100 % | 50 |
//! | 5 | `enabled` | toggle | on |
//!
//! The bundle's `midi-randomizer.ttl` declares the same table, and
//! `presets.ttl` adds three factory presets for the jitter controls.

pub mod controls;
pub mod rng;
pub mod transform;

use strand::prelude::*;

use controls::Controls;
use rng::JitterRng;
use transform::randomize_block;

// =============================================================================
// Plugin Configuration
// =============================================================================

/// Plugin configuration.
pub static CONFIG: PluginConfig = PluginConfig::new("Strand MIDI Randomizer")
    .with_vendor("Strand")
    .with_url("https://github.com/strand-audio/strand")
    .with_version(env!("CARGO_PKG_VERSION"))
    .with_category("MIDIPlugin");

/// LV2 configuration. The URI must match `midi-randomizer.ttl`.
pub const LV2_CONFIG: Lv2Config = Lv2Config::new(c"http://example.org/midi-randomizer");

/// Host port indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PortIndex {
    MidiIn = 0,
    MidiOut = 1,
    Velocity = 2,
    Timing = 3,
    Amount = 4,
    Enabled = 5,
}

// =============================================================================
// Plugin Implementation
// =============================================================================

/// The randomizer. Its only state is the random generator.
pub struct MidiRandomizer {
    rng: JitterRng,
}

impl MidiRandomizer {
    /// Create a randomizer with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: JitterRng::from_seed(seed),
        }
    }
}

impl Plugin for MidiRandomizer {
    const CONTROLS: &'static [ControlInfo] = &controls::CONTROLS;

    fn prepare(setup: AudioSetup) -> Self {
        log::debug!("Preparing {} at {} Hz", CONFIG.name, setup.sample_rate);
        Self {
            rng: JitterRng::from_clock(),
        }
    }

    fn process_midi<'a, I, S>(
        &mut self,
        input: I,
        controls: &[f32],
        context: &ProcessContext,
        output: &mut S,
    ) where
        I: Iterator<Item = MidiEvent<'a>>,
        S: EventSink + ?Sized,
    {
        let controls = Controls::from_values(controls);
        randomize_block(input, &controls, context, &mut self.rng, output);
    }
}

// =============================================================================
// LV2 Export
// =============================================================================

export_lv2!(CONFIG, LV2_CONFIG, MidiRandomizer);
