//! Generic LV2 instance wrapper.
//!
//! [`Lv2Instance`] owns a [`Plugin`] together with everything host-facing:
//! resolved type identifiers, port connections and the control scratch
//! array. The `extern "C"` functions at the bottom of this module are the
//! descriptor entries; they validate pointers, catch panics and forward to
//! the safe methods.

use std::ffi::{c_char, c_void};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::{ptr, slice};

use strand_core::{
    AudioSetup, EventSink, Plugin, PluginError, PluginResult, ProcessContext, MAX_CONTROLS,
};

use crate::atom::{SequenceReader, SequenceWriter};
use crate::descriptor::Descriptor;
use crate::ports::{Port, PortBindings};
use crate::sys::{Lv2Descriptor, Lv2Feature, Lv2Handle, ATOM_HEADER_SIZE};
use crate::urid::{UridMap, Uris};

/// A plugin instance as seen by an LV2 host.
pub struct Lv2Instance<P: Plugin> {
    plugin: P,
    uris: Uris,
    ports: PortBindings,
    sample_rate: f64,
    controls: [f32; MAX_CONTROLS],
    /// Set once an output overflow has been logged for this instance.
    overflow_reported: bool,
}

impl<P: Plugin> Lv2Instance<P> {
    /// Create an instance.
    ///
    /// Fails if the sample rate is not a positive finite number or the host
    /// lacks `urid:map`.
    ///
    /// # Safety
    ///
    /// `features` must be null or a null-terminated host feature array.
    pub unsafe fn new(sample_rate: f64, features: *const *const Lv2Feature) -> PluginResult<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(PluginError::InvalidSampleRate(sample_rate));
        }

        // SAFETY: guaranteed by the caller.
        let map = unsafe { UridMap::from_features(features) }
            .ok_or(PluginError::MissingHostFeature("http://lv2plug.in/ns/ext/urid#map"))?;
        let uris = Uris::map(&map)?;

        Ok(Self {
            plugin: P::prepare(AudioSetup { sample_rate }),
            uris,
            ports: PortBindings::default(),
            sample_rate,
            controls: [0.0; MAX_CONTROLS],
            overflow_reported: false,
        })
    }

    /// Access the wrapped plugin.
    pub fn plugin(&self) -> &P {
        &self.plugin
    }

    /// Whether any block so far had to drop events for lack of output space.
    pub fn has_dropped_events(&self) -> bool {
        self.overflow_reported
    }

    /// Number of control ports honoured for `P`.
    #[inline]
    fn num_controls() -> usize {
        P::CONTROLS.len().min(MAX_CONTROLS)
    }

    /// Bind a host buffer to a port. Unknown port indices are ignored.
    pub fn connect_port(&mut self, index: u32, data: *mut c_void) {
        match Port::from_index(index, Self::num_controls()) {
            Some(port) => self.ports.connect(port, data),
            None => log::debug!("Ignoring connection to unknown port {}", index),
        }
    }

    /// Process one block of `sample_count` frames.
    ///
    /// # Safety
    ///
    /// Every connected port must point to a buffer the host keeps valid for
    /// the duration of the call. The output sequence's `atom.size` must hold
    /// the capacity of the output buffer in bytes.
    pub unsafe fn run(&mut self, sample_count: u32) {
        let out = self.ports.midi_out();
        if out.is_null() {
            return;
        }

        // SAFETY: a connected output port points to a valid sequence header
        // whose size field the host set to the buffer capacity.
        let capacity = unsafe { (*out).atom.size } as usize;
        let out_start = out as usize;
        let out_end = out_start.saturating_add(capacity);

        let input = self.ports.midi_in();
        let input_len = if input.is_null() {
            0
        } else {
            // SAFETY: a connected input port points to a valid sequence.
            ATOM_HEADER_SIZE + unsafe { (*input).atom.size } as usize
        };
        let in_start = input as usize;
        let aliased = input_len > 0 && in_start < out_end && out_start < in_start + input_len;

        let reader = if input_len == 0 || aliased {
            // In-place processing is not supported; the input is discarded
            SequenceReader::empty(self.uris.midi_event)
        } else {
            // SAFETY: the host keeps the input sequence valid for this call,
            // and it does not overlap the output.
            let bytes = unsafe { slice::from_raw_parts(input as *const u8, input_len) };
            SequenceReader::new(bytes, self.uris.midi_event)
        };

        // SAFETY: the host owns `capacity` writable bytes at `out`.
        let out_bytes = unsafe { slice::from_raw_parts_mut(out as *mut u8, capacity) };
        let mut writer =
            SequenceWriter::new(out_bytes, self.uris.atom_sequence, self.uris.midi_event);

        let count = Self::num_controls();
        // SAFETY: connected control ports are valid for reads.
        unsafe {
            self.ports
                .read_controls(&P::CONTROLS[..count], &mut self.controls[..count]);
        }

        let context = ProcessContext::new(self.sample_rate, sample_count);
        self.plugin
            .process_midi(reader, &self.controls[..count], &context, &mut writer);

        // Warn once per instance; `run` is on the audio thread
        if writer.has_overflowed() && !self.overflow_reported {
            self.overflow_reported = true;
            log::warn!(
                "MIDI output buffer full ({} bytes), dropping events",
                writer.capacity()
            );
        }
    }
}

// =============================================================================
// Descriptor entries
// =============================================================================

pub(crate) unsafe extern "C" fn instantiate<P: Plugin>(
    descriptor: *const Lv2Descriptor,
    sample_rate: f64,
    _bundle_path: *const c_char,
    features: *const *const Lv2Feature,
) -> Lv2Handle {
    let name = if descriptor.is_null() {
        "plugin"
    } else {
        // SAFETY: hosts pass back the descriptor returned by
        // `lv2_descriptor`, which is always a `Descriptor`.
        unsafe { (*(descriptor as *const Descriptor)).config().name }
    };

    // SAFETY: `features` comes straight from the host.
    let result = catch_unwind(AssertUnwindSafe(|| unsafe {
        Lv2Instance::<P>::new(sample_rate, features)
    }))
    .unwrap_or_else(|_| {
        Err(PluginError::InitializationFailed(
            "plugin panicked during prepare".to_string(),
        ))
    });

    match result {
        Ok(instance) => {
            log::debug!("Instantiated {} at {} Hz", name, sample_rate);
            Box::into_raw(Box::new(instance)) as Lv2Handle
        }
        Err(e) => {
            log::error!("Failed to instantiate {}: {}", name, e);
            ptr::null_mut()
        }
    }
}

pub(crate) unsafe extern "C" fn connect_port<P: Plugin>(
    instance: Lv2Handle,
    port: u32,
    data_location: *mut c_void,
) {
    if instance.is_null() {
        return;
    }

    let _ = catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: non-null handles come from `instantiate::<P>`.
        let instance = unsafe { &mut *(instance as *mut Lv2Instance<P>) };
        instance.connect_port(port, data_location);
    }));
}

pub(crate) unsafe extern "C" fn run<P: Plugin>(instance: Lv2Handle, sample_count: u32) {
    if instance.is_null() {
        return;
    }

    let _ = catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: non-null handles come from `instantiate::<P>`; the host
        // keeps connected buffers valid during `run`.
        unsafe {
            let instance = &mut *(instance as *mut Lv2Instance<P>);
            instance.run(sample_count);
        }
    }));
}

pub(crate) unsafe extern "C" fn cleanup<P: Plugin>(instance: Lv2Handle) {
    if instance.is_null() {
        return;
    }

    let _ = catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: non-null handles come from `instantiate::<P>` and are
        // cleaned up exactly once.
        drop(unsafe { Box::from_raw(instance as *mut Lv2Instance<P>) });
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys::{LV2_ATOM_SEQUENCE, LV2_MIDI_EVENT, SEQUENCE_HEADER_SIZE};
    use crate::urid::test_host::TestHost;
    use strand_core::{ControlInfo, MidiEvent};

    /// Adds the first control value to every event's time stamp and drops
    /// anything that is not MIDI.
    struct Shift {
        blocks: usize,
    }

    impl Plugin for Shift {
        const CONTROLS: &'static [ControlInfo] =
            &[ControlInfo::new("offset", "Offset").with_default(1.0)];

        fn prepare(_setup: AudioSetup) -> Self {
            Shift { blocks: 0 }
        }

        fn process_midi<'a, I, S>(
            &mut self,
            input: I,
            controls: &[f32],
            _context: &ProcessContext,
            output: &mut S,
        ) where
            I: Iterator<Item = MidiEvent<'a>>,
            S: EventSink + ?Sized,
        {
            self.blocks += 1;
            for event in input {
                if let Some(bytes) = event.as_midi() {
                    output.push(event.frames + controls[0] as i64, bytes);
                }
            }
        }
    }

    /// 8-byte aligned storage for a sequence buffer.
    fn sequence_buffer(capacity: usize) -> Vec<u64> {
        vec![0u64; capacity / 8]
    }

    fn as_bytes(buffer: &mut [u64]) -> &mut [u8] {
        // SAFETY: any u64 storage is valid as bytes.
        unsafe { slice::from_raw_parts_mut(buffer.as_mut_ptr() as *mut u8, buffer.len() * 8) }
    }

    fn write_input(host: &TestHost, buffer: &mut [u64], events: &[(i64, &[u8])]) {
        let sequence = host.urid(LV2_ATOM_SEQUENCE);
        let midi = host.urid(LV2_MIDI_EVENT);
        let mut writer = SequenceWriter::new(as_bytes(buffer), sequence, midi);
        for (frames, bytes) in events {
            assert!(writer.push(*frames, bytes));
        }
    }

    fn set_capacity(buffer: &mut [u64]) {
        let capacity = (buffer.len() * 8) as u32;
        as_bytes(buffer)[0..4].copy_from_slice(&capacity.to_ne_bytes());
    }

    fn read_output(host: &TestHost, buffer: &mut [u64]) -> Vec<(i64, Vec<u8>)> {
        SequenceReader::new(as_bytes(buffer), host.urid(LV2_MIDI_EVENT))
            .filter_map(|e| e.as_midi().map(|b| (e.frames, b.to_vec())))
            .collect()
    }

    #[test]
    fn test_new_requires_urid_map() {
        let features: [*const Lv2Feature; 1] = [ptr::null()];
        // SAFETY: empty null-terminated feature array.
        let result = unsafe { Lv2Instance::<Shift>::new(48000.0, features.as_ptr()) };
        assert!(matches!(result, Err(PluginError::MissingHostFeature(_))));
    }

    #[test]
    fn test_new_rejects_bad_sample_rates() {
        let host = TestHost::new();
        for rate in [0.0, -44100.0, f64::NAN, f64::INFINITY] {
            // SAFETY: the test host owns a valid feature array.
            let result = unsafe { Lv2Instance::<Shift>::new(rate, host.features()) };
            assert!(matches!(result, Err(PluginError::InvalidSampleRate(_))));
        }
    }

    #[test]
    fn test_new_accepts_high_sample_rates() {
        let host = TestHost::new();
        for rate in [22050.0, 384_000.0, 705_600.0, 768_000.0] {
            // SAFETY: the test host owns a valid feature array.
            let result = unsafe { Lv2Instance::<Shift>::new(rate, host.features()) };
            assert!(result.is_ok(), "rate {} rejected", rate);
        }
    }

    #[test]
    fn test_run_processes_connected_ports() {
        let host = TestHost::new();
        // SAFETY: the test host owns a valid feature array.
        let mut instance = unsafe { Lv2Instance::<Shift>::new(48000.0, host.features()) }.unwrap();

        let mut input = sequence_buffer(256);
        let mut output = sequence_buffer(256);
        let mut offset = 4.0f32;
        write_input(&host, &mut input, &[(0, &[0x90, 60, 100]), (10, &[0x80, 60, 0])]);
        set_capacity(&mut output);

        instance.connect_port(0, input.as_mut_ptr() as *mut c_void);
        instance.connect_port(1, output.as_mut_ptr() as *mut c_void);
        instance.connect_port(2, &mut offset as *mut f32 as *mut c_void);
        // Unknown ports are ignored
        instance.connect_port(3, ptr::null_mut());
        instance.connect_port(99, ptr::null_mut());

        // SAFETY: all connected buffers outlive the call.
        unsafe { instance.run(64) };

        assert_eq!(instance.plugin().blocks, 1);
        assert_eq!(
            read_output(&host, &mut output),
            vec![(4, vec![0x90, 60, 100]), (14, vec![0x80, 60, 0])]
        );
    }

    #[test]
    fn test_run_without_output_does_nothing() {
        let host = TestHost::new();
        // SAFETY: the test host owns a valid feature array.
        let mut instance = unsafe { Lv2Instance::<Shift>::new(48000.0, host.features()) }.unwrap();
        // SAFETY: nothing is connected.
        unsafe { instance.run(64) };
        assert_eq!(instance.plugin().blocks, 0);
    }

    #[test]
    fn test_run_without_input_uses_defaults() {
        let host = TestHost::new();
        // SAFETY: the test host owns a valid feature array.
        let mut instance = unsafe { Lv2Instance::<Shift>::new(48000.0, host.features()) }.unwrap();
        let mut output = sequence_buffer(64);
        set_capacity(&mut output);
        instance.connect_port(1, output.as_mut_ptr() as *mut c_void);

        // SAFETY: the output buffer outlives the call.
        unsafe { instance.run(64) };

        assert_eq!(instance.plugin().blocks, 1);
        let bytes = as_bytes(&mut output);
        assert_eq!(
            u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize,
            SEQUENCE_HEADER_SIZE - ATOM_HEADER_SIZE
        );
        assert_eq!(
            u32::from_ne_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            host.urid(LV2_ATOM_SEQUENCE)
        );
    }

    #[test]
    fn test_empty_blocks_into_tiny_output_drop_nothing() {
        let host = TestHost::new();
        // SAFETY: the test host owns a valid feature array.
        let mut instance = unsafe { Lv2Instance::<Shift>::new(48000.0, host.features()) }.unwrap();
        // Room for an atom header, not for a sequence header
        let mut output = sequence_buffer(8);
        instance.connect_port(1, output.as_mut_ptr() as *mut c_void);

        for _ in 0..3 {
            set_capacity(&mut output);
            // SAFETY: the output buffer outlives the call.
            unsafe { instance.run(64) };
        }

        assert_eq!(instance.plugin().blocks, 3);
        assert!(!instance.has_dropped_events());
        assert!(read_output(&host, &mut output).is_empty());
    }

    #[test]
    fn test_dropped_events_are_reported() {
        let host = TestHost::new();
        // SAFETY: the test host owns a valid feature array.
        let mut instance = unsafe { Lv2Instance::<Shift>::new(48000.0, host.features()) }.unwrap();

        let mut input = sequence_buffer(256);
        // Header plus one event
        let mut output = sequence_buffer(SEQUENCE_HEADER_SIZE + 24);
        let mut offset = 0.0f32;
        write_input(&host, &mut input, &[(0, &[0x90, 60, 100]), (10, &[0x80, 60, 0])]);
        instance.connect_port(0, input.as_mut_ptr() as *mut c_void);
        instance.connect_port(1, output.as_mut_ptr() as *mut c_void);
        instance.connect_port(2, &mut offset as *mut f32 as *mut c_void);

        for _ in 0..2 {
            set_capacity(&mut output);
            // SAFETY: all connected buffers outlive the call.
            unsafe { instance.run(64) };
            assert!(instance.has_dropped_events());
            assert_eq!(read_output(&host, &mut output), vec![(0, vec![0x90, 60, 100])]);
        }
    }

    #[test]
    fn test_run_refuses_aliased_buffers() {
        let host = TestHost::new();
        // SAFETY: the test host owns a valid feature array.
        let mut instance = unsafe { Lv2Instance::<Shift>::new(48000.0, host.features()) }.unwrap();

        let mut shared = sequence_buffer(256);
        write_input(&host, &mut shared, &[(0, &[0x90, 60, 100])]);
        instance.connect_port(0, shared.as_mut_ptr() as *mut c_void);
        instance.connect_port(1, shared.as_mut_ptr() as *mut c_void);

        // SAFETY: the shared buffer outlives the call.
        unsafe { instance.run(64) };

        assert!(read_output(&host, &mut shared).is_empty());
    }

    #[test]
    fn test_entry_points_tolerate_null_handles() {
        // SAFETY: null handles are checked before use.
        unsafe {
            connect_port::<Shift>(ptr::null_mut(), 0, ptr::null_mut());
            run::<Shift>(ptr::null_mut(), 64);
            cleanup::<Shift>(ptr::null_mut());
        }
    }
}
