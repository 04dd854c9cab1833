//! Per-block processing context.

/// Information about the block currently being processed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessContext {
    /// Current sample rate in Hz.
    ///
    /// Same value passed to [`Plugin::prepare()`](crate::Plugin::prepare),
    /// provided here for convenience during processing.
    pub sample_rate: f64,

    /// Number of sample frames in this block.
    pub num_samples: u32,
}

impl ProcessContext {
    /// Creates a new ProcessContext.
    ///
    /// This is called by the format wrapper, not by plugin code.
    #[inline]
    pub fn new(sample_rate: f64, num_samples: u32) -> Self {
        Self {
            sample_rate,
            num_samples,
        }
    }

    /// Last frame offset that still lies inside this block.
    ///
    /// Returns 0 for an empty block.
    #[inline]
    pub fn last_frame(&self) -> i64 {
        (self.num_samples as i64 - 1).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_frame() {
        assert_eq!(ProcessContext::new(48000.0, 64).last_frame(), 63);
        assert_eq!(ProcessContext::new(48000.0, 0).last_frame(), 0);
    }
}
