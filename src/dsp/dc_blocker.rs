/// One-pole high-pass that strips DC and sub-audible offset from the input
/// before it reaches the ladder, where offset would otherwise be recirculated
/// by the resonance feedback.
///
/// Difference equation: `y[n] = x[n] - x[n-1] + coeff * y[n-1]`.
pub struct DcBlocker {
    prev_input: f32,
    prev_output: f32,
}

/// Pole position; close to 1 so only frequencies near DC are affected.
const DC_BLOCK_COEFF: f32 = 0.995;

impl DcBlocker {
    pub fn new() -> Self {
        Self {
            prev_input: 0.0,
            prev_output: 0.0,
        }
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32) -> f32 {
        let output = sample - self.prev_input + DC_BLOCK_COEFF * self.prev_output;
        self.prev_input = sample;
        self.prev_output = output;
        output
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.prev_input = 0.0;
        self.prev_output = 0.0;
    }
}

impl Default for DcBlocker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_stays_silent() {
        let mut blocker = DcBlocker::new();
        for _ in 0..256 {
            assert_eq!(blocker.next_sample(0.0), 0.0);
        }
    }

    #[test]
    fn test_constant_offset_decays() {
        let mut blocker = DcBlocker::new();

        // A constant input is pure DC; the output should die away
        let mut last = 0.0;
        for _ in 0..4096 {
            last = blocker.next_sample(0.5);
        }
        assert!(
            last.abs() < 0.01,
            "expected DC to be removed, residual: {}",
            last
        );
    }

    #[test]
    fn test_fast_changes_pass_through() {
        let mut blocker = DcBlocker::new();

        // Alternating full-scale samples are the highest representable
        // frequency and should come through at nearly full amplitude
        let mut peak = 0.0f32;
        for i in 0..64 {
            let x = if i % 2 == 0 { 1.0 } else { -1.0 };
            peak = peak.max(blocker.next_sample(x).abs());
        }
        assert!(peak > 1.0, "expected high frequencies preserved: {}", peak);
    }

    #[test]
    fn test_render_matches_per_sample_processing() {
        let input = [0.5f32, -0.25, 1.0, 0.0, -0.5];

        let mut reference = DcBlocker::new();
        let expected: Vec<f32> = input.iter().map(|&x| reference.next_sample(x)).collect();

        let mut buffer = input;
        let mut blocker = DcBlocker::new();
        blocker.render(&mut buffer);
        assert_eq!(buffer.to_vec(), expected);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut blocker = DcBlocker::new();
        blocker.next_sample(1.0);
        blocker.reset();
        assert_eq!(blocker.next_sample(0.0), 0.0);
    }
}
