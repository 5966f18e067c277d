/// One-pole exponential smoother for control parameters.
///
/// Live values chase their targets geometrically, one step per audio block:
/// `live += (target - live) * coeff`. A hard jump in the target therefore
/// spreads over a few dozen blocks instead of landing between two samples,
/// which is what causes audible popping.
///
/// Finer-than-block modulation is the envelope generator's job; the smoother
/// only exists to de-click direct parameter sets.
pub struct ParamSmoother {
    current: f32,
    target: f32,
    coeff: f32,
}

/// Fraction of the remaining distance covered per block. 0.1 settles a step
/// change within roughly 50 blocks (~150 ms at 44.1 kHz / 128 samples)
/// without audible stepping.
pub const SMOOTHING_COEFF: f32 = 0.1;

impl ParamSmoother {
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: SMOOTHING_COEFF,
        }
    }

    /// Advance the live value one block toward the target and return it.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += (self.target - self.current) * self.coeff;
        self.current
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump both live value and target, bypassing smoothing.
    pub fn snap(&mut self, value: f32) {
        self.current = value;
        self.target = value;
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }
}
