use crate::{
    dsp::{
        coefficients::{LadderCoefficients, THERMAL},
        dc_blocker::DcBlocker,
        envelope::{CutoffEnvelope, EnvelopePhase},
        saturation::saturate,
        smoother::ParamSmoother,
    },
    BLOCK_SIZE,
};

/*
* Huovilainen Ladder Filter
* =========================
*
* A digital model of the Moog transistor ladder: four cascaded one-pole
* integrators, each wrapped in a saturating nonlinearity, with the last
* stage's output fed back to the input to produce resonance.
*
* Signal path per block:
*
*   setters / envelope ──→ targets
*                             │ smoothed once per block
*                             ▼
*                     live cutoff / resonance ──→ tune, acr, res_quad
*                                                        │
*   input ──→ DC blocker ──→ ┌────────────────────────── ▼ ─────────┐
*                            │  2x oversampled ladder recursion     │ ──→ output
*                            └──────────────────────────────────────┘
*
* Why 2x oversampling: the saturators generate harmonics above Nyquist that
* would alias back into the audible band. Running the recursion at twice the
* block rate pushes the worst of that an octave up, where the ladder's own
* rolloff eats it. Two sub-steps per sample is the cheapest factor that
* works.
*
* Why the half-sample delay: each of the four stages contributes phase lag.
* The global feedback tap is taken from the average of the last two stage-3
* outputs (a half-sample delay), which compensates the cumulative lag and
* keeps the resonance peak where the coefficients put it.
*
* Precision: the recursion runs in f64. The repeated nonlinear feedback
* accumulates rounding error audibly at f32, while control-rate parameters
* (cutoff, resonance, envelope, block I/O) are fine at f32. Keep the split.
*
* There are no error returns in the signal path. Stability rests on two
* invariants: the coefficient mapper clamps normalized cutoff to 0.45, and
* the saturators are bounded. Nothing here checks for NaN at runtime.
*/

/// A complete filter instance: ladder state, control parameters, DC blocker
/// and cutoff envelope. Instances are independent; make as many as you need.
pub struct LadderFilter {
    // Ladder recursion state, all f64
    stage: [f64; 4],
    stage_tanh: [f64; 3],
    delay: [f64; 6],

    coefficients: LadderCoefficients,

    cutoff: ParamSmoother,
    resonance: ParamSmoother,

    dc_blocker: DcBlocker,

    envelope: CutoffEnvelope,
    envelope_active: bool,

    /// Cutoff the player last set by hand; the envelope decays relative to
    /// it, and deactivating the envelope snaps the target back to it.
    manual_cutoff: f32,
}

const DEFAULT_CUTOFF: f32 = 1000.0;
const DEFAULT_RESONANCE: f32 = 0.1;

/// Sub-steps of the ladder recursion per input sample.
const OVERSAMPLE: usize = 2;

impl LadderFilter {
    pub fn new() -> Self {
        Self {
            stage: [0.0; 4],
            stage_tanh: [0.0; 3],
            delay: [0.0; 6],
            coefficients: LadderCoefficients::default_params(),
            cutoff: ParamSmoother::new(DEFAULT_CUTOFF),
            resonance: ParamSmoother::new(DEFAULT_RESONANCE),
            dc_blocker: DcBlocker::new(),
            envelope: CutoffEnvelope::new(),
            envelope_active: false,
            manual_cutoff: DEFAULT_CUTOFF,
        }
    }

    /// Zero all filter state and restore default parameters, as if freshly
    /// constructed.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Set the manual cutoff target in Hz.
    ///
    /// While the envelope is the active modulation source the new value only
    /// records the hand position (the envelope keeps driving the live
    /// target); otherwise it takes effect on the next block.
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.manual_cutoff = cutoff_hz;
        if !self.envelope_active {
            self.cutoff.set_target(cutoff_hz);
            self.refresh_coefficients();
        }
    }

    /// Set the resonance target. Not clamped: values a little above 1.0
    /// drive the filter into self-oscillation.
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance.set_target(resonance);
        self.refresh_coefficients();
    }

    /// Toggle whether the envelope overrides the manual cutoff.
    ///
    /// Deactivating cancels any running phase and snaps the cutoff target
    /// back to the last hand-set value.
    pub fn set_envelope_active(&mut self, active: bool) {
        self.envelope_active = active;
        if !active {
            self.cutoff.set_target(self.manual_cutoff);
            self.envelope.cancel();
            self.refresh_coefficients();
        }
    }

    /// Drive the envelope output directly from an external source.
    /// Takes effect on the live target only while the envelope is active.
    pub fn set_envelope_cutoff(&mut self, cutoff_hz: f32) {
        self.envelope.set_value(cutoff_hz);
        if self.envelope_active {
            self.cutoff.set_target(cutoff_hz);
            self.refresh_coefficients();
        }
    }

    /// Configure the decay duration used when a future attack completes.
    /// No effect on a decay already in progress.
    pub fn set_envelope_decay_time(&mut self, seconds: f32) {
        self.envelope.set_decay_time(seconds);
    }

    /// Configure the sustain level (0..1) used when a future attack
    /// completes. No effect on a decay already in progress.
    pub fn set_envelope_sustain_level(&mut self, level: f32) {
        self.envelope.set_sustain_level(level);
    }

    /// Start an attack sweep and make the envelope the active source.
    pub fn trigger_attack(&mut self, start_cutoff: f32, peak_cutoff: f32, attack_time: f32) {
        self.envelope
            .trigger_attack(start_cutoff, peak_cutoff, attack_time);
        self.envelope_active = true;
    }

    /// Start a release sweep from the envelope's current value.
    ///
    /// Ignored while the envelope is not the active modulation source;
    /// otherwise a later activation would resume a stale ramp mid-flight.
    pub fn trigger_release(&mut self, target_cutoff: f32, release_time: f32) {
        if !self.envelope_active {
            return;
        }
        self.envelope.trigger_release(target_cutoff, release_time);
    }

    /// Advance the envelope to host time `now` (seconds, monotonic) and
    /// propagate its output into the cutoff target. Call once per control
    /// tick, before processing the block it should affect. No-op while the
    /// envelope is inactive or has nothing to interpolate.
    pub fn advance_envelope(&mut self, now: f32) {
        if !self.envelope_active {
            return;
        }
        if let Some(cutoff) = self.envelope.advance(now, self.manual_cutoff) {
            self.cutoff.set_target(cutoff);
            self.refresh_coefficients();
        }
    }

    /// Filter one block in place.
    ///
    /// The block length must be exactly [`BLOCK_SIZE`]; anything else is a
    /// caller bug, not a runtime condition. The call never allocates,
    /// blocks, or fails mid-buffer.
    pub fn process_block(&mut self, block: &mut [f32]) {
        assert!(
            block.len() == BLOCK_SIZE,
            "process_block requires exactly {} samples, got {}",
            BLOCK_SIZE,
            block.len()
        );

        self.cutoff.advance();
        self.resonance.advance();
        self.refresh_coefficients();

        for sample in block.iter_mut() {
            let dc_blocked = self.dc_blocker.next_sample(*sample);
            *sample = self.tick(dc_blocked);
        }
    }

    /// One input sample through the 2x-oversampled ladder recursion.
    #[inline]
    fn tick(&mut self, dc_blocked: f32) -> f32 {
        let LadderCoefficients {
            tune, res_quad, ..
        } = self.coefficients;
        let input = dc_blocked as f64;

        for _ in 0..OVERSAMPLE {
            // Global resonance feedback from the phase-compensated tap
            let feedback_input = input - res_quad * self.delay[5];

            // Stage 0 drives against its own cached saturator output from
            // the previous sub-step
            self.stage[0] =
                self.delay[0] + tune * (saturate(feedback_input * THERMAL) - self.stage_tanh[0]);
            self.delay[0] = self.stage[0];

            // Stages 1-2: refresh the upstream saturator cache, then
            // integrate against this stage's cached output
            self.stage_tanh[0] = saturate(self.stage[0] * THERMAL);
            self.stage[1] = self.delay[1] + tune * (self.stage_tanh[0] - self.stage_tanh[1]);
            self.delay[1] = self.stage[1];

            self.stage_tanh[1] = saturate(self.stage[1] * THERMAL);
            self.stage[2] = self.delay[2] + tune * (self.stage_tanh[1] - self.stage_tanh[2]);
            self.delay[2] = self.stage[2];

            // Stage 3 has no cache slot of its own; its previous output is
            // re-saturated fresh each sub-step
            self.stage_tanh[2] = saturate(self.stage[2] * THERMAL);
            self.stage[3] =
                self.delay[3] + tune * (self.stage_tanh[2] - saturate(self.delay[3] * THERMAL));
            self.delay[3] = self.stage[3];

            // Half-sample delay compensating the chain's phase lag
            self.delay[5] = (self.stage[3] + self.delay[4]) * 0.5;
            self.delay[4] = self.stage[3];
        }

        self.delay[5] as f32
    }

    fn refresh_coefficients(&mut self) {
        self.coefficients =
            LadderCoefficients::derive(self.cutoff.current(), self.resonance.current());
    }

    /// Live (smoothed) cutoff in Hz.
    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff.current()
    }

    /// Cutoff target currently being approached.
    pub fn target_cutoff_hz(&self) -> f32 {
        self.cutoff.target()
    }

    /// Live (smoothed) resonance.
    pub fn resonance(&self) -> f32 {
        self.resonance.current()
    }

    pub fn envelope_active(&self) -> bool {
        self.envelope_active
    }

    pub fn envelope_phase(&self) -> EnvelopePhase {
        self.envelope.phase()
    }

    /// Current envelope output cutoff in Hz.
    pub fn envelope_cutoff_hz(&self) -> f32 {
        self.envelope.value()
    }
}

impl Default for LadderFilter {
    fn default() -> Self {
        Self::new()
    }
}
