//! Coefficient derivation for the ladder core.
//!
//! The recursion itself only understands three numbers: the integrator gain
//! (`tune`), a resonance-compensation factor (`acr`), and the effective
//! feedback gain (`res_quad`). This module maps a musically meaningful
//! cutoff/resonance pair onto those numbers.
//!
//! The two polynomials are empirical fits against the analog prototype:
//! `fcr` corrects the cutoff frequency for the warping introduced by the
//! cascaded one-pole stages, and `acr` compensates the resonance feedback so
//! the peak stays put as cutoff moves. Both come from Huovilainen's published
//! model of the Moog ladder.

use std::f64::consts::PI;

use crate::SAMPLE_RATE;

/// Thermal voltage scaling of the transistor saturators. Signals are scaled
/// by this on the way into `saturate` and back out via `tune`.
pub const THERMAL: f64 = 0.000025;

/// Upper bound on normalized cutoff. Anything nearer Nyquist makes the
/// recursion unstable, so the clamp is a hard invariant of the mapper.
pub const MAX_NORMALIZED_CUTOFF: f64 = 0.45;

/// Derived filter coefficients, recomputed whenever live cutoff or
/// resonance changes.
#[derive(Debug, Clone, Copy)]
pub struct LadderCoefficients {
    /// Integrator gain derived from cutoff and the frequency-correction fit.
    pub tune: f64,
    /// Resonance-compensation factor.
    pub acr: f64,
    /// Effective feedback gain: `4 * resonance * acr`.
    pub res_quad: f64,
}

impl LadderCoefficients {
    /// Derive coefficients from a cutoff in Hz and an (unclamped) resonance.
    ///
    /// Cutoff is silently clamped so the normalized frequency never exceeds
    /// [`MAX_NORMALIZED_CUTOFF`]; resonance is taken as-is. Values slightly
    /// above 1.0 push the filter into self-oscillation, which is usable
    /// musically, so no ceiling is imposed.
    pub fn derive(cutoff_hz: f32, resonance: f32) -> Self {
        let fc = (cutoff_hz as f64 / SAMPLE_RATE as f64).min(MAX_NORMALIZED_CUTOFF);

        // The recursion runs at twice the block rate, so the integrator
        // sees half the normalized frequency
        let f = fc * 0.5;
        let fc2 = fc * fc;
        let fc3 = fc2 * fc;

        let fcr = 1.8730 * fc3 + 0.4955 * fc2 - 0.6490 * fc + 0.9988;
        let acr = -3.9364 * fc2 + 1.8409 * fc + 0.9968;

        let tune = (1.0 - (-(2.0 * PI) * f * fcr).exp()) / THERMAL;
        let res_quad = 4.0 * resonance as f64 * acr;

        Self {
            tune,
            acr,
            res_quad,
        }
    }

    /// Coefficients for the default parameter set (1 kHz, resonance 0.1).
    pub fn default_params() -> Self {
        Self::derive(1000.0, 0.1)
    }
}
