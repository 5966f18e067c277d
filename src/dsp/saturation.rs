//! Transistor Saturation
//!
//! Each integrator stage of the ladder passes its signal through a saturating
//! nonlinearity, the same way the transistor pairs in the analog circuit do.
//! This is what keeps the filter stable at high resonance and what gives it
//! its "warm" character: instead of clipping abruptly, peaks are compressed
//! smoothly and a small amount of harmonic content is folded in.
//!
//! # The Transfer Function
//!
//! The base curve is tanh(x), the classic differential-pair response. On top
//! of that, a few deliberately small character terms:
//!
//! Asymmetry:
//!   Negative excursions are attenuated by 2%. Real circuits are never
//!   perfectly symmetric, and the slight imbalance produces even harmonics.
//!
//! Drive level:
//!   level = |x| / (1 + |x|), a saturating 0..1 measure of how hard the
//!   input is pushing into the nonlinear region.
//!
//! Harmonic terms:
//!   A gain boost plus even-harmonic, third-harmonic and intermodulation
//!   terms, all scaled by the drive level. Each is also scaled by
//!   1 / (1 + 2·level) so the added content backs off as drive increases,
//!   which keeps high-frequency artifacts out of the passband.
//!
//! The output is finite for every finite input. Note that the character
//! terms grow linearly in x, so the curve as a whole is not bounded; it only
//! hugs tanh's ±1 over the thermal-scaled operating range the ladder
//! actually drives it with (|x| on the order of 1). The function is pure:
//! no state, no failure modes.

/// Shaped saturation curve used inside every ladder stage.
///
/// Approximates analog transistor saturation: a tanh core with slight
/// asymmetry and level-dependent harmonic enhancement.
#[inline]
pub fn saturate(x: f64) -> f64 {
    let base = x.tanh();

    // Slight attenuation of negative excursions, as in the analog circuit
    let asymmetry = if x > 0.0 { 1.0 } else { 0.98 };

    let abs_x = x.abs();
    let level = abs_x / (1.0 + abs_x);

    // Back off the added harmonics as drive increases
    let freq_scale = 1.0 / (1.0 + 2.0 * level);

    let harmonic_boost = 1.0 + 0.015 * level * freq_scale;
    let even_harmonic = 0.008 * x * level * freq_scale / (1.0 + abs_x);
    let third_harmonic = 0.006 * x * level * level * freq_scale;
    let intermod = 0.004 * x * level * freq_scale;

    asymmetry * base * harmonic_boost + even_harmonic + third_harmonic + intermod
}

/// Apply the saturation curve to an entire buffer in place.
pub fn saturate_buffer(buffer: &mut [f64]) {
    for sample in buffer.iter_mut() {
        *sample = saturate(*sample);
    }
}
