//! Low-level DSP primitives making up the ladder filter signal path.
//!
//! These components are allocation-free and realtime-safe, making them safe to
//! call from an audio callback. They intentionally stay focused on the
//! signal-processing math so the graph layer can handle orchestration and
//! cross-thread control.

/// Coefficient derivation from cutoff and resonance.
pub mod coefficients;
/// One-pole high-pass removing sub-audible offset.
pub mod dc_blocker;
/// Timed cutoff-envelope state machine.
pub mod envelope;
/// Four-stage nonlinear ladder low-pass filter.
pub mod ladder;
/// Transistor-style saturation nonlinearity.
pub mod saturation;
/// Exponential parameter smoothing toward targets.
pub mod smoother;

pub use envelope::EnvelopePhase;
pub use ladder::LadderFilter;
