/*
Cutoff Envelope
===============

A timed state machine that sweeps the filter cutoff, producing the classic
"filter pluck" of subtractive synthesis: the cutoff snaps open on a trigger
and falls back toward the played value.

Unlike an amplitude ADSR this envelope is clocked by HOST TIME, not by
sample count. The host hands us a monotonic time value (seconds) once per
control tick, usually at the start of each audio block, and each phase
interpolates linearly between a start and a target cutoff over a wall-clock
duration.

Vocabulary
----------

  value         The envelope's current output: a cutoff frequency in Hz.
                While the envelope is the active modulation source, this
                value becomes the filter's smoothed cutoff target.

  phase         Which segment we're in: Idle, Attack, Decay, Held, or
                Release. A state machine governs transitions.

  manual cutoff The cutoff the player last set by hand. The decay phase
                lands between the attack peak and this value, scaled by the
                sustain level, so released knob position still matters.

  progress      (now - phase_start) / duration, clamped to 1. Drives the
                linear interpolation within a phase.

The State Machine
-----------------

    trigger_attack          progress >= 1           progress >= 1
  ──────────────────→ Attack ─────────────→ Decay ─────────────→ Held
                        │                     │                    │
                        │ trigger_release     │ trigger_release    │
                        ↓                     ↓                    ↓
                      Release ←────────────────────────────────────┘
                        │
                        │ progress >= 1
                        ↓
                      Idle  (value frozen at the release target)

Held freezes the value after a completed decay: further advance() calls do
nothing until a new trigger arrives. Release can interrupt any phase and
always ramps from the CURRENT value, so mid-attack releases don't click.

Two quirks worth knowing:

  * Attack targets TWICE the requested peak. This is a voicing choice
    (extra sweep headroom so the perceived peak lands where expected after
    smoothing), kept deliberately.

  * When a phase completes, its final value is exactly its own target
    (progress clamps to 1 against the completing phase). The successor
    phase begins interpolating on the next advance() call.
*/

/// Segment of the cutoff-envelope state machine.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopePhase {
    /// No modulation pending; value holds whatever the last phase left.
    Idle,
    /// Ramping from the trigger's start cutoff to twice its peak.
    Attack,
    /// Falling from the attack peak toward the sustain point.
    Decay,
    /// Decay finished; value frozen until a new trigger.
    Held,
    /// Ramping from the current value to a release target, then Idle.
    Release,
}

pub struct CutoffEnvelope {
    phase: EnvelopePhase,
    value: f32, // current output cutoff, Hz

    // Per-phase interpolation endpoints
    start_cutoff: f32,
    target_cutoff: f32,
    phase_start_time: f32,
    phase_duration: f32,

    // Configuration for the decay phase entered after attack
    decay_time: f32,
    sustain_level: f32,

    current_time: f32,
}

impl CutoffEnvelope {
    pub fn new() -> Self {
        Self {
            phase: EnvelopePhase::Idle,
            value: 1000.0,
            start_cutoff: 1000.0,
            target_cutoff: 1000.0,
            phase_start_time: 0.0,
            phase_duration: 0.0,
            decay_time: 0.5,
            sustain_level: 0.5,
            current_time: 0.0,
        }
    }

    /// Begin an attack sweep from `start_cutoff` toward `peak_cutoff`.
    ///
    /// The internal target is `2 * peak_cutoff`; the overshoot is a voicing
    /// choice kept from the instrument this filter was built for.
    pub fn trigger_attack(&mut self, start_cutoff: f32, peak_cutoff: f32, attack_time: f32) {
        self.start_cutoff = start_cutoff;
        self.target_cutoff = peak_cutoff * 2.0;
        self.phase_start_time = self.current_time;
        self.phase_duration = attack_time;
        self.phase = EnvelopePhase::Attack;
    }

    /// Begin a release sweep from the current value toward `target_cutoff`.
    ///
    /// Valid from any phase; a mid-attack release ramps down from wherever
    /// the attack had reached.
    pub fn trigger_release(&mut self, target_cutoff: f32, release_time: f32) {
        self.start_cutoff = self.value;
        self.target_cutoff = target_cutoff;
        self.phase_start_time = self.current_time;
        self.phase_duration = release_time;
        self.phase = EnvelopePhase::Release;
    }

    /// Advance to host time `now` (seconds, monotonic) and return the new
    /// envelope cutoff, or `None` when the envelope has nothing to do
    /// (Idle or Held).
    ///
    /// `manual_cutoff` is the player's hand-set cutoff; the decay phase
    /// lands at `peak + (manual_cutoff - peak) * (1 - sustain_level)`.
    pub fn advance(&mut self, now: f32, manual_cutoff: f32) -> Option<f32> {
        self.current_time = now;

        if matches!(self.phase, EnvelopePhase::Idle | EnvelopePhase::Held) {
            return None;
        }

        let elapsed = now - self.phase_start_time;
        let progress = if self.phase_duration > 0.0 {
            elapsed / self.phase_duration
        } else {
            1.0
        };

        if progress >= 1.0 {
            // Final sample of the phase lands exactly on its target
            self.value = self.target_cutoff;

            match self.phase {
                EnvelopePhase::Attack => {
                    let peak = self.target_cutoff;
                    self.start_cutoff = peak;
                    self.target_cutoff = peak + (manual_cutoff - peak) * (1.0 - self.sustain_level);
                    self.phase_start_time = now;
                    self.phase_duration = self.decay_time;
                    self.phase = EnvelopePhase::Decay;
                }
                EnvelopePhase::Decay => {
                    self.phase = EnvelopePhase::Held;
                }
                EnvelopePhase::Release => {
                    self.phase = EnvelopePhase::Idle;
                }
                EnvelopePhase::Idle | EnvelopePhase::Held => unreachable!(),
            }
        } else {
            self.value = self.start_cutoff + (self.target_cutoff - self.start_cutoff) * progress;
        }

        Some(self.value)
    }

    /// Drop back to Idle without touching the current value.
    pub fn cancel(&mut self) {
        self.phase = EnvelopePhase::Idle;
    }

    /// Overwrite the envelope output directly (external envelope drive).
    pub fn set_value(&mut self, cutoff_hz: f32) {
        self.value = cutoff_hz;
    }

    pub fn set_decay_time(&mut self, seconds: f32) {
        self.decay_time = seconds;
    }

    pub fn set_sustain_level(&mut self, level: f32) {
        self.sustain_level = level.clamp(0.0, 1.0);
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn phase(&self) -> EnvelopePhase {
        self.phase
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for CutoffEnvelope {
    fn default() -> Self {
        Self::new()
    }
}
