use crate::{
    dsp::ladder::LadderFilter,
    graph::node::{GraphNode, RenderCtx},
};

/*
Ladder Filter Node
==================

`LadderNode` adapts the ladder filter to the graph layer: each rendered
block advances the cutoff envelope against the host clock and then filters
the buffer in place. Note events map onto envelope triggers, giving the
classic keyboard-tracked filter pluck without the host touching envelope
internals:

  note_on   → attack sweep using the node's configured `FilterSweep`
  note_off  → release sweep back to the sweep's release cutoff

For hosts where parameter changes originate on another thread (a UI knob,
a MIDI CC handler), `SharedLadderNode` owns the filter on the audio thread
and drains a lock-free SPSC queue of control messages at the start of every
block. The paired `LadderHandle` lives on the control thread and only ever
pushes; dropped messages (full queue) are silently discarded, which for
knob gestures just means the next gesture wins.
*/

/// Envelope sweep shape applied on note events.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy)]
pub struct FilterSweep {
    /// Cutoff the attack starts from, Hz.
    pub start_cutoff: f32,
    /// Requested attack peak, Hz (the envelope overshoots to twice this).
    pub peak_cutoff: f32,
    /// Attack duration, seconds.
    pub attack_time: f32,
    /// Cutoff the release falls back to, Hz.
    pub release_cutoff: f32,
    /// Release duration, seconds.
    pub release_time: f32,
}

impl Default for FilterSweep {
    fn default() -> Self {
        Self {
            start_cutoff: 200.0,
            peak_cutoff: 2000.0,
            attack_time: 0.01,
            release_cutoff: 200.0,
            release_time: 0.3,
        }
    }
}

pub struct LadderNode {
    filter: LadderFilter,
    sweep: FilterSweep,
}

impl LadderNode {
    pub fn new() -> Self {
        Self {
            filter: LadderFilter::new(),
            sweep: FilterSweep::default(),
        }
    }

    pub fn with_sweep(sweep: FilterSweep) -> Self {
        Self {
            filter: LadderFilter::new(),
            sweep,
        }
    }

    pub fn set_sweep(&mut self, sweep: FilterSweep) {
        self.sweep = sweep;
    }

    /// Direct access to the underlying filter for parameter control.
    pub fn filter_mut(&mut self) -> &mut LadderFilter {
        &mut self.filter
    }

    pub fn filter(&self) -> &LadderFilter {
        &self.filter
    }
}

impl GraphNode for LadderNode {
    fn render_block(&mut self, block: &mut [f32], ctx: &RenderCtx) {
        self.filter.advance_envelope(ctx.time as f32);
        self.filter.process_block(block);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.filter.trigger_attack(
            self.sweep.start_cutoff,
            self.sweep.peak_cutoff,
            self.sweep.attack_time,
        );
    }

    fn note_off(&mut self, _ctx: &RenderCtx) {
        self.filter
            .trigger_release(self.sweep.release_cutoff, self.sweep.release_time);
    }
}

impl Default for LadderNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Control messages accepted by [`SharedLadderNode`].
#[cfg(feature = "rtrb")]
pub enum LadderMessage {
    SetCutoff(f32),
    SetResonance(f32),
    SetEnvelopeActive(bool),
    SetEnvelopeDecayTime(f32),
    SetEnvelopeSustainLevel(f32),
    TriggerAttack {
        start_cutoff: f32,
        peak_cutoff: f32,
        attack_time: f32,
    },
    TriggerRelease {
        target_cutoff: f32,
        release_time: f32,
    },
}

/// Control-thread side of a shared ladder filter: push-only, never blocks.
#[cfg(feature = "rtrb")]
pub struct LadderHandle {
    tx: rtrb::Producer<LadderMessage>,
}

/// Audio-thread side: owns the filter, applies queued control messages at
/// block boundaries so every parameter change lands sample-accurately at a
/// block edge.
#[cfg(feature = "rtrb")]
pub struct SharedLadderNode {
    filter: LadderFilter,
    rx: rtrb::Consumer<LadderMessage>,
}

#[cfg(feature = "rtrb")]
impl LadderHandle {
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        let _ = self.tx.push(LadderMessage::SetCutoff(cutoff_hz));
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        let _ = self.tx.push(LadderMessage::SetResonance(resonance));
    }

    pub fn set_envelope_active(&mut self, active: bool) {
        let _ = self.tx.push(LadderMessage::SetEnvelopeActive(active));
    }

    pub fn set_envelope_decay_time(&mut self, seconds: f32) {
        let _ = self.tx.push(LadderMessage::SetEnvelopeDecayTime(seconds));
    }

    pub fn set_envelope_sustain_level(&mut self, level: f32) {
        let _ = self.tx.push(LadderMessage::SetEnvelopeSustainLevel(level));
    }

    pub fn trigger_attack(&mut self, start_cutoff: f32, peak_cutoff: f32, attack_time: f32) {
        let _ = self.tx.push(LadderMessage::TriggerAttack {
            start_cutoff,
            peak_cutoff,
            attack_time,
        });
    }

    pub fn trigger_release(&mut self, target_cutoff: f32, release_time: f32) {
        let _ = self.tx.push(LadderMessage::TriggerRelease {
            target_cutoff,
            release_time,
        });
    }
}

#[cfg(feature = "rtrb")]
const CONTROL_QUEUE_SIZE: usize = 64;

#[cfg(feature = "rtrb")]
impl SharedLadderNode {
    pub fn new() -> (Self, LadderHandle) {
        let (tx, rx) = rtrb::RingBuffer::<LadderMessage>::new(CONTROL_QUEUE_SIZE);

        let handle = LadderHandle { tx };
        let node = Self {
            filter: LadderFilter::new(),
            rx,
        };

        (node, handle)
    }

    fn apply(&mut self, msg: LadderMessage) {
        match msg {
            LadderMessage::SetCutoff(hz) => self.filter.set_cutoff(hz),
            LadderMessage::SetResonance(r) => self.filter.set_resonance(r),
            LadderMessage::SetEnvelopeActive(active) => self.filter.set_envelope_active(active),
            LadderMessage::SetEnvelopeDecayTime(s) => self.filter.set_envelope_decay_time(s),
            LadderMessage::SetEnvelopeSustainLevel(l) => {
                self.filter.set_envelope_sustain_level(l)
            }
            LadderMessage::TriggerAttack {
                start_cutoff,
                peak_cutoff,
                attack_time,
            } => self.filter.trigger_attack(start_cutoff, peak_cutoff, attack_time),
            LadderMessage::TriggerRelease {
                target_cutoff,
                release_time,
            } => self.filter.trigger_release(target_cutoff, release_time),
        }
    }

    pub fn filter(&self) -> &LadderFilter {
        &self.filter
    }
}

#[cfg(feature = "rtrb")]
impl GraphNode for SharedLadderNode {
    fn render_block(&mut self, block: &mut [f32], ctx: &RenderCtx) {
        while let Ok(msg) = self.rx.pop() {
            self.apply(msg);
        }

        self.filter.advance_envelope(ctx.time as f32);
        self.filter.process_block(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::EnvelopePhase;
    use crate::BLOCK_SIZE;

    #[test]
    fn test_note_on_starts_attack() {
        let mut node = LadderNode::new();
        let ctx = RenderCtx::at(0.0);

        node.note_on(&ctx);
        assert_eq!(node.filter().envelope_phase(), EnvelopePhase::Attack);
        assert!(node.filter().envelope_active());
    }

    #[test]
    fn test_note_off_starts_release() {
        let mut node = LadderNode::new();
        let ctx = RenderCtx::at(0.0);

        node.note_on(&ctx);
        node.note_off(&ctx);
        assert_eq!(node.filter().envelope_phase(), EnvelopePhase::Release);
    }

    #[test]
    fn test_render_advances_envelope_from_ctx_time() {
        let sweep = FilterSweep {
            start_cutoff: 200.0,
            peak_cutoff: 2000.0,
            attack_time: 0.1,
            ..FilterSweep::default()
        };
        let mut node = LadderNode::with_sweep(sweep);

        node.note_on(&RenderCtx::at(0.0));
        let mut block = [0.0f32; BLOCK_SIZE];
        node.render_block(&mut block, &RenderCtx::at(0.05));

        let target = node.filter().target_cutoff_hz();
        assert!(
            (target - 2100.0).abs() < 1.0,
            "envelope should have advanced to mid-attack, target={}",
            target
        );
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn test_shared_node_applies_messages_at_block_start() {
        let (mut node, mut handle) = SharedLadderNode::new();

        handle.set_cutoff(5000.0);
        handle.set_resonance(0.7);

        let mut block = [0.0f32; BLOCK_SIZE];
        node.render_block(&mut block, &RenderCtx::at(0.0));

        assert_eq!(node.filter().target_cutoff_hz(), 5000.0);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn test_shared_node_trigger_round_trip() {
        let (mut node, mut handle) = SharedLadderNode::new();

        handle.trigger_attack(200.0, 2000.0, 0.1);
        let mut block = [0.0f32; BLOCK_SIZE];
        node.render_block(&mut block, &RenderCtx::at(0.0));

        assert!(node.filter().envelope_active());
        assert_eq!(node.filter().envelope_phase(), EnvelopePhase::Attack);
    }
}
