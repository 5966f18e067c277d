//! Whole-pipeline regression tests: smoothing, coefficient clamping,
//! envelope modulation and the ladder recursion working together the way a
//! realtime host would drive them.

use ladder_dsp::dsp::{EnvelopePhase, LadderFilter};
use ladder_dsp::graph::{GraphNode, LadderNode, RenderCtx};
use ladder_dsp::{BLOCK_SIZE, SAMPLE_RATE};

use std::f32::consts::TAU;

fn sine_block(frequency: f32, block_index: usize) -> [f32; BLOCK_SIZE] {
    let mut block = [0.0f32; BLOCK_SIZE];
    for (i, sample) in block.iter_mut().enumerate() {
        let n = (block_index * BLOCK_SIZE + i) as f32;
        *sample = (TAU * frequency * n / SAMPLE_RATE).sin();
    }
    block
}

/// Peak amplitude over the last half of `blocks` rendered blocks.
fn settled_peak(filter: &mut LadderFilter, frequency: f32, blocks: usize) -> f32 {
    let mut peak = 0.0f32;
    for b in 0..blocks {
        let mut block = sine_block(frequency, b);
        filter.process_block(&mut block);
        if b >= blocks / 2 {
            for &s in &block {
                peak = peak.max(s.abs());
            }
        }
    }
    peak
}

fn settled_filter(cutoff: f32, resonance: f32) -> LadderFilter {
    let mut filter = LadderFilter::new();
    filter.set_cutoff(cutoff);
    filter.set_resonance(resonance);
    let mut silence = [0.0f32; BLOCK_SIZE];
    for _ in 0..100 {
        filter.process_block(&mut silence);
    }
    filter
}

#[test]
fn silence_in_silence_out_across_many_blocks() {
    let mut filter = LadderFilter::new();
    for _ in 0..64 {
        let mut block = [0.0f32; BLOCK_SIZE];
        filter.process_block(&mut block);
        assert!(block.iter().all(|s| s.abs() < 1e-9));
    }
}

#[test]
fn two_fresh_instances_are_sample_identical() {
    let mut a = LadderFilter::new();
    let mut b = LadderFilter::new();

    for block_index in 0..16 {
        let mut block_a = sine_block(440.0, block_index);
        let mut block_b = sine_block(440.0, block_index);
        a.process_block(&mut block_a);
        b.process_block(&mut block_b);
        assert_eq!(block_a.to_vec(), block_b.to_vec());
    }
}

#[test]
fn lowpass_attenuates_tenfold_cutoff_tone() {
    let cutoff = 1000.0;

    let mut filter = settled_filter(cutoff, 0.0);
    let low_peak = settled_peak(&mut filter, cutoff * 0.1, 40);

    let mut filter = settled_filter(cutoff, 0.0);
    let high_peak = settled_peak(&mut filter, cutoff * 10.0, 40);

    assert!(
        high_peak < low_peak * 0.5,
        "four-pole lowpass should attenuate 10x-cutoff tone: high={}, low={}",
        high_peak,
        low_peak
    );
}

#[test]
fn absurd_cutoff_requests_stay_stable() {
    // Requests far beyond Nyquist are clamped internally; output must stay
    // finite and bounded rather than blowing up
    let mut filter = settled_filter(10.0 * SAMPLE_RATE, 0.5);

    for block_index in 0..50 {
        let mut block = sine_block(880.0, block_index);
        filter.process_block(&mut block);
        assert!(block.iter().all(|s| s.is_finite() && s.abs() < 100.0));
    }
}

#[test]
fn envelope_lifecycle_tracks_through_all_phases() {
    let manual = 1000.0;
    let mut filter = LadderFilter::new();
    filter.set_cutoff(manual);
    filter.set_envelope_decay_time(0.2);
    filter.set_envelope_sustain_level(0.5);
    filter.trigger_attack(200.0, 2000.0, 0.1);

    // Attack: envelope cutoff rises monotonically from 200 toward 4000
    let mut prev = 0.0f32;
    let mut t = 0.0f32;
    while t < 0.1 {
        filter.advance_envelope(t);
        let value = filter.envelope_cutoff_hz();
        assert!(value >= prev, "attack must rise monotonically");
        assert!(value <= 4000.0);
        prev = value;
        t += 0.0029; // one block at 44.1kHz/128
    }

    filter.advance_envelope(0.1);
    assert_eq!(filter.envelope_phase(), EnvelopePhase::Decay);
    assert_eq!(filter.envelope_cutoff_hz(), 4000.0);

    // Decay: falls toward peak + (manual - peak) * (1 - sustain) = 2500
    filter.advance_envelope(0.2);
    let mid_decay = filter.envelope_cutoff_hz();
    assert!(mid_decay < 4000.0 && mid_decay > 2500.0);

    filter.advance_envelope(0.3);
    assert_eq!(filter.envelope_phase(), EnvelopePhase::Held);
    assert_eq!(filter.envelope_cutoff_hz(), 2500.0);

    // Held: frozen no matter how far time advances
    filter.advance_envelope(1.0);
    filter.advance_envelope(60.0);
    assert_eq!(filter.envelope_cutoff_hz(), 2500.0);
    assert_eq!(filter.envelope_phase(), EnvelopePhase::Held);
}

#[test]
fn deactivating_envelope_snaps_back_within_smoothing_reach() {
    let mut filter = LadderFilter::new();
    filter.set_cutoff(600.0);
    filter.trigger_attack(200.0, 8000.0, 0.05);
    filter.advance_envelope(0.04);

    filter.set_envelope_active(false);
    assert_eq!(filter.target_cutoff_hz(), 600.0);

    // One block of smoothing moves the live value toward the manual cutoff
    let before = filter.cutoff_hz();
    let mut block = [0.0f32; BLOCK_SIZE];
    filter.process_block(&mut block);
    let after = filter.cutoff_hz();
    assert!(
        (after - 600.0).abs() < (before - 600.0).abs(),
        "live cutoff should move toward manual after deactivation"
    );
}

#[test]
fn step_change_converges_geometrically_without_overshoot() {
    let mut filter = LadderFilter::new();
    filter.set_cutoff(4000.0);

    let mut block = [0.0f32; BLOCK_SIZE];
    let mut prev = filter.cutoff_hz();
    let mut prev_gap = 4000.0 - prev;
    for _ in 0..300 {
        filter.process_block(&mut block);
        let live = filter.cutoff_hz();
        assert!(live >= prev, "approach must be monotonic");
        assert!(live <= 4000.0, "approach must not overshoot");

        let gap = 4000.0 - live;
        assert!(gap <= prev_gap, "gap to target must shrink");
        prev = live;
        prev_gap = gap;
    }
    assert!((prev - 4000.0).abs() < 1.0);
}

#[test]
fn node_renders_audible_pluck_under_host_clock() {
    // Drive the graph node the way a host callback would: monotonic block
    // times, note events, audio through the filter
    let mut node = LadderNode::new();
    let block_seconds = BLOCK_SIZE as f64 / SAMPLE_RATE as f64;

    node.note_on(&RenderCtx::at(0.0));

    let mut all_finite = true;
    let mut any_signal = false;
    for block_index in 0..200 {
        let mut block = sine_block(110.0, block_index);
        let ctx = RenderCtx::at(block_index as f64 * block_seconds);
        node.render_block(&mut block, &ctx);

        all_finite &= block.iter().all(|s| s.is_finite());
        any_signal |= block.iter().any(|s| s.abs() > 0.01);

        if block_index == 100 {
            node.note_off(&ctx);
        }
    }

    assert!(all_finite, "node output must stay finite");
    assert!(any_signal, "node should pass audible signal");
    assert!(node.filter().envelope_phase() != EnvelopePhase::Attack);
}
