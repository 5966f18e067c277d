//! Audible demo: a sawtooth drone plucked by the cutoff envelope.
//!
//! Renders a few seconds offline through `LadderNode`, then streams the
//! result to the default output device.
//!
//! Run with: cargo run --example filter_sweep --features cpal-demo

#[cfg(feature = "cpal-demo")]
fn main() {
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use ladder_dsp::graph::{GraphNode, LadderNode, RenderCtx};
    use ladder_dsp::{BLOCK_SIZE, SAMPLE_RATE};

    let seconds = 4.0f32;
    let total_blocks = (seconds * SAMPLE_RATE) as usize / BLOCK_SIZE;
    let retrigger_every = total_blocks / 4;

    let mut node = LadderNode::new();
    node.filter_mut().set_resonance(0.85);
    node.filter_mut().set_envelope_decay_time(0.6);
    node.filter_mut().set_envelope_sustain_level(0.3);

    // Render offline block by block under a simulated host clock
    let block_seconds = BLOCK_SIZE as f64 / SAMPLE_RATE as f64;
    let mut rendered: Vec<f32> = Vec::with_capacity(total_blocks * BLOCK_SIZE);
    let mut phase = 0.0f32;

    node.note_on(&RenderCtx::at(0.0));
    for block_index in 0..total_blocks {
        let ctx = RenderCtx::at(block_index as f64 * block_seconds);
        if block_index > 0 && block_index % retrigger_every == 0 {
            node.note_on(&ctx);
        }

        let mut block = [0.0f32; BLOCK_SIZE];
        for sample in block.iter_mut() {
            // Naive sawtooth at 110 Hz; the filter removes the aliased fizz
            phase += 110.0 / SAMPLE_RATE;
            if phase >= 1.0 {
                phase -= 1.0;
            }
            *sample = (phase * 2.0 - 1.0) * 0.5;
        }

        node.render_block(&mut block, &ctx);
        rendered.extend_from_slice(&block);
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .expect("no audio output device available");
    let config = cpal::StreamConfig {
        channels: 2,
        sample_rate: cpal::SampleRate(SAMPLE_RATE as u32),
        buffer_size: cpal::BufferSize::Default,
    };

    let mut position = 0usize;
    let stream = device
        .build_output_stream(
            &config,
            move |data: &mut [f32], _| {
                for frame in data.chunks_mut(2) {
                    let sample = rendered.get(position).copied().unwrap_or(0.0);
                    position += 1;
                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                }
            },
            |err| eprintln!("stream error: {err}"),
            None,
        )
        .expect("failed to build output stream");

    stream.play().expect("failed to start stream");
    std::thread::sleep(std::time::Duration::from_secs_f32(seconds + 0.5));
}

#[cfg(not(feature = "cpal-demo"))]
fn main() {
    eprintln!("Build with --features cpal-demo to run this demo.");
}
