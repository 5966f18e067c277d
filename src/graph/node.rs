/// Context passed to graph nodes during rendering.
///
/// Carries the host's monotonic playback clock in seconds. Time-driven
/// modulation (the cutoff envelope) advances against this clock once per
/// block, so the host must hand in a nondecreasing value on every call.
pub struct RenderCtx {
    pub time: f64,
}

impl RenderCtx {
    /// Create a context for the block starting at `time` seconds.
    pub fn at(time: f64) -> Self {
        Self { time }
    }
}

/// Core trait for audio processing graph nodes.
///
/// Nodes render audio in place, one fixed-size block at a time, and respond
/// to musical events.
pub trait GraphNode: Send {
    fn render_block(&mut self, block: &mut [f32], ctx: &RenderCtx);

    /// Triggered when a note starts.
    ///
    /// Default implementation does nothing (passthrough nodes).
    fn note_on(&mut self, _ctx: &RenderCtx) {
        // Default: do nothing
    }

    /// Triggered when a note is released.
    ///
    /// Default implementation does nothing (passthrough nodes).
    fn note_off(&mut self, _ctx: &RenderCtx) {
        // Default: do nothing
    }

    /// Check if this node is still shaping sound.
    ///
    /// Used by hosts to know when a node's modulation has gone quiet.
    fn is_active(&self) -> bool {
        true
    }
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, block: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(block, ctx)
    }

    fn note_on(&mut self, ctx: &RenderCtx) {
        (**self).note_on(ctx)
    }

    fn note_off(&mut self, ctx: &RenderCtx) {
        (**self).note_off(ctx)
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}
