//! Block-rendering nodes wrapping the low-level filter primitives.
//!
//! Graph nodes add the ergonomics a realtime host needs: note events mapped
//! onto envelope triggers, block-based in-place rendering against a host
//! clock, and a lock-free control path so a UI thread can move parameters
//! without touching the audio thread's state directly.

/// Ladder filter node and its cross-thread control handle.
pub mod filter;
/// Core trait and render context shared by all graph nodes.
pub mod node;

pub use filter::LadderNode;
pub use node::{GraphNode, RenderCtx};
