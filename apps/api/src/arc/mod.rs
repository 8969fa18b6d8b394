// Arc text core: split → measure → lay out on a circle → hand to a renderer.
// Everything except `handlers` and `registry` is synchronous and host-agnostic.

pub mod diagnostics;
pub mod engine;
pub mod handlers;
pub mod ops;
pub mod registry;
pub mod render;
pub mod resize;
pub mod session;
pub mod splitter;
