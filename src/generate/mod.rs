//! Document generation: fresh synthesis and incremental patching

pub mod patch;
pub mod synth;

pub use patch::patch;
pub use synth::synthesize;
