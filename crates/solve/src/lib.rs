pub mod delay;
pub mod dump;
pub mod engine;
pub mod eval;
pub mod pipeline;
pub mod submit;

pub use delay::DelayGate;
pub use engine::BoaEngine;
pub use pipeline::solve;
