//! Input domain: polled button state, press buffering and sampling.

mod buffer;
mod frame;
mod sampler;

pub use buffer::InputBuffer;
pub use frame::{Button, InputFrame, RawButtons};
pub use sampler::InputSampler;
