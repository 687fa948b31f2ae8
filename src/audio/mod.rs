pub mod convert;
pub mod frame;

pub use convert::stereo_to_mono;
pub use frame::{AudioFrame, Transcript};
