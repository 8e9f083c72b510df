//! Handler implementations

pub mod stream;
pub mod target;

pub use stream::StreamHandler;
pub use target::{CaptureStream, TargetStream};

pub use crate::core::Handler;
