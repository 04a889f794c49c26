pub mod buffer;
pub mod debug;
pub mod encoding;

pub use buffer::{trim_bounds, AsBuffer, Buffer, Checkpoint};
pub use debug::debug_buffer;
pub use encoding::{Encoding, UnknownEncoding};
