//! Reference grammars built on [`Step`](crate::Step).
pub mod length_prefixed;
pub mod lines;
pub mod primitives;
pub mod raw;
pub mod utils;

pub use length_prefixed::{Frame, LengthPrefixed};
pub use lines::{Line, Lines};
pub use raw::Drain;
