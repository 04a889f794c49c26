use crate::storage::Encoding;

/// 64 KiB, large enough for most line or record oriented grammars.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Options recognized by [`BufferedSource`](crate::BufferedSource).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Size of the bounded buffer. It bounds the largest unit a step function can decode at
    /// once.
    pub buffer_capacity: usize,
    /// Encoding used by the buffer's decoding helpers.
    pub text_encoding: Encoding,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            text_encoding: Encoding::Utf8,
        }
    }
}

impl Config {
    pub fn with_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }

    pub fn with_encoding(mut self, text_encoding: Encoding) -> Self {
        self.text_encoding = text_encoding;
        self
    }
}
