use std::fmt::Write;

use log::debug;

use crate::storage::{AsBuffer, Buffer};

fn to_utf8(buf: &[u8]) -> &str {
    match std::str::from_utf8(buf) {
        Ok(str) => str,
        Err(_) => "[ERROR::UTF8]",
    }
}

impl<T: AsBuffer> Buffer<T> {
    pub fn debug(&self, pad: &str, result: &mut String) -> Result<(), std::fmt::Error> {
        result.write_fmt(format_args!("Buffer {{"))?;
        result.write_fmt(format_args!("\n{pad}  start: {}", self.position()))?;
        result.write_fmt(format_args!(",\n{pad}  end: {}", self.limit()))?;
        result.write_fmt(format_args!(",\n{pad}  capacity: {}", self.capacity()))?;
        result.write_fmt(format_args!(",\n{pad}  encoding: {}", self.encoding()))?;
        result.write_fmt(format_args!(",\n{pad}  meter: {}", self.meter(20)))?;
        result.write_fmt(format_args!(",\n{pad}  view: {:?}", to_utf8(self.data())))?;
        result.write_fmt(format_args!(",\n{pad}}}"))?;
        Ok(())
    }
}

pub fn debug_buffer<T: AsBuffer>(buffer: &Buffer<T>) {
    let mut result = String::new();
    match buffer.debug("", &mut result) {
        Ok(()) => debug!("{result}"),
        Err(error) => debug!("{error:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::storage::Buffer;

    #[test]
    fn dump_lists_cursors_and_view() {
        let mut buffer = Buffer::with_capacity(16);
        buffer.write_all(b"abc\xff").expect("write");
        buffer.consume(1);
        let mut result = String::new();
        buffer.debug("", &mut result).expect("fmt");
        assert!(result.contains("start: 1"));
        assert!(result.contains("end: 4"));
        assert!(result.contains("[ERROR::UTF8]"));

        buffer.consume(3);
        let mut result = String::new();
        buffer.debug("", &mut result).expect("fmt");
        assert!(result.contains("view: \"\""));
    }
}
