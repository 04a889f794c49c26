use std::io::Write;

use crate::{
    error::StepError,
    step::Step,
    storage::{AsBuffer, Buffer},
};

/// Forwards every readable byte to a writer, e.g. to tee a stream while it is being read.
#[derive(Debug, Clone, Copy, Default)]
pub struct Drain;

impl<T, W> Step<T, (), W> for Drain
where
    T: AsBuffer,
    W: Write,
{
    fn step(&mut self, buf: &mut Buffer<T>, context: (), output: &mut W) -> Result<(), StepError> {
        output.write_all(buf.data())?;
        buf.consume(buf.remaining());
        Ok(context)
    }

    fn finish(&mut self, _: &mut Buffer<T>, _: (), output: &mut W) -> Result<(), StepError> {
        output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, ErrorKind};

    use super::*;

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn forwards_everything() {
        let mut buf = Buffer::with_capacity(8);
        buf.write_all(b"abc").expect("write");
        let mut out = Vec::new();
        Drain.step(&mut buf, (), &mut out).expect("step");
        assert_eq!(out, b"abc");
        assert!(buf.is_empty());
    }

    #[test]
    fn sink_errors_surface() {
        let mut buf = Buffer::with_capacity(8);
        buf.write_all(b"abc").expect("write");
        let error = Drain.step(&mut buf, (), &mut Broken).unwrap_err();
        assert!(matches!(error, StepError::Sink(_)));
        assert_eq!(buf.data(), b"abc");
    }
}
