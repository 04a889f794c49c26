//! Newline terminated text records with `#` comments.

use crate::{
    error::StepError,
    step::Step,
    storage::{AsBuffer, Buffer},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Line {
    #[default]
    Start,
    /// Inside a comment, skipping up to the next newline.
    Comment,
}

/// Pushes every non blank line, trimmed, to the output. Lines starting with `#` are comments
/// and may be longer than the buffer: they are skipped as they stream by.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lines;

impl<T, O> Step<T, Line, O> for Lines
where
    T: AsBuffer,
    O: Extend<String>,
{
    fn step(
        &mut self,
        buf: &mut Buffer<T>,
        mut line: Line,
        output: &mut O,
    ) -> Result<Line, StepError> {
        loop {
            line = match line {
                Line::Start => match buf.peek_u8() {
                    Err(_) => return Ok(line),
                    Ok(b'#') => {
                        buf.consume(1);
                        Line::Comment
                    }
                    Ok(_) => {
                        let start = buf.position();
                        match buf.attempt(|buf| Ok(buf.skip_until(b'\n')?))? {
                            Some(end) => {
                                let text = buf.decode_trimmed(start, end);
                                if !text.is_empty() {
                                    output.extend(Some(text));
                                }
                                Line::Start
                            }
                            None => return Ok(line),
                        }
                    }
                },
                Line::Comment => match buf.skip_until(b'\n') {
                    Ok(_) => Line::Start,
                    Err(_) => {
                        buf.consume(buf.remaining());
                        return Ok(line);
                    }
                },
            };
        }
    }

    fn finish(&mut self, buf: &mut Buffer<T>, line: Line, output: &mut O) -> Result<(), StepError> {
        if line == Line::Start {
            let text = buf.decode_trimmed(buf.position(), buf.limit());
            if !text.is_empty() {
                output.extend(Some(text));
            }
        }
        buf.consume(buf.remaining());
        Ok(())
    }
}
