use std::io::{self, Read};

use nom::error::ErrorKind;
use rstest::rstest;
use tamis::{
    protocol::{Frame, LengthPrefixed, Line, Lines},
    run, run_with, Buffer, Config, Error, Step, StepError,
};

/// Delivers at most `size` bytes per read.
struct Chunked<'a> {
    data: &'a [u8],
    size: usize,
}

impl Read for Chunked<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.size.min(buf.len()).min(self.data.len());
        buf[..len].copy_from_slice(&self.data[..len]);
        self.data = &self.data[len..];
        Ok(len)
    }
}

fn frames(input: &[u8], capacity: usize) -> Result<Vec<String>, Error> {
    let config = Config::default().with_capacity(capacity);
    run_with(input, &config, &mut LengthPrefixed, Frame::Length, Vec::new())
}

#[test]
fn empty_input_yields_nothing() {
    assert_eq!(frames(b"", 16).expect("run"), Vec::<String>::new());
    let lines: Vec<String> = run(&b""[..], &mut Lines, Line::Start, Vec::new()).expect("run");
    assert!(lines.is_empty());
}

#[test]
fn empty_frame_is_an_empty_string() {
    assert_eq!(frames(b"0:2:ok", 16).expect("run"), ["", "ok"]);
}

#[rstest]
#[case(b"5:hel", 2, 3)]
#[case(b"3:abc12", 5, 2)]
#[case(b"3:abc4", 5, 1)]
fn truncated_input_is_reported_at_the_end(
    #[case] input: &[u8],
    #[case] at: u64,
    #[case] left: usize,
) {
    match frames(input, 16).unwrap_err() {
        Error::Step {
            offset,
            source: StepError::Truncated { remaining },
        } => {
            assert_eq!(offset, at);
            assert_eq!(remaining, left);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn bad_length_is_a_syntax_error() {
    match frames(b"3:abcx:", 16).unwrap_err() {
        Error::Step {
            offset,
            source: StepError::Syntax { kind },
        } => {
            assert_eq!(offset, 5);
            assert_eq!(kind, ErrorKind::Digit);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn frame_larger_than_the_buffer_is_rejected_up_front() {
    match frames(b"100:abc", 16).unwrap_err() {
        Error::Step {
            offset,
            source: StepError::UnitTooLarge { needed, capacity },
        } => {
            assert_eq!(offset, 4);
            assert_eq!((needed, capacity), (100, 16));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn line_longer_than_the_buffer_starves_the_loop() {
    let source = Chunked {
        data: b"short\nthis line is too long\n",
        size: 3,
    };
    let config = Config::default().with_capacity(8);
    let mut lines: Vec<String> = Vec::new();
    // forwards into a borrowed accumulator so the records parsed before the failure survive
    let mut step = |buf: &mut Buffer<Box<[u8]>>, line: Line, out: &mut &mut Vec<String>| {
        Step::step(&mut Lines, buf, line, &mut **out)
    };
    let error = run_with(source, &config, &mut step, Line::Start, &mut lines).unwrap_err();
    assert!(matches!(
        error,
        Error::Capacity {
            capacity: 8,
            offset: 6
        }
    ));
    assert_eq!(lines, ["short"]);
}

#[test]
fn comment_longer_than_the_buffer_is_skipped() {
    let mut input = b"# ".to_vec();
    input.extend(std::iter::repeat(b'x').take(100));
    input.extend_from_slice(b"\nvalue\n");
    let source = Chunked {
        data: &input,
        size: 5,
    };
    let config = Config::default().with_capacity(8);
    let lines: Vec<String> =
        run_with(source, &config, &mut Lines, Line::Start, Vec::new()).expect("run");
    assert_eq!(lines, ["value"]);
}

#[test]
fn capacity_of_one_byte_still_drains() {
    let config = Config::default().with_capacity(1);
    let out = run_with(
        &b"abc"[..],
        &config,
        &mut tamis::protocol::Drain,
        (),
        Vec::new(),
    )
    .expect("run");
    assert_eq!(out, b"abc");
}

#[test]
fn zero_capacity_cannot_make_progress() {
    let config = Config::default().with_capacity(0);
    let error = run_with(&b"a"[..], &config, &mut Lines, Line::Start, Vec::<String>::new());
    assert!(matches!(error, Err(Error::Capacity { capacity: 0, offset: 0 })));
}

#[rstest]
#[case(1)]
#[case(3)]
#[case(8)]
fn last_line_filling_the_buffer_exactly_is_flushed(#[case] size: usize) {
    let source = Chunked {
        data: b"abcdefgh",
        size,
    };
    let config = Config::default().with_capacity(8);
    let lines: Vec<String> =
        run_with(source, &config, &mut Lines, Line::Start, Vec::new()).expect("run");
    assert_eq!(lines, ["abcdefgh"]);
}

#[test]
fn closure_step_sees_end_of_input_on_a_full_buffer() {
    // newline terminated records, an unterminated tail is left in the buffer
    let mut records =
        |buf: &mut Buffer<Box<[u8]>>, context: (), out: &mut Vec<String>| -> Result<(), StepError> {
            loop {
                let start = buf.position();
                match buf.attempt(|buf| Ok(buf.skip_until(b'\n')?))? {
                    Some(end) => out.push(buf.decode_text(start, end)),
                    None => return Ok(context),
                }
            }
        };
    let config = Config::default().with_capacity(8);

    let out = run_with(&b"ab\ncdefghij"[..], &config, &mut records, (), Vec::new()).expect("run");
    assert_eq!(out, ["ab"]);

    let error = run_with(&b"ab\ncdefghijk"[..], &config, &mut records, (), Vec::new()).unwrap_err();
    assert!(matches!(
        error,
        Error::Capacity {
            capacity: 8,
            offset: 3
        }
    ));
}

#[test]
fn zero_capacity_on_empty_input_is_not_an_error() {
    let config = Config::default().with_capacity(0);
    let lines: Vec<String> =
        run_with(&b""[..], &config, &mut Lines, Line::Start, Vec::new()).expect("run");
    assert!(lines.is_empty());
}
