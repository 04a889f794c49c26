use nom::{
    bytes::streaming::tag, character::streaming::digit1, combinator::map_opt,
    sequence::terminated, IResult,
};

use crate::protocol::utils::parse_decimal;

/// parse a decimal number, failing on overflow
///
/// example: `1024`
pub fn decimal(i: &[u8]) -> IResult<&[u8], usize> {
    map_opt(digit1, parse_decimal)(i)
}

/// parse the length prefix of a frame, including the terminating colon
///
/// example: `5:`
pub fn length_prefix(i: &[u8]) -> IResult<&[u8], usize> {
    terminated(decimal, tag(":"))(i)
}
