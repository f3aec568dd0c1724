//! Size/position grammar
//!
//! The shared grammar for two-axis values (background position/size):
//! exactly two whitespace-separated tokens, each an independently valid
//! single-axis value: optional sign, decimal digits, optional fraction,
//! and a case-insensitive `px` / `rem` / `%` unit. No other units, no
//! unitless numbers, no third token. The predicate is pure and is reused
//! by editor input validation and by the mutation engine when it accepts
//! exact pair values.

use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, multispace0, multispace1, one_of},
    combinator::{eof, map, opt, recognize},
    sequence::{delimited, pair, preceded, separated_pair, tuple},
    Finish, IResult,
};
use thiserror::Error;

use maquette_core::{AxisPair, Dim, Unit};

/// Error for a string that does not match the two-axis grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid two-axis value {input:?}")]
pub struct GrammarError {
    /// The rejected input
    pub input: String,
}

fn unit(input: &str) -> IResult<&str, Unit> {
    alt((
        map(tag_no_case("px"), |_| Unit::Px),
        map(tag_no_case("rem"), |_| Unit::Rem),
        map(tag_no_case("%"), |_| Unit::Percent),
    ))(input)
}

/// `[+-]? digits [. digits]?`, no exponents, no bare `.5`
fn number(input: &str) -> IResult<&str, f32> {
    let (rest, text) = recognize(tuple((
        opt(one_of("+-")),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)?;
    let value = text.parse().map_err(|_| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Float))
    })?;
    Ok((rest, value))
}

/// One axis: a number immediately followed by its unit
fn axis(input: &str) -> IResult<&str, Dim> {
    map(pair(number, unit), |(value, unit)| Dim::new(value, unit))(input)
}

fn axis_pair(input: &str) -> IResult<&str, AxisPair> {
    let (rest, (x, y)) = delimited(
        multispace0,
        separated_pair(axis, multispace1, axis),
        preceded(multispace0, eof),
    )(input)?;
    Ok((rest, AxisPair::new(x, y)))
}

/// Parse a two-axis value string, e.g. `"10px 20%"`
pub fn parse_axis_pair(input: &str) -> Result<AxisPair, GrammarError> {
    axis_pair(input)
        .finish()
        .map(|(_, pair)| pair)
        .map_err(|_| GrammarError {
            input: input.to_string(),
        })
}

/// Pure validity predicate over the same grammar
pub fn is_valid_axis_pair(input: &str) -> bool {
    parse_axis_pair(input).is_ok()
}

/// Validate an already-typed pair by round-tripping it through the
/// grammar, so typed and string inputs pass exactly one predicate
pub fn is_valid_pair(pair: &AxisPair) -> bool {
    pair.x.value.is_finite() && pair.y.value.is_finite() && is_valid_axis_pair(&pair.to_string())
}
