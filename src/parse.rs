use std::str::FromStr;

use nom::character::complete::{char as char_parser, digit0, one_of};
use nom::combinator::opt;
use nom::sequence::preceded;
use nom::{branch::alt, IResult};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::RashodyError;

/// Number of decimal places an amount keeps once accepted.
pub const AMOUNT_SCALE: u32 = 2;

fn separator_parser(input: &str) -> IResult<&str, ()> {
    alt((char_parser(','), char_parser('.')))(input).map(|(input, _)| (input, ()))
}

fn sign_parser(input: &str) -> IResult<&str, bool> {
    opt(one_of("+-"))(input).map(|(input, sign)| (input, sign == Some('-')))
}

fn decimals_parser(input: &str) -> IResult<&str, &str> {
    preceded(separator_parser, digit0)(input)
}

fn value_parser(input: &str) -> IResult<&str, (bool, &str, &str)> {
    let (input, negative) = sign_parser(input)?;
    let (input, whole) = digit0(input)?;
    let (input, decimals) = opt(decimals_parser)(input)?;
    Ok((input, (negative, whole, decimals.unwrap_or_default())))
}

/// Rounds an amount to two decimal places, halves away from zero.
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses user input such as `"1 234,5"` or `"199.99"` into a rounded amount.
///
/// Whitespace anywhere in the input is ignored and both `,` and `.` are
/// accepted as the decimal separator. The sign is kept so callers can
/// reject non-positive values themselves.
pub fn parse_amount(s: &str) -> Result<Decimal, RashodyError> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let (negative, whole, decimals) = match value_parser(&compact) {
        Ok(("", parts)) => parts,
        Ok((rest, _)) => {
            return Err(RashodyError::Parse(format!(
                "unexpected characters \"{rest}\""
            )))
        }
        Err(e) => return Err(RashodyError::Parse(e.to_string())),
    };
    if whole.is_empty() && decimals.is_empty() {
        return Err(RashodyError::Parse(format!("\"{s}\" contains no digits")));
    }

    let literal = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if whole.is_empty() { "0" } else { whole },
        if decimals.is_empty() { "0" } else { decimals },
    );
    let value = Decimal::from_str(&literal)
        .map_err(|e| RashodyError::Parse(format!("\"{s}\": {e}")))?;
    Ok(round_amount(value))
}
