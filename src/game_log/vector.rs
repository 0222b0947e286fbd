use super::entry::Vec3;
use super::error::{ParseError, ParseResult};

const VELOCITY_SEPARATOR: &str = " vel ";

/// Parses `x: 1, y: 2, z: 3` optionally followed by ` vel x: 4, y: 5, z: 6`.
/// The velocity is zero when the `vel` half is absent.
pub fn parse_position_and_velocity(text: &str) -> ParseResult<(Vec3, Vec3)> {
    match text.split_once(VELOCITY_SEPARATOR) {
        Some((position_text, velocity_text)) => Ok((
            parse_components(position_text, text)?,
            parse_components(velocity_text, text)?,
        )),
        None => Ok((parse_components(text, text)?, Vec3::ZERO)),
    }
}

fn parse_components(half: &str, whole: &str) -> ParseResult<Vec3> {
    let malformed = || ParseError::MalformedVector(whole.to_string());

    let components = half.split(',').collect::<Vec<&str>>();
    if components.len() < 3 {
        return Err(malformed());
    }

    let mut values = [0.0_f64; 3];
    for (slot, component) in values.iter_mut().zip(components.iter()) {
        let (_, number) = component.split_once(':').ok_or_else(malformed)?;
        let number = number.trim();
        if !is_plain_decimal(number) {
            return Err(malformed());
        }
        *slot = number.parse::<f64>().map_err(|_| malformed())?;
    }

    Ok(Vec3::new(values[0], values[1], values[2]))
}

/// Optional sign, digits, at most one `.`. Exponents, `NaN` and `inf` never
/// appear in the log and are rejected even though `f64` would accept them.
fn is_plain_decimal(token: &str) -> bool {
    let digits = token.strip_prefix(['-', '+']).unwrap_or(token);
    let mut seen_dot = false;
    let mut seen_digit = false;

    for byte in digits.bytes() {
        match byte {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }

    seen_digit
}
