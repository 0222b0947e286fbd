use chrono::{DateTime, NaiveDateTime, Utc};

use super::error::{ParseError, ParseResult};

const TIMESTAMP_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// `YYYY-MM-DDThh:mm:ss.sssZ`, with the separator expected at each index.
const TIMESTAMP_SHAPE: &[u8; 24] = b"0000-00-00T00:00:00.000Z";

/// Parses the token between the leading `<` and `>` of a log line as a UTC
/// instant with millisecond precision.
pub fn parse_log_timestamp(token: &str) -> ParseResult<DateTime<Utc>> {
    if !matches_timestamp_shape(token) {
        return Err(ParseError::MalformedTimestamp(token.to_string()));
    }

    NaiveDateTime::parse_from_str(token, TIMESTAMP_LAYOUT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ParseError::MalformedTimestamp(token.to_string()))
}

fn matches_timestamp_shape(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.len() != TIMESTAMP_SHAPE.len() {
        return false;
    }

    bytes
        .iter()
        .zip(TIMESTAMP_SHAPE.iter())
        .all(|(actual, expected)| match expected {
            b'0' => actual.is_ascii_digit(),
            separator => actual == separator,
        })
}
