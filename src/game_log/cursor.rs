use super::error::{ParseError, ParseResult};

/// Forward-only scanner over one line body.
///
/// Every successful extraction moves `position` forward; nothing ever scans
/// to the left of it.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> &'a str {
        &self.source[self.position..]
    }

    /// Returns the text between `left` and the following `right`, leaving the
    /// cursor just past `right`.
    pub fn take_between(&mut self, left: &str, right: &str) -> ParseResult<&'a str> {
        let (start, end) = self.locate(left, right)?;
        self.position = end + right.len();
        Ok(&self.source[start..end])
    }

    /// Same search as [`take_between`](Self::take_between) but the cursor
    /// stops on `right` so the caller can scan from that delimiter again.
    pub fn peek_between(&mut self, left: &str, right: &str) -> ParseResult<&'a str> {
        let (start, end) = self.locate(left, right)?;
        self.position = end;
        Ok(&self.source[start..end])
    }

    /// Moves the cursor just past the next occurrence of `marker`.
    pub fn skip_past(&mut self, marker: &str) -> ParseResult<()> {
        let found = self
            .find_from(self.position, marker)
            .ok_or_else(|| ParseError::DelimiterNotFound(marker.to_string()))?;
        self.position = found + marker.len();
        Ok(())
    }

    fn locate(&self, left: &str, right: &str) -> ParseResult<(usize, usize)> {
        let start = self
            .find_from(self.position, left)
            .ok_or_else(|| ParseError::DelimiterNotFound(left.to_string()))?
            + left.len();
        let end = self
            .find_from(start, right)
            .ok_or_else(|| ParseError::DelimiterNotFound(right.to_string()))?;
        Ok((start, end))
    }

    fn find_from(&self, from: usize, needle: &str) -> Option<usize> {
        self.source[from..].find(needle).map(|offset| from + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::LineCursor;
    use crate::game_log::ParseError;

    #[test]
    fn take_between_advances_past_right_marker() {
        let mut cursor = LineCursor::new("Vehicle 'Cutter' [42] in zone 'stanton'");

        assert_eq!(cursor.take_between("Vehicle '", "'").unwrap(), "Cutter");
        assert_eq!(cursor.remaining(), " [42] in zone 'stanton'");
        assert_eq!(cursor.take_between("[", "]").unwrap(), "42");
        assert_eq!(cursor.take_between("in zone '", "'").unwrap(), "stanton");
        assert_eq!(cursor.remaining(), "");
    }

    #[test]
    fn peek_between_stops_on_right_marker() {
        let mut cursor = LineCursor::new("direction x: 1 [Team][Actor]");

        assert_eq!(cursor.peek_between("direction ", "[").unwrap(), "x: 1 ");
        assert_eq!(cursor.remaining(), "[Team][Actor]");
        assert_eq!(cursor.take_between("[", "]").unwrap(), "Team");
        assert_eq!(cursor.take_between("[", "]").unwrap(), "Actor");
    }

    #[test]
    fn missing_markers_report_which_delimiter_failed() {
        let mut cursor = LineCursor::new("killed by 'Someone");

        assert_eq!(
            cursor.take_between("using '", "'"),
            Err(ParseError::DelimiterNotFound("using '".to_string()))
        );
        assert_eq!(
            cursor.take_between("killed by '", "'"),
            Err(ParseError::DelimiterNotFound("'".to_string()))
        );
        assert_eq!(cursor.position(), 0, "failed scans leave the cursor in place");
    }

    #[test]
    fn cursor_never_revisits_consumed_text() {
        let mut cursor = LineCursor::new("[a] [b] [c]");
        let mut last_position = cursor.position();

        for expected in ["a", "b", "c"] {
            assert_eq!(cursor.take_between("[", "]").unwrap(), expected);
            assert!(cursor.position() >= last_position);
            last_position = cursor.position();
        }

        assert!(cursor.take_between("[", "]").is_err());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let mut cursor = LineCursor::new("KILLED BY 'x'");
        assert!(cursor.take_between("killed by '", "'").is_err());
    }
}
