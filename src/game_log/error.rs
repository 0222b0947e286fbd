use thiserror::Error;

/// Hard failures for a line whose event tag is recognized but whose body does
/// not match the grammar for that tag.
///
/// Lines that are not event lines at all, or carry a tag we do not model, are
/// not errors: the dispatcher returns `Ok(None)` for those.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed timestamp '{0}'")]
    MalformedTimestamp(String),

    #[error("delimiter '{0}' not found")]
    DelimiterNotFound(String),

    #[error("malformed vector '{0}'")]
    MalformedVector(String),

    #[error("malformed integer '{0}'")]
    MalformedInteger(String),
}

pub type ParseResult<T> = Result<T, ParseError>;
