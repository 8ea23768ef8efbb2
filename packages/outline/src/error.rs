use thiserror::Error;

pub type OutlineResult<T> = Result<T, OutlineError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutlineError {
    #[error("Unknown status glyph '{glyph}' at line {line}")]
    UnknownStatusGlyph { line: usize, glyph: char },
}
