use thiserror::Error;

use crate::dirty_rect::Rect;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScreenCodecError {
    #[error("rectangle {0:?} lies outside the declared screen dimensions")]
    OutOfRange(Rect),
    #[error("rle stream truncated: produced {produced} of {expected} expected bytes")]
    Truncated { produced: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, ScreenCodecError>;
