use std::fmt;

/// An argument or lifecycle error raised by arena operations.
///
/// The arena validates every index it is handed; misuse surfaces as one of
/// these variants rather than a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    /// The arena was closed before this operation.
    Closed,
    /// The null sentinel index was passed to a read or write.
    NullIndex,
    /// An index beyond the allocated node range.
    IndexOutOfBounds(u32),
    /// A byte range with start greater than end.
    InvalidRange { start: u32, end: u32 },
    /// An arena constructed with zero capacity.
    ZeroCapacity,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "arena has been closed"),
            Self::NullIndex => write!(f, "the null sentinel is not a valid node index"),
            Self::IndexOutOfBounds(index) => {
                write!(f, "node index {index} is out of bounds")
            }
            Self::InvalidRange { start, end } => {
                write!(f, "invalid byte range: start {start} > end {end}")
            }
            Self::ZeroCapacity => write!(f, "arena capacity must be at least 1"),
        }
    }
}

impl std::error::Error for ArenaError {}
