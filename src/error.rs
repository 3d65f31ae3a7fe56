//! Root causes of blob recovery failures.
//!
//! Fallible operations generally return [`anyhow::Error`] with context describing the stage that
//! failed. The innermost cause is always one of these variants, so callers can tell failures apart
//! with [`anyhow::Error::downcast_ref`].

/// Errors produced while parsing blobs, doing field arithmetic, or running transforms.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecoveryError {
    /// The hex encoding of a blob has the wrong number of digits.
    #[error("blob hex string has {actual} digits, expected {expected}")]
    HexLength { expected: usize, actual: usize },

    /// The hex encoding of a blob contains something other than a hex digit.
    #[error("invalid hex character {character:?} at offset {offset} (field element {element})")]
    InvalidHexCharacter {
        character: char,
        offset: usize,
        element: usize,
    },

    /// A serialized blob has the wrong number of bytes.
    #[error("blob has {actual} bytes, expected {expected}")]
    BlobLength { expected: usize, actual: usize },

    /// A serialized field element is not less than the field modulus.
    #[error("field element {index} is not less than the field modulus")]
    NonCanonicalElement { index: usize },

    /// Attempted to invert zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The values and evaluation points passed to a transform have different lengths.
    #[error("{values} values but {points} evaluation points")]
    LengthMismatch { values: usize, points: usize },

    /// A transform or domain length is zero or not a power of two.
    #[error("length {length} is not a power of two")]
    NotPowerOfTwo { length: usize },

    /// A butterfly network was given fewer roots of unity than its size requires.
    #[error("transform of size 2^{log_size} needs more than {provided} roots of unity")]
    TooFewRootsOfUnity { log_size: u32, provided: usize },

    /// The field has no root of unity of the requested order.
    #[error("no root of unity of order 2^{log_size}, the largest supported order is 2^{max}")]
    DomainTooLarge { log_size: u32, max: u32 },
}
