use thiserror::Error;

/// Errors raised while decoding a bit stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerdeErr {
    /// The reader ran past the end of the buffer
    #[error("Unexpected end of buffer after reading {bits_read} bits")]
    UnexpectedEnd { bits_read: usize },

    /// A variable-length integer did not terminate within 128 bits
    #[error("Variable-length integer exceeds 128 bits")]
    IntegerOverflow,

    /// A decoded integer does not fit the requested target type
    #[error("Integer {value} is out of range for {target}")]
    IntegerOutOfRange { value: i128, target: &'static str },

    /// A string payload was not valid UTF-8
    #[error("String payload is not valid UTF-8")]
    InvalidUtf8,

    /// An enum tag did not match any known variant
    #[error("Unknown {type_name} variant tag {tag}")]
    UnknownVariant { type_name: &'static str, tag: u32 },
}
