use thiserror::Error;

/// Errors produced while decoding an ALOC container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A read or skip ran past the end of the buffer.
    #[error("Unexpected end of data: {requested} bytes requested at offset {offset}, buffer is {len} bytes")]
    UnexpectedEndOfData {
        offset: usize,
        requested: usize,
        len: usize,
    },

    /// The header declared a data type with no decoder.
    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(u32),

    /// A primitive record carried a tag other than BOX, CAP or SPH.
    #[error("Unknown primitive tag: {0:?}")]
    UnknownPrimitiveTag(String),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
