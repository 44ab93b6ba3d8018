//! Error types for MOD decoding

/// Broad failure class reported to the format-probing caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Not a MOD file, or truncated beyond recovery; try another codec
    Unsupported,
    /// Recognized as MOD but outside a hard structural limit
    FormatError,
}

/// Errors that can occur when decoding a MOD file
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModError {
    /// Tag at offset 1080 is not a known MOD tag and legacy loading was not requested
    #[error("unrecognized MOD tag {0:?}")]
    UnknownTag(String),

    /// A structural read ran past the end of the data
    #[error("unexpected end of file")]
    UnexpectedEof,

    /// Tag declares more channels than the song model can hold
    #[error("too many channels: {0} (max 64)")]
    TooManyChannels(u8),
}

impl ModError {
    /// Classify this error for the caller's format-probing loop
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTag(_) | Self::UnexpectedEof => ErrorKind::Unsupported,
            Self::TooManyChannels(_) => ErrorKind::FormatError,
        }
    }
}
