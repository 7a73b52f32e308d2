use std::io;

//===========================================================================//

/// Errors produced while decoding a source image, encoding a payload, or
/// writing an icon file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The source image could not be read or decoded.
    #[error("failed to decode source image: {0}")]
    Decode(#[source] image::ImageError),

    /// The PNG encoder rejected the pixel buffer.
    #[error("failed to encode PNG payload: {0}")]
    Encode(#[source] png::EncodingError),

    /// The output sink did not accept all of the bytes.
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),

    /// An icon file could not be read.
    #[error("failed to read icon file: {0}")]
    Read(#[source] io::Error),

    /// Data being read back (an icon file or PNG payload) is malformed.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The caller asked for something the format cannot represent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl From<image::ImageError> for Error {
    fn from(error: image::ImageError) -> Error {
        Error::Decode(error)
    }
}

impl From<png::EncodingError> for Error {
    fn from(error: png::EncodingError) -> Error {
        match error {
            png::EncodingError::IoError(error) => Error::Write(error),
            other => Error::Encode(other),
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Error {
        Error::Write(error)
    }
}

//===========================================================================//


//===========================================================================//
