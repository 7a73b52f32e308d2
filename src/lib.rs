//! A library for turning a source image into a favicon set, including
//! single-image ICO files.
//!
//! The heart of the crate is two steps:
//!
//! 1. [`payload::encode`] normalizes a [`Bitmap`] to 8-bit RGBA and
//!    compresses it as a PNG.
//! 2. [`icondir::build`] (or [`icondir::write`]) wraps that PNG in an ICO
//!    container: a 6-byte ICONDIR header, one 16-byte ICONDIRENTRY, then the
//!    PNG bytes at offset 22.
//!
//! ```no_run
//! # fn main() -> favicon::Result<()> {
//! let source = favicon::Bitmap::open("logo.png")?;
//! let bitmap = source.resize(64, 64)?;
//! let payload = favicon::payload::encode(&bitmap)?;
//! let file = std::fs::File::create("favicon.ico").map_err(favicon::Error::Write)?;
//! favicon::icondir::write(file, &bitmap, &payload)?;
//! # Ok(())
//! # }
//! ```
//!
//! Every multi-byte field is little-endian.  The width and height fields
//! are a single byte each, so a dimension of 256 or more is truncated modulo
//! 256 (256 is stored as 0); see [`IconDirEntry::width_byte`].

#![warn(missing_docs)]

#[macro_use]
mod macros;

mod bitmap;
mod error;
pub mod generate;
pub mod icondir;
pub mod payload;
mod restype;

pub use crate::bitmap::Bitmap;
pub use crate::error::{Error, Result};
pub use crate::generate::{OutputKind, OutputSpec, Report};
pub use crate::icondir::{IconDir, IconDirEntry, IconFile};
pub use crate::payload::{EncodedPayload, RgbaBuffer};
pub use crate::restype::ResourceType;
