//! The PNG payload embedded in an icon file.

use crate::bitmap::Bitmap;
use crate::error::Result;
use image::{imageops, RgbaImage};
use std::io::Read;

//===========================================================================//

// The signature that all PNG files start with.
const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

// Every payload we produce is 8-bit RGBA.
pub(crate) const BITS_PER_PIXEL: u16 = 32;

//===========================================================================//

/// A bitmap normalized to straight 8-bit RGBA, four bytes per pixel in
/// row-major order from top to bottom.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RgbaBuffer {
    width: u32,
    height: u32,
    rgba_data: Vec<u8>,
}

impl RgbaBuffer {
    /// Draws `bitmap` onto a freshly allocated buffer of the same size.  Each
    /// source pixel replaces the destination pixel outright; nothing is
    /// blended, so partially transparent pixels keep their exact channels.
    pub fn composite(bitmap: &Bitmap) -> RgbaBuffer {
        let mut canvas = RgbaImage::new(bitmap.width(), bitmap.height());
        imageops::replace(&mut canvas, bitmap.image(), 0, 0);
        RgbaBuffer {
            width: canvas.width(),
            height: canvas.height(),
            rgba_data: canvas.into_raw(),
        }
    }

    /// Returns the width of the buffer, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the buffer, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the RGBA data, in row-major order from top to bottom.
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }

    fn write_png(&self, data: &mut Vec<u8>) -> Result<()> {
        let mut encoder = png::Encoder::new(data, self.width, self.height);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_color(png::ColorType::Rgba);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.rgba_data)?;
        writer.finish()?;
        Ok(())
    }
}

//===========================================================================//

/// The PNG-compressed bytes of one image, as embedded in an icon file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodedPayload {
    data: Vec<u8>,
}

impl EncodedPayload {
    /// Returns the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the number of encoded bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if there are no encoded bytes.  Never the case for a
    /// payload produced by [`encode`].
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if the bytes start with the PNG signature.
    pub fn is_png(&self) -> bool {
        self.data.starts_with(PNG_SIGNATURE)
    }

    /// Consumes the payload, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

//===========================================================================//

/// Normalizes `bitmap` to 8-bit RGBA and encodes it as a PNG.
///
/// Decoding the result with [`decode_payload`] yields exactly
/// `RgbaBuffer::composite(bitmap)`.  Fails with [`Error::Encode`] if the PNG
/// encoder rejects the buffer.
///
/// [`Error::Encode`]: crate::Error::Encode
pub fn encode(bitmap: &Bitmap) -> Result<EncodedPayload> {
    let buffer = RgbaBuffer::composite(bitmap);
    encode_buffer(&buffer)
}

/// Encodes an already-normalized buffer as a PNG.
pub fn encode_buffer(buffer: &RgbaBuffer) -> Result<EncodedPayload> {
    let mut data = Vec::new();
    buffer.write_png(&mut data)?;
    tracing::debug!(
        "encoded {}x{} RGBA payload into {} bytes",
        buffer.width,
        buffer.height,
        data.len()
    );
    Ok(EncodedPayload { data })
}

/// Decodes PNG payload bytes back into an RGBA buffer.  8-bit grayscale, RGB
/// and their alpha variants are expanded to RGBA; other bit depths and
/// indexed color are rejected.
pub fn decode_payload<R: Read>(reader: R) -> Result<RgbaBuffer> {
    let decoder = png::Decoder::new(reader);
    let mut png_reader = match decoder.read_info() {
        Ok(png_reader) => png_reader,
        Err(error) => invalid_data!("Malformed PNG data: {}", error),
    };
    let (width, height) = png_reader.info().size();
    if width == 0 || height == 0 {
        invalid_data!("Invalid PNG size (was {}x{})", width, height);
    }
    if png_reader.info().bit_depth != png::BitDepth::Eight {
        invalid_data!(
            "Unsupported PNG bit depth: {:?}",
            png_reader.info().bit_depth
        );
    }
    let mut buffer = vec![0u8; png_reader.output_buffer_size()];
    let frame = match png_reader.next_frame(&mut buffer) {
        Ok(frame) => frame,
        Err(error) => invalid_data!("Malformed PNG data: {}", error),
    };
    buffer.truncate(frame.buffer_size());
    let rgba_data = match frame.color_type {
        png::ColorType::Rgba => buffer,
        png::ColorType::Rgb => buffer
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], u8::MAX])
            .collect(),
        png::ColorType::GrayscaleAlpha => buffer
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        png::ColorType::Grayscale => buffer
            .into_iter()
            .flat_map(|gray| [gray, gray, gray, u8::MAX])
            .collect(),
        png::ColorType::Indexed => {
            invalid_data!("Unsupported PNG color type: {:?}", frame.color_type);
        }
    };
    let expected_data_len = (width as usize) * (height as usize) * 4;
    if rgba_data.len() != expected_data_len {
        invalid_data!(
            "PNG data has wrong length (was {}, but must be {} for {}x{})",
            rgba_data.len(),
            expected_data_len,
            width,
            height
        );
    }
    Ok(RgbaBuffer { width, height, rgba_data })
}

//===========================================================================//


//===========================================================================//
