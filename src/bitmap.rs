use crate::error::Result;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, RgbaImage};
use std::path::Path;

//===========================================================================//

// Size limits for any image we are willing to turn into an icon:
const MIN_WIDTH: u32 = 1;
const MIN_HEIGHT: u32 = 1;

// Lanczos with a three-lobe window; the sharpest of the filters the image
// crate offers, and what favicon downscaling wants.
const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

//===========================================================================//

/// A decoded source image.
///
/// The pixel format is whatever the decoder produced; it is normalized to
/// 8-bit RGBA only when a payload is encoded from it.  A `Bitmap` is never
/// modified after construction.
#[derive(Clone, Debug)]
pub struct Bitmap {
    image: DynamicImage,
}

impl Bitmap {
    /// Decodes the image file at `path`.  The format is detected from the
    /// file contents and extension.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Bitmap> {
        let path = path.as_ref();
        let image = image::open(path)?;
        tracing::debug!(
            "decoded {} ({}x{}, {:?})",
            path.display(),
            image.width(),
            image.height(),
            image.color()
        );
        Bitmap::from_image(image)
    }

    /// Wraps an already-decoded image.  Returns an error if either dimension
    /// is zero.
    pub fn from_image(image: DynamicImage) -> Result<Bitmap> {
        let (width, height) = image.dimensions();
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            invalid_input!(
                "Invalid image size (was {}x{}, but must be at least {}x{})",
                width,
                height,
                MIN_WIDTH,
                MIN_HEIGHT
            );
        }
        Ok(Bitmap { image })
    }

    /// Creates a bitmap from straight RGBA data, in row-major order from top
    /// to bottom.  Panics if a dimension is zero or if `rgba_data` is not
    /// exactly `4 * width * height` bytes.
    pub fn from_rgba_data(width: u32, height: u32, rgba_data: Vec<u8>) -> Bitmap {
        if width < MIN_WIDTH {
            panic!(
                "Invalid width (was {}, but must be at least {})",
                width, MIN_WIDTH
            );
        }
        if height < MIN_HEIGHT {
            panic!(
                "Invalid height (was {}, but must be at least {})",
                height, MIN_HEIGHT
            );
        }
        let expected_data_len = (width as u64) * (height as u64) * 4;
        let data_len = rgba_data.len();
        match RgbaImage::from_raw(width, height, rgba_data) {
            Some(buffer) if data_len as u64 == expected_data_len => {
                Bitmap { image: DynamicImage::ImageRgba8(buffer) }
            }
            _ => panic!(
                "Invalid data length (was {}, but must be {} for {}x{} image)",
                data_len, expected_data_len, width, height
            ),
        }
    }

    /// Returns a new bitmap scaled to exactly `width` by `height` pixels.
    /// The aspect ratio is not preserved.
    pub fn resize(&self, width: u32, height: u32) -> Result<Bitmap> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            invalid_input!(
                "Invalid target size (was {}x{}, but must be at least {}x{})",
                width,
                height,
                MIN_WIDTH,
                MIN_HEIGHT
            );
        }
        if (width, height) == self.image.dimensions() {
            return Ok(self.clone());
        }
        let image = self.image.resize_exact(width, height, RESIZE_FILTER);
        Ok(Bitmap { image })
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Returns the underlying decoded image.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

//===========================================================================//


//===========================================================================//
