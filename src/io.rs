//! Image file I/O helpers.
//!
//! - `decode_image`: read a PNG/JPEG/BMP file into an RGB [`PixelBuffer`].
//! - `encode_image`: write a buffer to disk, format chosen by extension.
//!
//! Noise and channel outputs contain exact extreme values, so PNG is the
//! format to use when the files are read back.
use std::fs;
use std::path::Path;

use image::RgbImage;

use crate::buffer::PixelBuffer;
use crate::error::{FilterError, FilterResult};

/// Load an image from disk and convert it to 8-bit RGB (alpha dropped).
pub fn decode_image(path: &Path) -> FilterResult<PixelBuffer> {
    let img = image::open(path)
        .map_err(|source| FilterError::InputUnavailable {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    tracing::debug!(path = %path.display(), width, height, "decoded image");
    PixelBuffer::from_raw(width, height, img.into_raw())
}

/// Save a buffer, creating parent directories as needed.
pub fn encode_image(buffer: &PixelBuffer, path: &Path) -> FilterResult<()> {
    ensure_parent_dir(path)?;
    let (width, height) = (buffer.width() as u32, buffer.height() as u32);
    let raw = buffer.clone().into_raw();
    let image = RgbImage::from_raw(width, height, raw).ok_or_else(|| {
        FilterError::invalid(format!("buffer does not fit a {width}x{height} RGB image"))
    })?;
    image
        .save(path)
        .map_err(|source| FilterError::OutputNotWritten {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), width, height, "encoded image");
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> FilterResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| FilterError::OutputNotWritten {
                path: path.to_path_buf(),
                source: image::ImageError::IoError(e),
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("spatial_filtering_io_{name}_{}", std::process::id()))
    }

    #[test]
    fn test_png_round_trip_is_lossless() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("nested").join("out.png");
        let buf = PixelBuffer::from_fn(5, 4, |x, y| [(x * 50) as u8, (y * 60) as u8, 255]).unwrap();

        encode_image(&buf, &path).unwrap();
        let decoded = decode_image(&path).unwrap();
        assert_eq!(decoded, buf);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_decode_missing_file() {
        let path = scratch_dir("missing").join("nope.png");
        assert!(matches!(
            decode_image(&path),
            Err(FilterError::InputUnavailable { .. })
        ));
    }

    #[test]
    fn test_encode_unknown_extension() {
        let dir = scratch_dir("badext");
        let buf = PixelBuffer::new(2, 2).unwrap();
        let result = encode_image(&buf, &dir.join("out.unknownformat"));
        assert!(matches!(result, Err(FilterError::OutputNotWritten { .. })));
        let _ = fs::remove_dir_all(&dir);
    }
}
