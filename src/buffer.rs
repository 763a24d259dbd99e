//! RGB pixel buffer shared by all processing stages.
//!
//! Pixels are stored as an `ndarray` array of shape (height, width, 3) with
//! u8 channels, so stages index it as `[[y, x, c]]` like any other filter in
//! this crate. Dimensions are fixed at construction and are always at least
//! 1x1.

use ndarray::{Array3, ArrayView3, ArrayViewMut3};

use crate::error::{FilterError, FilterResult};

/// Number of color channels per pixel.
pub const CHANNELS: usize = 3;

/// One pixel as `[r, g, b]`.
pub type Rgb = [u8; 3];

/// Pure white, used for unipolar and salt noise.
pub const WHITE: Rgb = [255, 255, 255];

/// Pure black, used for pepper noise.
pub const BLACK: Rgb = [0, 0, 0];

/// Owned width x height grid of RGB triples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Array3<u8>,
}

impl PixelBuffer {
    /// Create a black buffer.
    pub fn new(width: usize, height: usize) -> FilterResult<Self> {
        Self::filled(width, height, BLACK)
    }

    /// Create a buffer where every pixel has the same color.
    pub fn filled(width: usize, height: usize, color: Rgb) -> FilterResult<Self> {
        check_dimensions(width, height)?;
        let data = Array3::from_shape_fn((height, width, CHANNELS), |(_, _, c)| color[c]);
        Ok(PixelBuffer { data })
    }

    /// Create a buffer by evaluating `f(x, y)` for every coordinate.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> FilterResult<Self>
    where
        F: FnMut(usize, usize) -> Rgb,
    {
        check_dimensions(width, height)?;
        let mut data = Array3::<u8>::zeros((height, width, CHANNELS));
        for y in 0..height {
            for x in 0..width {
                let color = f(x, y);
                for c in 0..CHANNELS {
                    data[[y, x, c]] = color[c];
                }
            }
        }
        Ok(PixelBuffer { data })
    }

    /// Wrap interleaved RGB bytes (row-major, length `width * height * 3`).
    pub fn from_raw(width: usize, height: usize, raw: Vec<u8>) -> FilterResult<Self> {
        check_dimensions(width, height)?;
        let expected = width * height * CHANNELS;
        if raw.len() != expected {
            return Err(FilterError::invalid(format!(
                "raw RGB data has {} bytes, expected {expected} for {width}x{height}",
                raw.len()
            )));
        }
        let data = Array3::from_shape_vec((height, width, CHANNELS), raw)
            .map_err(|e| FilterError::invalid(e.to_string()))?;
        Ok(PixelBuffer { data })
    }

    /// Wrap an existing (height, width, 3) array.
    pub fn from_array(data: Array3<u8>) -> FilterResult<Self> {
        let (height, width, channels) = data.dim();
        check_dimensions(width, height)?;
        if channels != CHANNELS {
            return Err(FilterError::invalid(format!(
                "expected {CHANNELS} channels, got {channels}"
            )));
        }
        let data = if data.is_standard_layout() {
            data
        } else {
            data.as_standard_layout().into_owned()
        };
        Ok(PixelBuffer { data })
    }

    /// Copy a (height, width, 3) view into a new buffer.
    pub fn from_view(view: ArrayView3<u8>) -> FilterResult<Self> {
        Self::from_array(view.to_owned())
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Total number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Color at `(x, y)`, or `None` when out of range.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.pixel(x, y))
    }

    /// Overwrite the color at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, color: Rgb) -> FilterResult<()> {
        if x >= self.width() || y >= self.height() {
            return Err(FilterError::invalid(format!(
                "coordinate ({x}, {y}) outside {}x{} buffer",
                self.width(),
                self.height()
            )));
        }
        self.put(x, y, color);
        Ok(())
    }

    #[inline]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> Rgb {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, color: Rgb) {
        self.data[[y, x, 0]] = color[0];
        self.data[[y, x, 1]] = color[1];
        self.data[[y, x, 2]] = color[2];
    }

    /// Iterate over `(x, y, color)` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, Rgb)> + '_ {
        let width = self.width();
        (0..self.pixel_count()).map(move |i| {
            let (x, y) = (i % width, i / width);
            (x, y, self.pixel(x, y))
        })
    }

    /// Independent deep copy for stages that must read a frozen snapshot
    /// while another buffer is being written.
    pub fn snapshot(&self) -> PixelBuffer {
        self.clone()
    }

    /// Fail unless `other` has the same width and height.
    pub fn ensure_same_dimensions(&self, other: &PixelBuffer) -> FilterResult<()> {
        if self.width() != other.width() || self.height() != other.height() {
            return Err(FilterError::invalid(format!(
                "buffer dimensions differ: {}x{} vs {}x{}",
                self.width(),
                self.height(),
                other.width(),
                other.height()
            )));
        }
        Ok(())
    }

    /// Read-only (height, width, 3) view.
    pub fn view(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// Mutable (height, width, 3) view.
    pub fn view_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        self.data.view_mut()
    }

    /// Consume the buffer, returning the underlying array.
    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Consume the buffer, returning interleaved RGB bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data.into_raw_vec_and_offset().0
    }
}

fn check_dimensions(width: usize, height: usize) -> FilterResult<()> {
    if width == 0 || height == 0 {
        return Err(FilterError::EmptyBuffer { width, height });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_sets_every_pixel() {
        let buf = PixelBuffer::filled(4, 2, [1, 2, 3]).unwrap();
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 2);
        assert!(buf.pixels().all(|(_, _, c)| c == [1, 2, 3]));
        assert_eq!(buf.pixels().count(), 8);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            PixelBuffer::new(0, 5),
            Err(FilterError::EmptyBuffer { width: 0, height: 5 })
        ));
        assert!(matches!(
            PixelBuffer::from_raw(3, 0, Vec::new()),
            Err(FilterError::EmptyBuffer { .. })
        ));
    }

    #[test]
    fn test_from_raw_length_mismatch() {
        let result = PixelBuffer::from_raw(2, 2, vec![0; 11]);
        assert!(matches!(result, Err(FilterError::InvalidParameter(_))));
    }

    #[test]
    fn test_from_raw_is_row_major() {
        let raw = vec![
            1, 1, 1, 2, 2, 2, //
            3, 3, 3, 4, 4, 4,
        ];
        let buf = PixelBuffer::from_raw(2, 2, raw.clone()).unwrap();
        assert_eq!(buf.get(1, 0), Some([2, 2, 2]));
        assert_eq!(buf.get(0, 1), Some([3, 3, 3]));
        assert_eq!(buf.into_raw(), raw);
    }

    #[test]
    fn test_from_array_rejects_alpha() {
        let rgba = Array3::<u8>::zeros((2, 2, 4));
        assert!(PixelBuffer::from_array(rgba).is_err());
    }

    #[test]
    fn test_from_array_normalizes_layout() {
        let mut arr = Array3::<u8>::zeros((3, 2, 3));
        arr[[2, 1, 0]] = 9;
        let flipped = arr.slice(ndarray::s![..;-1, .., ..]).to_owned();
        let buf = PixelBuffer::from_array(flipped).unwrap();
        assert_eq!(buf.get(1, 0), Some([9, 0, 0]));
        assert_eq!(buf.into_raw().len(), 18);
    }

    #[test]
    fn test_get_set_bounds() {
        let mut buf = PixelBuffer::new(2, 3).unwrap();
        buf.set(1, 2, [7, 8, 9]).unwrap();
        assert_eq!(buf.get(1, 2), Some([7, 8, 9]));
        assert_eq!(buf.get(2, 0), None);
        assert!(buf.set(0, 3, WHITE).is_err());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut buf = PixelBuffer::filled(3, 3, [5, 5, 5]).unwrap();
        let snap = buf.snapshot();
        buf.set(1, 1, WHITE).unwrap();
        assert_eq!(snap.get(1, 1), Some([5, 5, 5]));
        assert_eq!(snap.width(), buf.width());
        assert_eq!(snap.height(), buf.height());
    }

    #[test]
    fn test_ensure_same_dimensions() {
        let a = PixelBuffer::new(3, 2).unwrap();
        let b = PixelBuffer::new(2, 3).unwrap();
        assert!(a.ensure_same_dimensions(&a.snapshot()).is_ok());
        assert!(matches!(
            a.ensure_same_dimensions(&b),
            Err(FilterError::InvalidParameter(_))
        ));
    }
}
