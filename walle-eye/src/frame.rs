//! Captured frames and the rectangular regions cropped out of them

use crate::error::VisionError;
use crate::pixel::Pixel;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest frame accepted, in pixels
const MAX_FRAME_PIXELS: u64 = 100_000_000;

/// An immutable, row-major grid of pixels.
///
/// Produced fresh by every capture and owned by whoever requested it. There is
/// no mutable access to the pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Frame {
    /// Build a frame from row-major pixels. The buffer length must equal
    /// `width * height`.
    pub fn new(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self, VisionError> {
        let expected = (width as u64) * (height as u64);
        if expected > MAX_FRAME_PIXELS {
            return Err(VisionError::InvalidFrame(format!(
                "{}x{} exceeds the {} pixel limit",
                width, height, MAX_FRAME_PIXELS
            )));
        }
        if pixels.len() as u64 != expected {
            return Err(VisionError::InvalidFrame(format!(
                "expected {} pixels for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }

        Ok(Self { width, height, pixels })
    }

    /// A frame where every pixel has the same value
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; width as usize * height as usize],
        }
    }

    /// Build a frame by evaluating `f(x, y)` for every coordinate
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Pixel) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self { width, height, pixels }
    }

    /// Convert a decoded RGB image into a frame
    pub fn from_rgb_image(image: &image::RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|p| Pixel::from(*p)).collect();
        Self { width, height, pixels }
    }

    /// Decode an image file (any format the `image` crate reads) as RGB
    pub fn open(path: impl AsRef<Path>) -> Result<Self, VisionError> {
        let image = image::open(path.as_ref())?.to_rgb8();
        Ok(Self::from_rgb_image(&image))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Iterate the pixels inside `region` (clipped to this frame) as
    /// `(local_x, local_y, pixel)`, with coordinates relative to the region origin.
    pub fn region_pixels(&self, region: Region) -> impl Iterator<Item = (u32, u32, Pixel)> + '_ {
        let region = region.clip(self.width, self.height);
        let stride = self.width as usize;
        (0..region.height).flat_map(move |ly| {
            let row = (region.y + ly) as usize * stride;
            (0..region.width).map(move |lx| {
                let idx = row + (region.x + lx) as usize;
                (lx, ly, self.pixels[idx])
            })
        })
    }
}

/// A rectangular window into a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// The whole frame
    pub fn full(frame: &Frame) -> Self {
        Self::new(0, 0, frame.width(), frame.height())
    }

    /// All rows, columns `width/3 .. 2*width/3`
    pub fn middle_third_columns(frame: &Frame) -> Self {
        let w = frame.width();
        Self::new(w / 3, 0, 2 * w / 3 - w / 3, frame.height())
    }

    /// The 2-pixel column strip straddling `width/2`
    pub fn center_column_strip(frame: &Frame) -> Self {
        let w = frame.width();
        let start = (w / 2).saturating_sub(1);
        let end = (w / 2 + 1).min(w);
        Self::new(start, 0, end.saturating_sub(start), frame.height())
    }

    /// The last `rows` rows of the frame
    pub fn bottom_rows(frame: &Frame, rows: u32) -> Self {
        let rows = rows.min(frame.height());
        Self::new(0, frame.height() - rows, frame.width(), rows)
    }

    /// Rows from `from_row` down, columns of the middle third
    pub fn lower_middle_third(frame: &Frame, from_row: u32) -> Self {
        let w = frame.width();
        let top = from_row.min(frame.height());
        Self::new(w / 3, top, 2 * w / 3 - w / 3, frame.height() - top)
    }

    /// Shrink the region so it lies inside a `width` x `height` frame
    pub fn clip(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Frame {
        Frame::from_fn(width, height, |x, y| Pixel::new(x as u8, y as u8, 0))
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let result = Frame::new(2, 2, vec![Pixel::default(); 3]);
        assert!(matches!(result, Err(VisionError::InvalidFrame(_))));
    }

    #[test]
    fn test_get_is_row_major() {
        let frame = gradient(4, 3);
        assert_eq!(frame.get(3, 2), Some(Pixel::new(3, 2, 0)));
        assert_eq!(frame.get(4, 0), None);
    }

    #[test]
    fn test_middle_third_columns() {
        let frame = gradient(90, 10);
        assert_eq!(Region::middle_third_columns(&frame), Region::new(30, 0, 30, 10));

        let frame = gradient(10, 10);
        // 10/3 = 3, 20/3 = 6
        assert_eq!(Region::middle_third_columns(&frame), Region::new(3, 0, 3, 10));
    }

    #[test]
    fn test_center_column_strip() {
        let frame = gradient(64, 8);
        assert_eq!(Region::center_column_strip(&frame), Region::new(31, 0, 2, 8));

        let frame = gradient(1, 8);
        assert_eq!(Region::center_column_strip(&frame), Region::new(0, 0, 1, 8));
    }

    #[test]
    fn test_bottom_rows_and_lower_crop() {
        let frame = gradient(30, 32);
        assert_eq!(Region::bottom_rows(&frame, 2), Region::new(0, 30, 30, 2));
        assert_eq!(Region::lower_middle_third(&frame, 20), Region::new(10, 20, 10, 12));

        let short = gradient(30, 10);
        assert_eq!(Region::lower_middle_third(&short, 20).area(), 0);
    }

    #[test]
    fn test_region_pixels_are_local() {
        let frame = gradient(6, 4);
        let coords: Vec<_> = frame
            .region_pixels(Region::new(4, 2, 5, 5))
            .map(|(x, y, p)| (x, y, p.r, p.g))
            .collect();
        assert_eq!(
            coords,
            vec![(0, 0, 4, 2), (1, 0, 5, 2), (0, 1, 4, 3), (1, 1, 5, 3)]
        );
    }

    #[test]
    fn test_from_rgb_image() {
        let mut img = image::RgbImage::new(2, 1);
        img.put_pixel(1, 0, image::Rgb([10, 20, 30]));
        let frame = Frame::from_rgb_image(&img);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.get(1, 0), Some(Pixel::new(10, 20, 30)));
    }

    #[test]
    fn test_open_missing_file_is_image_error() {
        match Frame::open("/nonexistent/frame.png") {
            Err(VisionError::Image(_)) => {}
            other => panic!("Expected Image error, got {:?}", other.map(|f| f.width())),
        }
    }
}
