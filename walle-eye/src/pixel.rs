//! A single RGB sample

use serde::{Deserialize, Serialize};

/// Three 8-bit channel intensities. Plain value; classified, never mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Pixel {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<image::Rgb<u8>> for Pixel {
    fn from(rgb: image::Rgb<u8>) -> Self {
        Self::from(rgb.0)
    }
}
