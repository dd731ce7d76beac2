//! Color-threshold object classification
//!
//! Each [`ObjectClass`] owns one fixed predicate over `(r, g, b)`. The
//! predicates are not mutually exclusive, so anything comparing counts across
//! classes goes through [`dominant`], which breaks exact ties in declaration
//! order.

use crate::frame::{Frame, Region};
use crate::pixel::Pixel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Object classes the robot recognizes, in tie-break precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectClass {
    /// Burgundy trash cubes
    Trash,
    /// Black cubes left behind by the compactor
    CompressedTrash,
    /// Green plant cubes
    Plant,
    /// Yellow charging pad
    ChargingArea,
    /// Red delivery basket
    Basket,
}

impl ObjectClass {
    pub const ALL: [ObjectClass; 5] = [
        ObjectClass::Trash,
        ObjectClass::CompressedTrash,
        ObjectClass::Plant,
        ObjectClass::ChargingArea,
        ObjectClass::Basket,
    ];

    pub fn matches(self, pixel: Pixel) -> bool {
        let Pixel { r, g, b } = pixel;
        match self {
            ObjectClass::Trash => {
                (75..=125).contains(&r) && (25..=70).contains(&g) && b <= 30
            }
            ObjectClass::CompressedTrash => r < 50 && g < 50 && b < 50,
            ObjectClass::Plant => {
                g >= 140 && (40..=120).contains(&r) && (10..=100).contains(&b)
            }
            ObjectClass::ChargingArea => r >= 180 && g >= 180 && b <= 100,
            ObjectClass::Basket => {
                let (r, g, b) = (r as i16, g as i16, b as i16);
                r > 150 && g < 100 && b < 100 && r - g > 60 && r - b > 60
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ObjectClass::Trash => "trash",
            ObjectClass::CompressedTrash => "compressed_trash",
            ObjectClass::Plant => "plant",
            ObjectClass::ChargingArea => "charging_area",
            ObjectClass::Basket => "basket",
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Per-region summary of one classification pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    pub match_count: usize,
    /// Pixels examined (the clipped region area)
    pub region_size: usize,
    /// `match_count / region_size`, 0 for an empty region
    pub coverage: f64,
    /// Mean `(x, y)` of the matching pixels in region-local coordinates;
    /// present iff `match_count > 0`
    pub centroid: Option<(f64, f64)>,
}

impl DetectionResult {
    fn from_sums(match_count: usize, region_size: usize, sum_x: u64, sum_y: u64) -> Self {
        let coverage = if region_size == 0 {
            0.0
        } else {
            match_count as f64 / region_size as f64
        };
        let centroid = (match_count > 0).then(|| {
            (
                sum_x as f64 / match_count as f64,
                sum_y as f64 / match_count as f64,
            )
        });

        Self {
            match_count,
            region_size,
            coverage,
            centroid,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.match_count == 0
    }
}

/// Classify every pixel of `region` against a single class
pub fn detect(frame: &Frame, region: Region, class: ObjectClass) -> DetectionResult {
    detect_where(frame, region, |p| class.matches(p))
}

/// Count pixels of `region` that match at least one of `classes`
pub fn detect_any(frame: &Frame, region: Region, classes: &[ObjectClass]) -> DetectionResult {
    detect_where(frame, region, |p| classes.iter().any(|c| c.matches(p)))
}

fn detect_where(frame: &Frame, region: Region, pred: impl Fn(Pixel) -> bool) -> DetectionResult {
    let region_size = region.clip(frame.width(), frame.height()).area();
    let (mut count, mut sum_x, mut sum_y) = (0usize, 0u64, 0u64);

    for (x, y, pixel) in frame.region_pixels(region) {
        if pred(pixel) {
            count += 1;
            sum_x += x as u64;
            sum_y += y as u64;
        }
    }

    DetectionResult::from_sums(count, region_size, sum_x, sum_y)
}

/// Detect each candidate class in `region` and return the one with the
/// highest count. Exact ties go to the candidate listed first; an empty
/// candidate list yields `None`.
pub fn dominant(
    frame: &Frame,
    region: Region,
    candidates: &[ObjectClass],
) -> Option<(ObjectClass, DetectionResult)> {
    let mut best: Option<(ObjectClass, DetectionResult)> = None;
    for &class in candidates {
        let result = detect(frame, region, class);
        let replace = match &best {
            Some((_, current)) => result.match_count > current.match_count,
            None => true,
        };
        if replace {
            best = Some((class, result));
        }
    }
    best
}

/// Distinct pixel values in `region` that match `class`, sorted
pub fn similar_colors(frame: &Frame, region: Region, class: ObjectClass) -> BTreeSet<Pixel> {
    frame
        .region_pixels(region)
        .map(|(_, _, p)| p)
        .filter(|p| class.matches(*p))
        .collect()
}
