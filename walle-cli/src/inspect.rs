//! Per-class detection report for a single image

use serde::Serialize;
use std::fmt::Write as _;
use walle_eye::{detect, similar_colors, DetectionResult, Frame, ObjectClass, Pixel, Region};

#[derive(Debug, Serialize)]
pub struct RegionReport {
    pub region: &'static str,
    pub class: ObjectClass,
    pub result: DetectionResult,
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub width: u32,
    pub height: u32,
    pub detections: Vec<RegionReport>,
    /// Distinct colors in the frame matching the selected class
    pub similar_class: ObjectClass,
    pub similar_colors: Vec<Pixel>,
}

pub fn parse_class(name: &str) -> Result<ObjectClass, String> {
    ObjectClass::ALL
        .into_iter()
        .find(|class| class.name() == name)
        .ok_or_else(|| {
            let known: Vec<&str> = ObjectClass::ALL.iter().map(|c| c.name()).collect();
            format!("unknown class '{}' (expected one of: {})", name, known.join(", "))
        })
}

pub fn inspect(frame: &Frame, class: ObjectClass) -> InspectReport {
    let regions = [
        ("full", Region::full(frame)),
        ("middle_third", Region::middle_third_columns(frame)),
    ];

    let mut detections = Vec::new();
    for (name, region) in regions {
        for class in ObjectClass::ALL {
            detections.push(RegionReport {
                region: name,
                class,
                result: detect(frame, region, class),
            });
        }
    }

    InspectReport {
        width: frame.width(),
        height: frame.height(),
        detections,
        similar_class: class,
        similar_colors: similar_colors(frame, Region::full(frame), class)
            .into_iter()
            .collect(),
    }
}

impl InspectReport {
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Frame {}x{}", self.width, self.height);
        for d in &self.detections {
            let centroid = match d.result.centroid {
                Some((x, y)) => format!("({:.1}, {:.1})", x, y),
                None => "-".to_string(),
            };
            let _ = writeln!(
                out,
                "  {:<13} {:<17} count={:<7} coverage={:.3} centroid={}",
                d.region, d.class, d.result.match_count, d.result.coverage, centroid
            );
        }
        let _ = writeln!(
            out,
            "{} distinct {} colors",
            self.similar_colors.len(),
            self.similar_class
        );
        for p in &self.similar_colors {
            let _ = writeln!(out, "  ({}, {}, {})", p.r, p.g, p.b);
        }
        out
    }
}
