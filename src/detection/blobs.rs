//! Dot candidate extraction from a binary mask.

use crate::config::DetectorConfig;
use crate::error::BrailleError;
use crate::preprocessing::BinaryMask;
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::point::Point;
use serde::Serialize;
use std::f64::consts::PI;

/// Centre of a dot-shaped blob plus the shape measurements that admitted it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Centroid {
    pub x: f32,
    pub y: f32,
    pub area: f32,
    pub circularity: f32,
}

impl Centroid {
    #[cfg(test)]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            area: 0.0,
            circularity: 1.0,
        }
    }

    pub fn distance(&self, other: &Centroid) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Area/shape filter applied to every external contour
#[derive(Debug, Clone, Copy)]
pub struct BlobFilter {
    pub min_area: f32,
    pub max_area: f32,
    pub circularity: f32,
    pub max_dots: usize,
}

impl From<&DetectorConfig> for BlobFilter {
    fn from(config: &DetectorConfig) -> Self {
        Self {
            min_area: config.min_dot_area,
            max_area: config.max_dot_area,
            circularity: config.circularity,
            max_dots: config.max_dots,
        }
    }
}

/// Find dot-like blobs in the mask.
///
/// Only outermost contours are considered, so holes inside a blob never
/// produce candidates of their own. Fails with `InsufficientDots` when fewer
/// than two candidates survive, since spacing cannot be estimated from one.
pub fn detect(mask: &BinaryMask, filter: &BlobFilter) -> Result<Vec<Centroid>, BrailleError> {
    let contours = find_contours::<i32>(mask.as_image());
    let external = contours
        .iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none());

    let mut rejected = 0usize;
    let mut dots = Vec::new();
    for contour in external {
        match measure(contour).filter(|c| filter.accepts(c)) {
            Some(centroid) => dots.push(centroid),
            None => rejected += 1,
        }
    }

    if filter.max_dots > 0 && dots.len() > filter.max_dots {
        tracing::warn!(
            found = dots.len(),
            kept = filter.max_dots,
            "Too many dot candidates, truncating"
        );
        dots.truncate(filter.max_dots);
    }

    tracing::debug!(accepted = dots.len(), rejected, "Blob detection complete");

    if dots.len() < 2 {
        return Err(BrailleError::InsufficientDots { found: dots.len() });
    }

    Ok(dots)
}

impl BlobFilter {
    fn accepts(&self, centroid: &Centroid) -> bool {
        (self.min_area..=self.max_area).contains(&centroid.area)
            && centroid.circularity >= self.circularity
    }
}

/// Area, circularity and first-moment centre of a closed contour polygon.
/// Returns `None` for contours that enclose no area.
fn measure(contour: &Contour<i32>) -> Option<Centroid> {
    let points = &contour.points;
    if points.len() < 3 {
        return None;
    }

    let mut twice_area = 0.0f64;
    let mut moment_x = 0.0f64;
    let mut moment_y = 0.0f64;
    let mut perimeter = 0.0f64;

    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        let cross = cross(p, &q);
        twice_area += cross;
        moment_x += (p.x + q.x) as f64 * cross;
        moment_y += (p.y + q.y) as f64 * cross;
        perimeter += ((q.x - p.x) as f64).hypot((q.y - p.y) as f64);
    }

    if twice_area == 0.0 || perimeter == 0.0 {
        return None;
    }

    let area = twice_area.abs() / 2.0;
    Some(Centroid {
        x: (moment_x / (3.0 * twice_area)) as f32,
        y: (moment_y / (3.0 * twice_area)) as f32,
        area: area as f32,
        circularity: (4.0 * PI * area / (perimeter * perimeter)) as f32,
    })
}

fn cross(p: &Point<i32>, q: &Point<i32>) -> f64 {
    p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64
}
