//! Spatial grouping of dot centroids into Braille lines and cells.
//!
//! Every threshold here is expressed in units of the estimated dot spacing,
//! which makes grouping independent of image resolution and camera distance.

use crate::error::BrailleError;

use super::blobs::Centroid;

/// Axis components shorter than this fraction of the closest anchor pair
/// distance are alignment jitter, not a lattice step.
const LATTICE_FLOOR: f32 = 0.3;

/// Components up to this multiple of the smallest lattice step are averaged
/// into the refined spacing.
const LATTICE_BAND: f32 = 1.3;

/// A centroid whose nearest neighbour is closer than this fraction of the
/// median nearest-neighbour distance is a speck hugging a real dot. Neither
/// it nor its neighbour votes on the lattice step.
const LATTICE_OUTLIER: f32 = 0.5;

/// Dot lines per Braille cell
const CELL_DOT_ROWS: usize = 3;

/// One line of Braille cells, centroids ordered by x
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub reference_y: f32,
    pub centroids: Vec<Centroid>,
}

/// Dots belonging to one Braille character, ordered by x
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub centroids: Vec<Centroid>,
}

impl Cell {
    /// Top-left corner of the cell's bounding box
    pub fn origin(&self) -> (f32, f32) {
        self.centroids
            .iter()
            .fold((f32::INFINITY, f32::INFINITY), |(x, y), c| {
                (x.min(c.x), y.min(c.y))
            })
    }
}

/// Estimate the distance between adjacent dots inside one cell.
///
/// The mean of the smallest quartile of pairwise distances gives a first
/// estimate and guards against degenerate input. Sparse cells can lack any
/// adjacent pair (dots 1 and 6 alone sit on a diagonal), and larger pages pull
/// the quartile towards cell and line pitch, so the lattice step (the mean of
/// the shortest non-jitter axis components between anchor dots) is used
/// whenever one exists. The quartile is the fallback.
pub fn estimate_spacing(centroids: &[Centroid]) -> Result<f32, BrailleError> {
    if centroids.len() < 2 {
        return Err(BrailleError::InsufficientDots {
            found: centroids.len(),
        });
    }

    let mut distances = Vec::with_capacity(centroids.len() * (centroids.len() - 1) / 2);
    for (i, a) in centroids.iter().enumerate() {
        for b in &centroids[i + 1..] {
            distances.push(a.distance(b));
        }
    }
    distances.sort_by(|a, b| a.total_cmp(b));
    let n = (distances.len() / 4).max(1);
    let euclidean = distances[..n].iter().sum::<f32>() / n as f32;

    if !euclidean.is_finite() || euclidean <= f32::EPSILON {
        return Err(BrailleError::DegenerateGeometry(format!(
            "dot spacing estimate is {}",
            euclidean
        )));
    }

    let spacing = lattice_step(centroids).unwrap_or(euclidean);

    tracing::debug!(euclidean, spacing, "Estimated dot spacing");
    Ok(spacing)
}

fn lattice_step(centroids: &[Centroid]) -> Option<f32> {
    let nearest: Vec<f32> = centroids
        .iter()
        .enumerate()
        .map(|(i, a)| {
            centroids
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, b)| a.distance(b))
                .fold(f32::INFINITY, f32::min)
        })
        .collect();
    let typical = median(nearest.clone())?;

    let anchors: Vec<Centroid> = centroids
        .iter()
        .zip(&nearest)
        .filter(|(_, d)| **d >= typical * LATTICE_OUTLIER)
        .map(|(c, _)| *c)
        .collect();
    if anchors.len() < centroids.len() {
        tracing::debug!(
            dropped = centroids.len() - anchors.len(),
            "Ignoring crowded centroids for lattice step"
        );
    }

    let mut closest = f32::INFINITY;
    let mut components = Vec::new();
    for (i, a) in anchors.iter().enumerate() {
        for b in &anchors[i + 1..] {
            closest = closest.min(a.distance(b));
            components.push((a.x - b.x).abs());
            components.push((a.y - b.y).abs());
        }
    }
    let floor = (closest * LATTICE_FLOOR).max(f32::EPSILON);
    components.retain(|c| *c > floor);

    let smallest = components.iter().copied().min_by(|a, b| a.total_cmp(b))?;
    let band: Vec<f32> = components
        .into_iter()
        .filter(|c| *c <= smallest * LATTICE_BAND)
        .collect();
    Some(band.iter().sum::<f32>() / band.len() as f32)
}

/// Upper median; `None` for an empty set
fn median(mut values: Vec<f32>) -> Option<f32> {
    values.sort_by(|a, b| a.total_cmp(b));
    values.get(values.len() / 2).copied()
}

/// Group centroids into Braille lines.
///
/// Centroids are walked top to bottom. Each joins the first row whose dot
/// lines (`reference_y`, `+spacing`, `+2·spacing`) it lies within half a
/// spacing of; otherwise it opens a new row with its own y as reference.
/// Rows come back ordered by `reference_y`, their centroids ordered by x.
pub fn group_rows(centroids: &[Centroid], spacing: f32) -> Vec<Row> {
    let tolerance = spacing / 2.0;
    let mut sorted = centroids.to_vec();
    sorted.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut rows: Vec<Row> = Vec::new();
    for centroid in sorted {
        let home = rows.iter_mut().find(|row| {
            (0..CELL_DOT_ROWS).any(|line| {
                let line_y = row.reference_y + line as f32 * spacing;
                (centroid.y - line_y).abs() < tolerance
            })
        });

        match home {
            Some(row) => row.centroids.push(centroid),
            None => rows.push(Row {
                reference_y: centroid.y,
                centroids: vec![centroid],
            }),
        }
    }

    rows.sort_by(|a, b| a.reference_y.total_cmp(&b.reference_y));
    for row in &mut rows {
        row.centroids.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    rows
}

/// Split one row into cells, left to right.
///
/// A new cell starts wherever the x-gap to the previous centroid exceeds
/// `gap_factor · spacing`.
pub fn group_cells(row: &Row, spacing: f32, gap_factor: f32) -> Result<Vec<Cell>, BrailleError> {
    let (first, rest) = row.centroids.split_first().ok_or_else(|| {
        BrailleError::DegenerateGeometry(format!("row at y={} has no dots", row.reference_y))
    })?;

    let max_gap = gap_factor * spacing;
    let mut cells = Vec::new();
    let mut current = vec![*first];
    let mut previous_x = first.x;

    for centroid in rest {
        if centroid.x - previous_x > max_gap {
            cells.push(Cell {
                centroids: std::mem::take(&mut current),
            });
        }
        current.push(*centroid);
        previous_x = centroid.x;
    }
    cells.push(Cell { centroids: current });

    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: f32 = 10.0;

    fn full_cell(x: f32, y: f32) -> Vec<Centroid> {
        let mut dots = Vec::new();
        for col in 0..2 {
            for line in 0..3 {
                dots.push(Centroid::at(x + col as f32 * S, y + line as f32 * S));
            }
        }
        dots
    }

    #[test]
    fn test_spacing_of_full_cell_is_dot_pitch() {
        let spacing = estimate_spacing(&full_cell(50.0, 50.0)).unwrap();
        assert!((spacing - S).abs() < 1e-3, "spacing {}", spacing);
    }

    #[test]
    fn test_spacing_recovered_from_diagonal_pair() {
        // dots 1 and 6 only: Euclidean distance is √5·S, lattice step is S
        let dots = [Centroid::at(0.0, 0.0), Centroid::at(S, 2.0 * S)];
        let spacing = estimate_spacing(&dots).unwrap();
        assert!((spacing - S).abs() < 1e-3, "spacing {}", spacing);
    }

    #[test]
    fn test_spacing_not_inflated_by_sparse_letters() {
        // "abc" over "def": few adjacent pairs, many cell- and line-pitch pairs
        let dots: Vec<Centroid> = [
            (0.0, 0.0),
            (35.0, 0.0),
            (35.0, 10.0),
            (70.0, 0.0),
            (80.0, 0.0),
            (0.0, 45.0),
            (10.0, 45.0),
            (10.0, 55.0),
            (35.0, 45.0),
            (45.0, 55.0),
            (70.0, 45.0),
            (70.0, 55.0),
            (80.0, 45.0),
        ]
        .into_iter()
        .map(|(x, y)| Centroid::at(x, y))
        .collect();

        let spacing = estimate_spacing(&dots).unwrap();
        assert!((spacing - S).abs() < 1e-3, "spacing {}", spacing);
    }

    #[test]
    fn test_spacing_ignores_speck_next_to_dot() {
        let mut dots = full_cell(0.0, 0.0);
        dots.extend(full_cell(35.0, 0.0));
        dots.push(Centroid::at(2.0, 3.0));

        let spacing = estimate_spacing(&dots).unwrap();
        assert!((spacing - S).abs() < 1e-3, "spacing {}", spacing);
    }

    #[test]
    fn test_median_picks_upper_middle() {
        assert_eq!(median(vec![3.0, 1.0, 2.0, 4.0]), Some(3.0));
        assert_eq!(median(vec![]), None);
    }

    #[test]
    fn test_spacing_scales_with_coordinates() {
        let dots = full_cell(3.0, 4.0);
        let scaled: Vec<Centroid> = dots.iter().map(|c| Centroid::at(c.x * 3.5, c.y * 3.5)).collect();

        let a = estimate_spacing(&dots).unwrap();
        let b = estimate_spacing(&scaled).unwrap();
        assert!((b / a - 3.5).abs() < 1e-3);
    }

    #[test]
    fn test_spacing_rejects_coincident_dots() {
        let dots = [Centroid::at(5.0, 5.0), Centroid::at(5.0, 5.0)];
        assert!(matches!(
            estimate_spacing(&dots),
            Err(BrailleError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn test_spacing_needs_two_dots() {
        assert!(matches!(
            estimate_spacing(&[Centroid::at(1.0, 1.0)]),
            Err(BrailleError::InsufficientDots { found: 1 })
        ));
    }

    #[test]
    fn test_rows_keep_cell_dot_lines_together() {
        let mut dots = full_cell(0.0, 0.0);
        dots.extend(full_cell(40.0, 0.0));
        dots.extend(full_cell(0.0, 50.0));

        let rows = group_rows(&dots, S);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].centroids.len(), 12);
        assert_eq!(rows[1].centroids.len(), 6);
        assert!(rows[0].reference_y < rows[1].reference_y);
        assert!(rows[0]
            .centroids
            .windows(2)
            .all(|w| w[0].x <= w[1].x));
    }

    #[test]
    fn test_rows_independent_of_input_order() {
        let mut dots = full_cell(0.0, 0.0);
        dots.extend(full_cell(0.0, 50.0));
        let mut reversed = dots.clone();
        reversed.reverse();

        assert_eq!(group_rows(&dots, S), group_rows(&reversed, S));
    }

    #[test]
    fn test_cells_split_on_wide_gap() {
        let mut dots = full_cell(0.0, 0.0);
        dots.extend(full_cell(35.0, 0.0));
        dots.extend(full_cell(70.0, 0.0));
        let rows = group_rows(&dots, S);

        let cells = group_cells(&rows[0], S, 2.0).unwrap();

        assert_eq!(cells.len(), 3);
        assert!(cells.iter().all(|c| c.centroids.len() == 6));
        assert_eq!(cells[1].origin(), (35.0, 0.0));
    }

    #[test]
    fn test_cells_reject_empty_row() {
        let row = Row {
            reference_y: 0.0,
            centroids: vec![],
        };
        assert!(matches!(
            group_cells(&row, S, 2.0),
            Err(BrailleError::DegenerateGeometry(_))
        ));
    }
}
