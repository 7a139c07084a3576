use crate::map::artwork::Bounds;
use glam::DVec2;
use std::collections::HashMap;

/// Spatial hash grid for pointer-to-region hit testing. Regions are indexed
/// by bounding box into fixed-size cells; a point query yields candidate
/// region indices for exact point-in-polygon testing.
pub struct RegionIndex {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl RegionIndex {
    /// Build the grid from region bounding boxes. `cell_size` is in artwork
    /// units; each region lands in every cell its bbox touches.
    pub fn build(bboxes: &[Bounds], cell_size: f64) -> Self {
        let mut cells: HashMap<(i32, i32), Vec<usize>> = HashMap::new();

        for (idx, bbox) in bboxes.iter().enumerate() {
            if !bbox.is_valid() {
                continue;
            }
            let (x0, y0) = to_cell(bbox.min, cell_size);
            let (x1, y1) = to_cell(bbox.max, cell_size);
            for cy in y0..=y1 {
                for cx in x0..=x1 {
                    cells.entry((cx, cy)).or_default().push(idx);
                }
            }
        }

        Self { cells, cell_size }
    }

    /// Candidate region indices whose bbox cell contains the point.
    pub fn candidates(&self, p: DVec2) -> &[usize] {
        self.cells
            .get(&to_cell(p, self.cell_size))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[inline(always)]
fn to_cell(p: DVec2, cell_size: f64) -> (i32, i32) {
    (
        (p.x / cell_size).floor() as i32,
        (p.y / cell_size).floor() as i32,
    )
}

/// Even-odd point-in-polygon test over a set of rings. Holes are additional
/// rings: a point inside an odd number of rings is inside the region.
pub fn point_in_rings(rings: &[Vec<DVec2>], p: DVec2) -> bool {
    let mut inside = false;

    for ring in rings {
        if ring.len() < 3 {
            continue;
        }
        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let (a, b) = (ring[i], ring[j]);
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    inside = !inside;
                }
            }
            j = i;
        }
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(x0, y0),
            DVec2::new(x1, y0),
            DVec2::new(x1, y1),
            DVec2::new(x0, y1),
        ]
    }

    #[test]
    fn point_in_simple_square() {
        let rings = vec![square(0.0, 0.0, 10.0, 10.0)];
        assert!(point_in_rings(&rings, DVec2::new(5.0, 5.0)));
        assert!(!point_in_rings(&rings, DVec2::new(15.0, 5.0)));
        assert!(!point_in_rings(&rings, DVec2::new(-1.0, -1.0)));
    }

    #[test]
    fn hole_excludes_interior() {
        let rings = vec![square(0.0, 0.0, 10.0, 10.0), square(4.0, 4.0, 6.0, 6.0)];
        assert!(point_in_rings(&rings, DVec2::new(2.0, 2.0)));
        assert!(!point_in_rings(&rings, DVec2::new(5.0, 5.0)));
    }

    #[test]
    fn grid_narrows_candidates() {
        let bboxes = vec![
            Bounds::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0)),
            Bounds::new(DVec2::new(100.0, 100.0), DVec2::new(110.0, 110.0)),
        ];
        let index = RegionIndex::build(&bboxes, 20.0);
        assert_eq!(index.candidates(DVec2::new(5.0, 5.0)), &[0]);
        assert_eq!(index.candidates(DVec2::new(105.0, 105.0)), &[1]);
        assert!(index.candidates(DVec2::new(55.0, 55.0)).is_empty());
    }

    #[test]
    fn degenerate_rings_never_match() {
        let rings = vec![vec![DVec2::new(1.0, 1.0), DVec2::new(2.0, 2.0)]];
        assert!(!point_in_rings(&rings, DVec2::new(1.5, 1.5)));
    }
}
