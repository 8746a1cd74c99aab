//! Operating-region geometry in the `(Vgse, Vds)` plane.
//!
//! For `Vds >= 0` the plane splits into cutoff (`Vgse < 0`), saturation
//! (`0 <= Vgse <= Vds`) and linear (`0 <= Vds <= Vgse`). [`partition`] cuts a
//! box into convex pieces that each lie in a single region, so every piece
//! can be bounded with the quadratic form of its region.

use crate::interval::Interval;

/// A point `(Vgse, Vds)`.
pub type Point = [f64; 2];

/// Operating region of an n-type device with `Vds >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Cutoff,
    Saturation,
    Linear,
}

/// A convex polygon lying in one region, vertices counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPiece {
    pub region: Region,
    pub polygon: Vec<Point>,
}

impl RegionPiece {
    fn new(region: Region, polygon: Vec<Point>) -> Self {
        Self {
            region,
            polygon: dedup_ring(polygon),
        }
    }

    /// Range of `Vgse` covered by the piece.
    pub fn vgse_extent(&self) -> (f64, f64) {
        self.polygon
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[0]), hi.max(p[0]))
            })
    }

    /// Check whether `point` lies in the piece, allowing `tol` of slack
    /// across every edge.
    pub fn contains(&self, point: Point, tol: f64) -> bool {
        let n = self.polygon.len();
        if n == 1 {
            let p = self.polygon[0];
            return (p[0] - point[0]).abs() <= tol && (p[1] - point[1]).abs() <= tol;
        }
        (0..n).all(|i| {
            let p = self.polygon[i];
            let q = self.polygon[(i + 1) % n];
            let edge = [q[0] - p[0], q[1] - p[1]];
            let len = edge[0].hypot(edge[1]);
            if len == 0.0 {
                return true;
            }
            let cross = edge[0] * (point[1] - p[1]) - edge[1] * (point[0] - p[0]);
            cross / len >= -tol
        })
    }
}

/// Corners of the box `vgse × vds`, counter-clockwise from the lower left.
pub fn rectangle(vgse: Interval, vds: Interval) -> Vec<Point> {
    vec![
        [vgse.lo(), vds.lo()],
        [vgse.hi(), vds.lo()],
        [vgse.hi(), vds.hi()],
        [vgse.lo(), vds.hi()],
    ]
}

/// Intersections of the line `a·x + b·y = c` with the edges of `polygon`,
/// visited in order.
///
/// An intersection is kept when it lies within the coordinate range of its
/// edge. Denominators smaller than `eps` in magnitude are replaced by `eps`
/// so parallel edges produce far-away points that get filtered out. A line
/// through a vertex reports it once per adjacent edge.
pub fn intersection(line: [f64; 3], polygon: &[Point], eps: f64) -> Vec<Point> {
    let [a, b, c] = line;
    let n = polygon.len();
    let mut hits = Vec::new();
    for i in 0..n {
        let p = polygon[i];
        let q = polygon[(i + 1) % n];
        let (x_lo, x_hi) = (p[0].min(q[0]), p[0].max(q[0]));
        let (y_lo, y_hi) = (p[1].min(q[1]), p[1].max(q[1]));

        let hit = if q[0] - p[0] == 0.0 {
            let x = p[0];
            [x, (c - a * x) / guard(b, eps)]
        } else {
            let m = (q[1] - p[1]) / (q[0] - p[0]);
            let k = p[1] - m * p[0];
            let x = (c - b * k) / guard(a + b * m, eps);
            [x, m * x + k]
        };

        if x_lo <= hit[0] && hit[0] <= x_hi && y_lo <= hit[1] && hit[1] <= y_hi {
            hits.push(hit);
        }
    }
    hits
}

fn guard(den: f64, eps: f64) -> f64 {
    if den.abs() < eps {
        eps.copysign(den)
    } else {
        den
    }
}

/// Split the box `vgse × vds` (with `vds.lo() >= 0`) into single-region pieces
/// that together cover it.
///
/// The cutoff part `Vgse < 0` is cut off first. The rest is cut by the line
/// `Vgse = Vds`; points on the line belong to both the saturation and the
/// linear piece.
pub fn partition(vgse: Interval, vds: Interval, eps: f64) -> Vec<RegionPiece> {
    if vgse.hi() <= 0.0 {
        return vec![RegionPiece::new(Region::Cutoff, rectangle(vgse, vds))];
    }

    let mut pieces = Vec::with_capacity(3);
    let active = if vgse.lo() < 0.0 {
        pieces.push(RegionPiece::new(
            Region::Cutoff,
            rectangle(Interval::new(vgse.lo(), 0.0), vds),
        ));
        Interval::new(0.0, vgse.hi())
    } else {
        vgse
    };

    let (g0, g1) = (active.lo(), active.hi());
    let (d0, d1) = (vds.lo(), vds.hi());
    if d0 >= g1 {
        pieces.push(RegionPiece::new(Region::Saturation, rectangle(active, vds)));
        return pieces;
    }
    if d1 <= g0 {
        pieces.push(RegionPiece::new(Region::Linear, rectangle(active, vds)));
        return pieces;
    }

    let hits = intersection([-1.0, 1.0, 0.0], &rectangle(active, vds), eps);
    let lower = hits
        .iter()
        .copied()
        .min_by(|p, q| p[0].total_cmp(&q[0]));
    let upper = hits
        .iter()
        .copied()
        .max_by(|p, q| p[0].total_cmp(&q[0]));
    let (Some(lower), Some(upper)) = (lower, upper) else {
        // The diagonal crosses the box whenever d0 < g1 and g0 < d1.
        tracing::warn!(%active, %vds, "no region boundary found; relaxing both regions over the box");
        pieces.push(RegionPiece::new(Region::Saturation, rectangle(active, vds)));
        pieces.push(RegionPiece::new(Region::Linear, rectangle(active, vds)));
        return pieces;
    };

    // lower sits on the left or bottom edge, upper on the top or right edge
    let lower_on_left = lower[1] > d0;
    let upper_on_right = upper[1] < d1;

    let mut linear = vec![lower];
    if lower_on_left {
        linear.push([g0, d0]);
    }
    linear.push([g1, d0]);
    if !upper_on_right {
        linear.push([g1, d1]);
    }
    linear.push(upper);

    let mut saturation = vec![lower, upper];
    if upper_on_right {
        saturation.push([g1, d1]);
    }
    saturation.push([g0, d1]);
    if !lower_on_left {
        saturation.push([g0, d0]);
    }

    pieces.push(RegionPiece::new(Region::Saturation, saturation));
    pieces.push(RegionPiece::new(Region::Linear, linear));
    pieces
}

/// Drop repeated consecutive vertices, including a repeat of the first
/// vertex at the end.
fn dedup_ring(mut points: Vec<Point>) -> Vec<Point> {
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn box_of(g: (f64, f64), d: (f64, f64)) -> (Interval, Interval) {
        (Interval::new(g.0, g.1), Interval::new(d.0, d.1))
    }

    fn regions(pieces: &[RegionPiece]) -> Vec<Region> {
        pieces.iter().map(|p| p.region).collect()
    }

    #[test]
    fn test_intersection_diagonal_unit_square() {
        let square = rectangle(Interval::new(0.0, 1.0), Interval::new(0.0, 1.0));
        let hits = intersection([-1.0, 1.0, 0.0], &square, EPS);
        assert!(!hits.is_empty());
        assert!(hits.contains(&[0.0, 0.0]) || hits.contains(&[-0.0, 0.0]));
        assert!(hits.contains(&[1.0, 1.0]));
    }

    #[test]
    fn test_intersection_misses() {
        let square = rectangle(Interval::new(2.0, 3.0), Interval::new(0.0, 1.0));
        assert!(intersection([-1.0, 1.0, 0.0], &square, EPS).is_empty());
    }

    #[test]
    fn test_single_region_boxes() {
        let (g, d) = box_of((-1.0, -0.5), (0.0, 1.0));
        assert_eq!(regions(&partition(g, d, EPS)), vec![Region::Cutoff]);

        let (g, d) = box_of((0.0, 0.5), (1.0, 2.0));
        assert_eq!(regions(&partition(g, d, EPS)), vec![Region::Saturation]);

        let (g, d) = box_of((1.0, 2.0), (0.0, 0.5));
        assert_eq!(regions(&partition(g, d, EPS)), vec![Region::Linear]);
    }

    #[test]
    fn test_unit_square_splits_into_triangles() {
        let (g, d) = box_of((0.0, 1.0), (0.0, 1.0));
        let pieces = partition(g, d, EPS);
        assert_eq!(regions(&pieces), vec![Region::Saturation, Region::Linear]);
        assert_eq!(pieces[0].polygon.len(), 3);
        assert_eq!(pieces[1].polygon.len(), 3);
        // The corner on the boundary belongs to the linear piece.
        assert!(pieces[1].polygon.contains(&[1.0, 1.0]));
    }

    #[test]
    fn test_three_way_split() {
        let (g, d) = box_of((-0.5, 1.5), (0.2, 1.0));
        let pieces = partition(g, d, EPS);
        assert_eq!(
            regions(&pieces),
            vec![Region::Cutoff, Region::Saturation, Region::Linear]
        );
    }

    #[test]
    fn test_pieces_tile_the_box() {
        let boxes = [
            box_of((-0.5, 1.5), (0.2, 1.0)),
            box_of((0.0, 1.0), (0.0, 1.0)),
            box_of((0.3, 0.9), (0.0, 2.0)),
            box_of((-1.0, 0.4), (0.1, 0.3)),
            box_of((0.0, 2.0), (0.5, 0.6)),
        ];
        for (g, d) in boxes {
            let pieces = partition(g, d, EPS);
            for i in 0..=20 {
                for j in 0..=20 {
                    let x = g.lo() + g.width() * i as f64 / 20.0;
                    let y = d.lo() + d.width() * j as f64 / 20.0;
                    assert!(
                        pieces.iter().any(|p| p.contains([x, y], 1e-9)),
                        "({x}, {y}) not covered for {g} × {d}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_pieces_respect_their_region() {
        let (g, d) = box_of((-0.5, 1.5), (0.2, 1.0));
        for piece in partition(g, d, EPS) {
            for v in &piece.polygon {
                match piece.region {
                    Region::Cutoff => assert!(v[0] <= 0.0),
                    Region::Saturation => assert!(v[0] >= 0.0 && v[0] <= v[1] + 1e-12),
                    Region::Linear => assert!(v[1] <= v[0] + 1e-12),
                }
            }
        }
    }
}
