//! Two-dimensional point sets used by the disk-shaped formation patterns.
//!
//! Every function in this module returns points of a *unit* lattice,
//! i.e. with a nearest-neighbour distance (or ring spacing) of 1.
//! The points are sorted by their distance to the origin, so taking
//! the first `count` points always yields the `count` points nearest
//! to the centre.
//!
//! Scaling the points to physical units, and mapping them onto
//! relative orbits, is done by [`FormationInitializer`][crate::FormationInitializer].

use core::cmp::Ordering;
use core::f64::consts::{PI, TAU};
use std::collections::HashSet;

use glam::DVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::PriorityQueue;

/// `sqrt(3) / 2`, the row height of a unit hexagonal lattice.
const HALF_SQRT_3: f64 = 0.866_025_403_784_438_6;

/// Safety cap on how many concentric rings are enumerated.
///
/// 4096 rings hold well over 50 million points.
const MAX_CONCENTRIC_RINGS: u32 = 4096;

/// A point of a planar lattice, in polar coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LatticePoint {
    /// Distance from the origin, in lattice units.
    pub radius: f64,
    /// Polar angle, in radians.
    pub angle: f64,
}

impl LatticePoint {
    fn from_cartesian(x: f64, y: f64) -> Self {
        Self {
            radius: x.hypot(y),
            angle: y.atan2(x),
        }
    }

    /// Converts the point into Cartesian coordinates.
    pub fn to_cartesian(self) -> DVec2 {
        let (sin, cos) = self.angle.sin_cos();
        DVec2::new(self.radius * cos, self.radius * sin)
    }
}

/// Integer lattice cell with its exact squared radius, used to sort
/// without floating-point ties.
#[derive(Clone, Copy, Debug)]
struct Cell {
    r_sq: i64,
    angle: f64,
    x: f64,
    y: f64,
}

impl Cell {
    fn cmp_by_radius(a: &Cell, b: &Cell) -> Ordering {
        a.r_sq.cmp(&b.r_sq).then(a.angle.total_cmp(&b.angle))
    }

    fn to_point(self) -> LatticePoint {
        LatticePoint::from_cartesian(self.x, self.y)
    }
}

/// Gets the `count` points of a unit hexagonal (honeycomb) lattice
/// nearest to the origin.
///
/// The lattice uses axial coordinates `(m, k)` with Cartesian position
/// `(m + k/2, k·√3/2)` and squared radius `m² + mk + k²`.
/// Hexagonal rings are enumerated outward until the `count`-th nearest
/// candidate is strictly nearer than anything the next ring could
/// contribute; the candidates are then sorted by radius (ties by angle)
/// and truncated.
///
/// # Example
/// ```
/// use hill_formation::lattice::hexagonal_points;
///
/// let points = hexagonal_points(7);
/// assert_eq!(points.len(), 7);
/// assert_eq!(points[0].radius, 0.0);
/// assert!(points[1..].iter().all(|p| (p.radius - 1.0).abs() < 1e-12));
/// ```
pub fn hexagonal_points(count: usize) -> Vec<LatticePoint> {
    if count == 0 {
        return Vec::new();
    }

    // Smallest ring index k such that the full hexagon
    // (3k² + 3k + 1 points) holds at least `count` points
    let min_rings = ((-3.0 + (12.0 * count as f64 - 3.0).sqrt()) / 6.0)
        .ceil()
        .max(0.0) as i64;

    let mut candidates: Vec<Cell> = Vec::new();
    let mut ring = 0i64;

    loop {
        push_hex_ring(&mut candidates, ring);

        if ring >= min_rings && candidates.len() >= count {
            // The next ring never comes closer than its inscribed
            // circle, of radius (ring + 1)·√3/2.
            let next = (ring + 1) as f64;
            let next_min_r_sq = 0.75 * next * next;

            let mut r_sqs: Vec<i64> = candidates.iter().map(|c| c.r_sq).collect();
            let (_, kth, _) = r_sqs.select_nth_unstable(count - 1);

            if (*kth as f64) < next_min_r_sq {
                break;
            }
        }

        ring += 1;
    }

    candidates.sort_by(Cell::cmp_by_radius);
    candidates.truncate(count);
    candidates.into_iter().map(Cell::to_point).collect()
}

/// Appends every cell at exactly hexagonal distance `ring` from the origin.
fn push_hex_ring(cells: &mut Vec<Cell>, ring: i64) {
    for m in -ring..=ring {
        let k_min = (-ring).max(-m - ring);
        let k_max = ring.min(-m + ring);

        for k in k_min..=k_max {
            let distance = (m.abs() + k.abs() + (m + k).abs()) / 2;
            if distance != ring {
                continue;
            }

            let x = m as f64 + 0.5 * k as f64;
            let y = HALF_SQRT_3 * k as f64;
            cells.push(Cell {
                r_sq: m * m + m * k + k * k,
                angle: y.atan2(x),
                x,
                y,
            });
        }
    }
}

/// Gets the `count` points of a unit square lattice nearest to the origin.
///
/// The lattice is explored best-first from the origin: the frontier is a
/// [`PriorityQueue`] keyed by squared radius (ties by angle), each popped
/// cell pushes its four neighbours, and a visited set keeps every cell
/// from being queued twice. Every cell but the origin has a neighbour
/// strictly closer to the origin, so cells come out in radius order.
///
/// # Example
/// ```
/// use hill_formation::lattice::square_points;
///
/// let points = square_points(5);
/// assert_eq!(points[0].radius, 0.0);
/// assert!(points[1..].iter().all(|p| (p.radius - 1.0).abs() < 1e-12));
/// ```
pub fn square_points(count: usize) -> Vec<LatticePoint> {
    let mut points = Vec::with_capacity(count);
    if count == 0 {
        return points;
    }

    let mut frontier = PriorityQueue::with_capacity(4 * count, Cell::cmp_by_radius);
    let mut visited: HashSet<(i64, i64)> = HashSet::with_capacity(4 * count);

    enqueue_square_cell(&mut frontier, &mut visited, 0, 0);

    while points.len() < count {
        let Some(cell) = frontier.pop() else {
            break;
        };
        points.push(cell.to_point());

        let (i, j) = (cell.x as i64, cell.y as i64);
        for (di, dj) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            enqueue_square_cell(&mut frontier, &mut visited, i + di, j + dj);
        }
    }

    points
}

fn enqueue_square_cell<F>(
    frontier: &mut PriorityQueue<Cell, F>,
    visited: &mut HashSet<(i64, i64)>,
    i: i64,
    j: i64,
) where
    F: Fn(&Cell, &Cell) -> Ordering,
{
    if visited.insert((i, j)) {
        let (x, y) = (i as f64, j as f64);
        frontier.push(Cell {
            r_sq: i * i + j * j,
            angle: y.atan2(x),
            x,
            y,
        });
    }
}

/// Gets `count` points laid out on concentric rings of unit spacing.
///
/// Ring 0 is the centre point. Ring `k` sits at radius `k` and holds
/// `max(6, floor(2πk))` evenly spaced nodes (its circumference divided
/// by the spacing), with odd rings rotated by half a node step.
/// Rings are filled outward until `count` points are placed; the outermost
/// ring may be partially filled.
///
/// If the ring cap is ever reached, the remainder is padded with
/// points at the origin.
///
/// # Example
/// ```
/// use hill_formation::lattice::concentric_points;
///
/// let points = concentric_points(7);
/// assert_eq!(points.len(), 7);
/// assert_eq!(points[0].radius, 0.0);
/// assert!(points[1..].iter().all(|p| p.radius == 1.0));
/// ```
pub fn concentric_points(count: usize) -> Vec<LatticePoint> {
    let mut points = Vec::with_capacity(count);
    if count == 0 {
        return points;
    }

    points.push(LatticePoint::default());

    let mut ring = 1u32;
    while points.len() < count && ring <= MAX_CONCENTRIC_RINGS {
        let radius = ring as f64;
        let nodes = ((TAU * radius).floor() as usize).max(6);
        let step = TAU / nodes as f64;
        let offset = if ring % 2 == 1 { 0.5 * step } else { 0.0 };

        for node in 0..nodes {
            if points.len() >= count {
                break;
            }
            points.push(LatticePoint {
                radius,
                angle: wrap_angle(offset + step * node as f64),
            });
        }

        ring += 1;
    }

    if points.len() < count {
        log::warn!(
            "concentric rings capped at {MAX_CONCENTRIC_RINGS}; padding {} points at the origin",
            count - points.len()
        );
        points.resize(count, LatticePoint::default());
    }

    points
}

/// Wraps an angle into (-π, π].
fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Gets the largest radius among the points, or 0 for an empty set.
pub fn max_radius(points: &[LatticePoint]) -> f64 {
    points.iter().map(|p| p.radius).fold(0.0, f64::max)
}
