//! Coordinate reprojection between planar and geographic systems.

mod lambert;

pub use lambert::{ConicParameters, Ellipsoid, LambertConformalConic, GRS80, LAMBERT_93};

use geo::{Coord, Point};

/// Converts a projected coordinate pair into a geographic lon/lat point.
///
/// Implementations must be pure: the same input always yields the same output.
pub trait Reprojector: Send + Sync {
    fn to_geographic(&self, projected: Coord<f64>) -> Point<f64>;
}
