//! Ellipsoidal Lambert conformal conic projection (two standard parallels).
//!
//! Formulas follow Snyder, "Map Projections: A Working Manual", p. 107-109.

use geo::{Coord, Point};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::Reprojector;

const MAX_ITERATIONS: usize = 15;
const CONVERGENCE: f64 = 1e-12;

/// Reference ellipsoid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub semi_major_axis: f64,
    pub inverse_flattening: f64,
}

impl Ellipsoid {
    pub fn eccentricity(&self) -> f64 {
        let f = 1.0 / self.inverse_flattening;
        (2.0 * f - f * f).sqrt()
    }
}

/// GRS80, used by RGF93. Its datum coincides with WGS84 at the precision we
/// need, so geographic output is usable as WGS84 directly.
pub const GRS80: Ellipsoid = Ellipsoid {
    semi_major_axis: 6_378_137.0,
    inverse_flattening: 298.257_222_101,
};

/// Projection definition, angles in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicParameters {
    pub ellipsoid: Ellipsoid,
    pub standard_parallel_1: f64,
    pub standard_parallel_2: f64,
    pub latitude_of_origin: f64,
    pub central_meridian: f64,
    pub false_easting: f64,
    pub false_northing: f64,
}

/// RGF93 / Lambert-93 (EPSG:2154)
pub const LAMBERT_93: ConicParameters = ConicParameters {
    ellipsoid: GRS80,
    standard_parallel_1: 49.0,
    standard_parallel_2: 44.0,
    latitude_of_origin: 46.5,
    central_meridian: 3.0,
    false_easting: 700_000.0,
    false_northing: 6_600_000.0,
};

/// Precomputed projection constants
#[derive(Debug, Clone, Copy)]
pub struct LambertConformalConic {
    e: f64,
    n: f64,
    /// `a * F` in Snyder's notation
    scale: f64,
    rho0: f64,
    lon0: f64,
    x0: f64,
    y0: f64,
}

impl LambertConformalConic {
    pub fn new(params: ConicParameters) -> Self {
        let a = params.ellipsoid.semi_major_axis;
        let e = params.ellipsoid.eccentricity();

        let phi1 = params.standard_parallel_1.to_radians();
        let phi2 = params.standard_parallel_2.to_radians();
        let phi0 = params.latitude_of_origin.to_radians();

        let m1 = m(phi1, e);
        let m2 = m(phi2, e);
        let t1 = t(phi1, e);
        let t2 = t(phi2, e);

        let n = if (phi1 - phi2).abs() < f64::EPSILON {
            phi1.sin()
        } else {
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        };
        let scale = a * m1 / (n * t1.powf(n));
        let rho0 = scale * t(phi0, e).powf(n);

        Self {
            e,
            n,
            scale,
            rho0,
            lon0: params.central_meridian.to_radians(),
            x0: params.false_easting,
            y0: params.false_northing,
        }
    }

    pub fn lambert93() -> Self {
        Self::new(LAMBERT_93)
    }

    /// Geographic (lon, lat in degrees) to projected (x, y in metres)
    pub fn forward(&self, position: Point<f64>) -> Coord<f64> {
        let lon = position.x().to_radians();
        let lat = position.y().to_radians();

        let rho = self.scale * t(lat, self.e).powf(self.n);
        let theta = self.n * (lon - self.lon0);

        Coord {
            x: self.x0 + rho * theta.sin(),
            y: self.y0 + self.rho0 - rho * theta.cos(),
        }
    }

    /// Projected (x, y in metres) to geographic (lon, lat in degrees)
    pub fn inverse(&self, projected: Coord<f64>) -> Point<f64> {
        let dx = projected.x - self.x0;
        let dy = self.rho0 - (projected.y - self.y0);

        let sign = self.n.signum();
        let rho = sign * dx.hypot(dy);
        let theta = (sign * dx).atan2(sign * dy);
        let t = (rho / self.scale).powf(1.0 / self.n);

        let lon = theta / self.n + self.lon0;

        let mut lat = FRAC_PI_2 - 2.0 * t.atan();
        for _ in 0..MAX_ITERATIONS {
            let es = self.e * lat.sin();
            let next = FRAC_PI_2 - 2.0 * (t * ((1.0 - es) / (1.0 + es)).powf(self.e / 2.0)).atan();
            let delta = (next - lat).abs();
            lat = next;
            if delta < CONVERGENCE {
                break;
            }
        }

        Point::new(lon.to_degrees(), lat.to_degrees())
    }
}

impl Reprojector for LambertConformalConic {
    fn to_geographic(&self, projected: Coord<f64>) -> Point<f64> {
        self.inverse(projected)
    }
}

fn m(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    phi.cos() / (1.0 - es * es).sqrt()
}

fn t(phi: f64, e: f64) -> f64 {
    let es = e * phi.sin();
    (FRAC_PI_4 - phi / 2.0).tan() / ((1.0 - es) / (1.0 + es)).powf(e / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEGREE_TOLERANCE: f64 = 1e-9;

    fn assert_close(actual: Point<f64>, lon: f64, lat: f64) {
        assert!(
            (actual.x() - lon).abs() < DEGREE_TOLERANCE && (actual.y() - lat).abs() < DEGREE_TOLERANCE,
            "expected ({}, {}), got ({}, {})",
            lon,
            lat,
            actual.x(),
            actual.y()
        );
    }

    #[test]
    fn test_origin_maps_to_projection_center() {
        let proj = LambertConformalConic::lambert93();
        let p = proj.inverse(Coord {
            x: 700_000.0,
            y: 6_600_000.0,
        });
        assert_close(p, 3.0, 46.5);
    }

    #[test]
    fn test_known_antenna_sites() {
        let proj = LambertConformalConic::lambert93();

        // Ouessant
        let p = proj.to_geographic(Coord {
            x: 102_980.0,
            y: 6_847_973.0,
        });
        assert_close(p, -5.08885611530134, 48.4565745588299);

        // Île-Molène
        let p = proj.to_geographic(Coord {
            x: 112_032.0,
            y: 6_840_427.0,
        });
        assert_close(p, -4.956781637814166, 48.39729748137953);
    }

    #[test]
    fn test_forward_paris() {
        let proj = LambertConformalConic::lambert93();
        let c = proj.forward(Point::new(2.3522, 48.8566));
        assert!((c.x - 652_469.02).abs() < 0.01, "x = {}", c.x);
        assert!((c.y - 6_862_035.26).abs() < 0.01, "y = {}", c.y);
    }

    #[test]
    fn test_round_trip_is_sub_metre() {
        let proj = LambertConformalConic::lambert93();
        for x in (100_000..=1_200_000).step_by(110_000) {
            for y in (6_050_000..=7_100_000).step_by(105_000) {
                let original = Coord {
                    x: x as f64,
                    y: y as f64,
                };
                let back = proj.forward(proj.inverse(original));
                let error = (back.x - original.x).hypot(back.y - original.y);
                assert!(error < 1e-3, "round trip error {} m at {:?}", error, original);
            }
        }
    }
}
