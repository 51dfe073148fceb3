//! Transverse Mercator on the GRS80 ellipsoid, parameterized for MGA zones.
//!
//! Map Grid of Australia (MGA) is UTM on GDA94/GDA2020: 6° zones,
//! scale factor 0.9996 on the central meridian, false easting 500 km and
//! false northing 10 000 km (southern hemisphere).
//!
//! Series expansions follow Snyder, "Map Projections: A Working Manual"
//! (USGS PP 1395), §8; accurate to a few centimeters within a zone.

use crate::ProjectionError;

/// GRS80 semi-major axis (meters)
const A: f64 = 6_378_137.0;
/// GRS80 flattening
const F: f64 = 1.0 / 298.257_222_101;
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING: f64 = 10_000_000.0;

/// A single MGA zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MgaZone {
    pub zone: u8,
    /// Central meridian in degrees
    pub lon0: f64,
}

impl MgaZone {
    /// Zone parameters; MGA covers zones 46 to 59.
    pub fn new(zone: u8) -> Result<Self, ProjectionError> {
        if !(46..=59).contains(&zone) {
            return Err(ProjectionError::OutOfRange(format!(
                "MGA zone {} does not exist",
                zone
            )));
        }
        Ok(Self {
            zone,
            lon0: f64::from(zone) * 6.0 - 183.0,
        })
    }

    /// Grid (easting, northing) to geographic (lon, lat) degrees.
    pub fn inverse(&self, easting: f64, northing: f64) -> Result<(f64, f64), ProjectionError> {
        if !easting.is_finite() || !northing.is_finite() {
            return Err(ProjectionError::NonFinite);
        }

        let e2 = F * (2.0 - F);
        let ep2 = e2 / (1.0 - e2);
        let x = easting - FALSE_EASTING;
        let y = northing - FALSE_NORTHING;

        let m = y / K0;
        let mu = m / (A * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

        let sqrt_1_e2 = (1.0 - e2).sqrt();
        let e1 = (1.0 - sqrt_1_e2) / (1.0 + sqrt_1_e2);

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        if phi1.abs() >= std::f64::consts::FRAC_PI_2 {
            return Err(ProjectionError::Undefined(format!(
                "northing {} lies beyond the pole",
                northing
            )));
        }

        let sin_phi1 = phi1.sin();
        let cos_phi1 = phi1.cos();
        let tan_phi1 = phi1.tan();

        let c1 = ep2 * cos_phi1.powi(2);
        let t1 = tan_phi1.powi(2);
        let n1 = A / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
        let r1 = A * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
        let d = x / (n1 * K0);

        let lat = phi1
            - (n1 * tan_phi1 / r1)
                * (d.powi(2) / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4)
                        / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                        - 252.0 * ep2
                        - 3.0 * c1.powi(2))
                        * d.powi(6)
                        / 720.0);

        let lon = self.lon0.to_radians()
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
                    * d.powi(5)
                    / 120.0)
                / cos_phi1;

        Ok((lon.to_degrees(), lat.to_degrees()))
    }

    /// Geographic (lon, lat) degrees to grid (easting, northing).
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> Result<(f64, f64), ProjectionError> {
        if !lon_deg.is_finite() || !lat_deg.is_finite() {
            return Err(ProjectionError::NonFinite);
        }
        if lat_deg.abs() >= 90.0 {
            return Err(ProjectionError::Undefined(format!(
                "latitude {} is a pole",
                lat_deg
            )));
        }

        let e2 = F * (2.0 - F);
        let ep2 = e2 / (1.0 - e2);
        let lat = lat_deg.to_radians();
        let dlon = (lon_deg - self.lon0).to_radians();

        let sin_lat = lat.sin();
        let cos_lat = lat.cos();
        let tan_lat = lat.tan();

        let n = A / (1.0 - e2 * sin_lat.powi(2)).sqrt();
        let t = tan_lat.powi(2);
        let c = ep2 * cos_lat.powi(2);
        let a = dlon * cos_lat;

        let m = A
            * ((1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0) * lat
                - (3.0 * e2 / 8.0 + 3.0 * e2.powi(2) / 32.0 + 45.0 * e2.powi(3) / 1024.0)
                    * (2.0 * lat).sin()
                + (15.0 * e2.powi(2) / 256.0 + 45.0 * e2.powi(3) / 1024.0) * (4.0 * lat).sin()
                - (35.0 * e2.powi(3) / 3072.0) * (6.0 * lat).sin());

        let x = K0
            * n
            * (a + (1.0 - t + c) * a.powi(3) / 6.0
                + (5.0 - 18.0 * t + t.powi(2) + 72.0 * c - 58.0 * ep2) * a.powi(5) / 120.0);

        let y = K0
            * (m + n
                * tan_lat
                * (a.powi(2) / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c.powi(2)) * a.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t.powi(2) + 600.0 * c - 330.0 * ep2) * a.powi(6)
                        / 720.0));

        Ok((x + FALSE_EASTING, y + FALSE_NORTHING))
    }
}
