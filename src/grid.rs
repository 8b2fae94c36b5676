// Fixed-point coordinate grid.
//
// Coordinates on the wire are integer grid units; a block-wide granularity
// (nanodegrees per unit) and per-axis offsets map them to degrees. The
// decode direction is the canonical transform; the encode direction is its
// rounding inverse, so a round trip stays within half a grid step.

/// Nanodegree scale factor (decode direction).
const NANO: f64 = 1e-9;

/// Degrees to nanodegrees (encode direction).
const NANOS_PER_DEGREE: f64 = 1e9;

/// Grid parameters for one block, supplied by the surrounding block layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    /// Nanodegrees per coordinate unit. Must be positive.
    pub granularity: i32,
    /// Latitude grid offset, nanodegrees.
    pub lat_offset: i64,
    /// Longitude grid offset, nanodegrees.
    pub lon_offset: i64,
}

impl Default for Grid {
    /// The format's default grid: 100 nanodegree granularity, zero offsets.
    fn default() -> Self {
        Self {
            granularity: 100,
            lat_offset: 0,
            lon_offset: 0,
        }
    }
}

impl Grid {
    pub fn new(granularity: i32, lat_offset: i64, lon_offset: i64) -> Self {
        debug_assert!(granularity > 0, "granularity must be positive");
        Self {
            granularity,
            lat_offset,
            lon_offset,
        }
    }

    fn to_degrees(&self, offset: i64, unit: i64) -> f64 {
        let nanos = offset.wrapping_add(i64::from(self.granularity).wrapping_mul(unit));
        NANO * nanos as f64
    }

    fn to_unit(&self, offset: i64, degrees: f64) -> i64 {
        ((degrees * NANOS_PER_DEGREE - offset as f64) / f64::from(self.granularity)).round() as i64
    }

    /// Grid unit on the latitude axis to degrees.
    pub fn lat_to_degrees(&self, unit: i64) -> f64 {
        self.to_degrees(self.lat_offset, unit)
    }

    /// Grid unit on the longitude axis to degrees.
    pub fn lon_to_degrees(&self, unit: i64) -> f64 {
        self.to_degrees(self.lon_offset, unit)
    }

    /// Degrees to the nearest latitude grid unit.
    pub fn lat_to_unit(&self, degrees: f64) -> i64 {
        self.to_unit(self.lat_offset, degrees)
    }

    /// Degrees to the nearest longitude grid unit.
    pub fn lon_to_unit(&self, degrees: f64) -> i64 {
        self.to_unit(self.lon_offset, degrees)
    }

    /// Absolute degree error bound of one encode/decode round trip.
    pub fn tolerance(&self) -> f64 {
        NANO * f64::from(self.granularity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_examples() {
        let grid = Grid::default();
        assert!((grid.lat_to_degrees(500_000_000) - 50.0).abs() < 1e-9);
        assert!((grid.lat_to_degrees(500_001_000) - 50.0001).abs() < 1e-9);
    }

    #[test]
    fn encode_is_inverse_of_decode() {
        let grid = Grid::default();
        for &deg in &[-89.5, -0.000001, 0.0, 47.3978, 90.0] {
            let unit = grid.lat_to_unit(deg);
            assert!((grid.lat_to_degrees(unit) - deg).abs() <= grid.tolerance());
        }
    }

    #[test]
    fn offsets_shift_the_grid() {
        let grid = Grid::new(100, 1_000, -2_000);
        assert!((grid.lat_to_degrees(0) - 1e-6).abs() < 1e-12);
        assert!((grid.lon_to_degrees(0) + 2e-6).abs() < 1e-12);

        let unit = grid.lon_to_unit(8.5);
        assert!((grid.lon_to_degrees(unit) - 8.5).abs() <= grid.tolerance());
    }

    #[test]
    fn both_axes_use_their_own_source() {
        // Asymmetric offsets make an axis mix-up observable.
        let grid = Grid::new(100, 5_000_000, -5_000_000);
        let lat_unit = grid.lat_to_unit(10.0);
        let lon_unit = grid.lon_to_unit(10.0);
        assert_ne!(lat_unit, lon_unit);
        assert!((grid.lat_to_degrees(lat_unit) - 10.0).abs() <= grid.tolerance());
        assert!((grid.lon_to_degrees(lon_unit) - 10.0).abs() <= grid.tolerance());
    }
}
