//! Regular sampling grid over a bounding area

use crate::{CoverageError, Result};
use geodesy::{GeoArea, GeoPoint};

/// `(resolution + 1)²` sample points, indexed row-major: index = i·side + j,
/// latitude advancing with `i`, longitude with `j`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    origin: GeoPoint,
    lat_step: f64,
    lng_step: f64,
    resolution: u32,
    side: usize,
    len: usize,
}

impl Grid {
    pub fn new(area: &GeoArea, resolution: u32) -> Result<Self> {
        if resolution == 0 {
            return Err(CoverageError::InvalidGridResolution(resolution));
        }

        let side = (resolution as usize)
            .checked_add(1)
            .ok_or(CoverageError::InvalidGridResolution(resolution))?;
        let len = side
            .checked_mul(side)
            .ok_or(CoverageError::InvalidGridResolution(resolution))?;

        Ok(Self {
            origin: area.south_west,
            lat_step: area.latitude_span() / resolution as f64,
            lng_step: area.longitude_span() / resolution as f64,
            resolution,
            side,
            len,
        })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Points per axis
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn point(&self, index: usize) -> GeoPoint {
        let i = index / self.side;
        let j = index % self.side;
        GeoPoint::new(
            self.origin.latitude + i as f64 * self.lat_step,
            self.origin.longitude + j as f64 * self.lng_step,
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        (0..self.len).map(move |index| self.point(index))
    }
}
