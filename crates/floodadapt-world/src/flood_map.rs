//! Flood-map lookup service.
//!
//! The simulation only ever asks one question of a flood map: what is the
//! raw (signed) water depth at this point? Reading GeoTIFFs or shapefiles
//! is out of scope; maps here live in memory and are built from
//! configuration or supplied by the caller as a closure.

use floodadapt_types::Point;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::WorldError;

/// Tolerance used when matching a raster cell against its `nodata` value.
const NODATA_TOLERANCE: f64 = 1e-9;

/// Raw flood depth lookup.
///
/// The returned depth may be negative when the location sits above the
/// flood level; callers clamp it.
pub trait FloodMap {
    /// Raw depth in metres at `location`.
    fn depth_at(&self, location: Point) -> f64;
}

impl<F> FloodMap for F
where
    F: Fn(Point) -> f64,
{
    fn depth_at(&self, location: Point) -> f64 {
        self(location)
    }
}

/// The same depth everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformFloodMap {
    /// Depth returned for every location.
    pub depth: f64,
}

impl FloodMap for UniformFloodMap {
    fn depth_at(&self, _location: Point) -> f64 {
        self.depth
    }
}

/// A north-up raster of depths.
///
/// `origin` is the top-left corner of the top-left cell. Rows run
/// southwards, columns eastwards. Points outside the raster and cells
/// holding `nodata` read as depth 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterFloodMap {
    origin: Point,
    cell_size: f64,
    columns: usize,
    rows: usize,
    depths: Vec<f64>,
    #[serde(default)]
    nodata: Option<f64>,
}

impl RasterFloodMap {
    /// Build a raster from row-major depths.
    pub fn new(
        origin: Point,
        cell_size: f64,
        columns: usize,
        rows: usize,
        depths: Vec<f64>,
        nodata: Option<f64>,
    ) -> Result<Self, WorldError> {
        let raster = Self {
            origin,
            cell_size,
            columns,
            rows,
            depths,
            nodata,
        };
        raster.validate()?;
        Ok(raster)
    }

    /// Check dimensions and cell size.
    pub fn validate(&self) -> Result<(), WorldError> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(WorldError::InvalidRaster {
                reason: format!("cell_size must be positive, got {}", self.cell_size),
            });
        }
        if !(self.origin.x.is_finite() && self.origin.y.is_finite()) {
            return Err(WorldError::InvalidRaster {
                reason: "origin must be finite".to_owned(),
            });
        }
        let expected = self
            .columns
            .checked_mul(self.rows)
            .ok_or_else(|| WorldError::InvalidRaster {
                reason: "raster dimensions overflow".to_owned(),
            })?;
        if expected != self.depths.len() {
            return Err(WorldError::InvalidRaster {
                reason: format!(
                    "expected {expected} depths for {}x{} raster, got {}",
                    self.columns,
                    self.rows,
                    self.depths.len()
                ),
            });
        }
        Ok(())
    }

    /// Row-major index of the cell containing `location`, if any.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn cell_index(&self, location: Point) -> Option<usize> {
        let col = ((location.x - self.origin.x) / self.cell_size).floor();
        let row = ((self.origin.y - location.y) / self.cell_size).floor();
        if !(col.is_finite() && row.is_finite()) || col < 0.0 || row < 0.0 {
            return None;
        }
        // Float-to-int `as` saturates; the bounds checks below reject anything past the edge.
        let (col, row) = (col as usize, row as usize);
        if col >= self.columns || row >= self.rows {
            return None;
        }
        row.checked_mul(self.columns)?.checked_add(col)
    }
}

impl FloodMap for RasterFloodMap {
    fn depth_at(&self, location: Point) -> f64 {
        let Some(depth) = self
            .cell_index(location)
            .and_then(|index| self.depths.get(index).copied())
        else {
            warn!(x = location.x, y = location.y, "Location outside flood raster");
            return 0.0;
        };
        match self.nodata {
            Some(nodata) if (depth - nodata).abs() < NODATA_TOLERANCE => 0.0,
            _ => depth,
        }
    }
}

/// Flood map as described in the simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FloodMapConfig {
    /// One depth everywhere.
    Uniform {
        /// Depth in metres.
        depth: f64,
    },
    /// An inline raster.
    Raster(RasterFloodMap),
}

impl Default for FloodMapConfig {
    fn default() -> Self {
        Self::Uniform { depth: 0.5 }
    }
}

impl FloodMapConfig {
    /// Check the configured map.
    pub fn validate(&self) -> Result<(), WorldError> {
        match self {
            Self::Uniform { depth } if !depth.is_finite() => Err(WorldError::InvalidRaster {
                reason: "uniform depth must be finite".to_owned(),
            }),
            Self::Uniform { .. } => Ok(()),
            Self::Raster(raster) => raster.validate(),
        }
    }

    /// Build the lookup service.
    pub fn build(&self) -> Result<Box<dyn FloodMap + Send + Sync>, WorldError> {
        self.validate()?;
        Ok(match self {
            Self::Uniform { depth } => Box::new(UniformFloodMap { depth: *depth }),
            Self::Raster(raster) => Box::new(raster.clone()),
        })
    }
}
