use serde::{Deserialize, Serialize};

use crate::error::{Result, SrgError};

/// Largest number of `f64` cells a single allocation can hold.
const MAX_CELLS: usize = isize::MAX as usize / std::mem::size_of::<f64>();

/// Square sampling window over which a surface is evaluated.
///
/// The window covers `[0, dimension)` along both axes, sampled every `step`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingWindow {
    pub dimension: f64,
    pub step: f64,
}

impl SamplingWindow {
    pub fn new(dimension: f64, step: f64) -> Self {
        Self { dimension, step }
    }

    /// Number of samples along each axis: `floor(dimension / step)`.
    ///
    /// Fails when either value is not a finite positive number, or when the
    /// `size × size` grid could not be addressed in memory.
    pub fn grid_size(&self) -> Result<usize> {
        check_positive("step", self.step)?;
        check_positive("dimension", self.dimension)?;
        let side = (self.dimension / self.step).floor();
        let size = side as usize;
        match size.checked_mul(size) {
            Some(cells) if side < usize::MAX as f64 && cells <= MAX_CELLS => Ok(size),
            _ => Err(SrgError::InvalidParameter {
                name: "dimension",
                value: self.dimension,
            }),
        }
    }
}

impl Default for SamplingWindow {
    fn default() -> Self {
        Self {
            dimension: 10.0,
            step: 0.1,
        }
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SrgError::InvalidParameter { name, value })
    }
}

/// A sampled relief surface, `size × size` values indexed by `[x][y]`.
/// Stored row-major along x: `data[x * size + y]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub data: Vec<f64>,
    pub size: usize,
    /// Physical distance between neighbouring samples.
    pub step: f64,
}

impl Surface {
    /// Create a surface filled with zeros.
    ///
    /// # Panics
    /// When `size * size` overflows; [`SamplingWindow::grid_size`] never yields such a size.
    pub fn zeros(size: usize, step: f64) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
            step,
        }
    }

    /// Evaluate `f(x·step, y·step)` at every cell of the window.
    ///
    /// With the `threading` feature, x rows are filled in parallel; every
    /// cell is still computed by a single call to `f`, so results match the
    /// serial path exactly.
    pub fn sample<F>(window: SamplingWindow, f: F) -> Result<Self>
    where
        F: Fn(f64, f64) -> f64 + Sync,
    {
        let size = window.grid_size()?;
        let step = window.step;
        let mut surface = Self::zeros(size, step);
        if size == 0 {
            return Ok(surface);
        }

        let fill_row = |(x, row): (usize, &mut [f64])| {
            let px = x as f64 * step;
            for (y, cell) in row.iter_mut().enumerate() {
                *cell = f(px, y as f64 * step);
            }
        };

        #[cfg(feature = "threading")]
        {
            use rayon::prelude::*;
            surface.data.par_chunks_mut(size).enumerate().for_each(fill_row);
        }
        #[cfg(not(feature = "threading"))]
        surface.data.chunks_mut(size).enumerate().for_each(fill_row);

        Ok(surface)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[x * self.size + y]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, val: f64) {
        self.data[x * self.size + y] = val;
    }

    /// All values along y for one x index.
    pub fn row(&self, x: usize) -> &[f64] {
        &self.data[x * self.size..(x + 1) * self.size]
    }

    /// Copy into nested `[x][y]` vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        if self.size == 0 {
            return Vec::new();
        }
        self.data.chunks(self.size).map(<[f64]>::to_vec).collect()
    }

    pub fn min_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::INFINITY, f64::min)
    }

    pub fn max_value(&self) -> f64 {
        self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    }
}
