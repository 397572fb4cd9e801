/// One per-step parameter table (pitch, amplitude or angle) of a dataset.
/// Row-major: one row per stretch step, one column per grating.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    data: Vec<f64>,
    steps: usize,
    gratings: usize,
}

impl ParameterTable {
    /// Create an empty table with `gratings` values per row.
    pub(crate) fn new(gratings: usize) -> Self {
        Self {
            data: Vec::new(),
            steps: 0,
            gratings,
        }
    }

    /// Append one stretch step. The row must hold exactly one value per grating.
    pub(crate) fn push_row(&mut self, row: &[f64]) {
        debug_assert_eq!(row.len(), self.gratings);
        self.data.extend_from_slice(row);
        self.steps += 1;
    }

    /// Number of stretch steps (rows).
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of gratings (columns).
    pub fn gratings(&self) -> usize {
        self.gratings
    }

    #[inline]
    pub fn get(&self, step: usize, grating: usize) -> f64 {
        self.data[step * self.gratings + grating]
    }

    /// All grating values at one stretch step.
    pub fn row(&self, step: usize) -> &[f64] {
        let start = step * self.gratings;
        &self.data[start..start + self.gratings]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks_exact(self.gratings)
    }
}
