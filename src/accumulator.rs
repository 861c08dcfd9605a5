//! Dense accumulator for one output column
//!
//! Sized to the local row block and reused across columns: only the rows
//! touched since the last drain are cleared.

/// Accumulates `C[:, j]` for a block of rows
pub struct DenseAccumulator {
    /// The dense accumulation array
    values: Vec<f64>,

    /// Flags to track which rows have received a contribution
    occupied: Vec<bool>,

    /// Rows touched since the last drain, in arrival order
    touched: Vec<usize>,
}

impl DenseAccumulator {
    /// Create an accumulator for `n_rows` output rows
    pub fn new(n_rows: usize) -> Self {
        Self {
            values: vec![0.0; n_rows],
            occupied: vec![false; n_rows],
            touched: Vec::new(),
        }
    }

    /// Add `val` to row `row`
    pub fn accumulate(&mut self, row: usize, val: f64) {
        if !self.occupied[row] {
            self.occupied[row] = true;
            self.touched.push(row);
            self.values[row] = val;
        } else {
            self.values[row] += val;
        }
    }

    /// Append entries with `|value| > tol` to the output arrays in increasing
    /// row order, then clear the accumulator
    ///
    /// Returns the number of entries appended.
    pub fn drain_into(&mut self, tol: f64, rows: &mut Vec<usize>, values: &mut Vec<f64>) -> usize {
        self.touched.sort_unstable();

        let before = rows.len();
        for &row in &self.touched {
            let val = self.values[row];
            if val.abs() > tol {
                rows.push(row);
                values.push(val);
            }
            self.occupied[row] = false;
            self.values[row] = 0.0;
        }
        self.touched.clear();

        rows.len() - before
    }
}
