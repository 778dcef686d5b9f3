use crate::errors::CartError;

/// Contiguous Column Major Matrix data container.
///
/// This structure holds a dense matrix of values in a single contiguous memory block.
/// It follows column-major order (Fortran-style), so a single feature column
/// can be sliced without copying.
///
/// # Type Parameters
/// * `T` - The numeric type of the data (e.g., `f32`, `f64`).
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Indices into the data row-wise.
    pub index: Vec<usize>,
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
    stride1: usize,
    stride2: usize,
}

impl<'a, T> Matrix<'a, T> {
    // Defaults to column major
    /// Create a new Matrix.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        Matrix {
            data,
            index: (0..rows).collect(),
            rows,
            cols,
            stride1: rows,
            stride2: 1,
        }
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[self.item_index(i, j)]
    }

    fn item_index(&self, i: usize, j: usize) -> usize {
        let mut idx = self.stride2 * i;
        idx += j * self.stride1;
        idx
    }

    /// Get access to a row of the data, as an iterator.
    pub fn get_row_iter(&self, row: usize) -> std::iter::StepBy<std::iter::Skip<std::slice::Iter<'a, T>>> {
        self.data.iter().skip(row).step_by(self.rows)
    }

    /// Get an entire column in the matrix.
    ///
    /// * `col` - The index of the column to get.
    pub fn get_col(&self, col: usize) -> &[T] {
        let i = self.item_index(0, col);
        &self.data[i..(i + self.rows)]
    }
}

impl<'a, T> Matrix<'a, T>
where
    T: Copy,
{
    /// Get a row of the data as a vector.
    pub fn get_row(&self, row: usize) -> Vec<T> {
        self.get_row_iter(row).copied().collect()
    }
}

/// Check that the flat buffer of a matrix holds exactly `rows * cols` values.
pub fn validate_matrix<T>(data: &Matrix<T>) -> Result<(), CartError> {
    if data.data.len() != data.rows * data.cols {
        return Err(CartError::InvalidShape(format!(
            "matrix buffer holds {} values, expected {} rows x {} columns",
            data.data.len(),
            data.rows,
            data.cols
        )));
    }
    Ok(())
}

/// Check that a matrix and its labels form a valid training set.
///
/// The flat buffer must hold exactly `rows * cols` values, there must be one
/// label per row, and every value must be finite.
pub fn validate_dataset(data: &Matrix<f64>, y: &[f64]) -> Result<(), CartError> {
    validate_matrix(data)?;
    if y.len() != data.rows {
        return Err(CartError::InvalidShape(format!(
            "{} labels provided for {} rows",
            y.len(),
            data.rows
        )));
    }
    if let Some(v) = data.data.iter().chain(y.iter()).find(|v| !v.is_finite()) {
        return Err(CartError::NonFiniteValue(*v));
    }
    Ok(())
}

/// Convert row-major samples into a column-major buffer usable by [`Matrix::new`].
///
/// Returns the buffer, the number of rows, and the number of columns. Every
/// row must have the width of the first one.
pub fn flatten_rows(x: &[Vec<f64>]) -> Result<(Vec<f64>, usize, usize), CartError> {
    let rows = x.len();
    let cols = x.first().map_or(0, |r| r.len());
    if let Some((i, r)) = x.iter().enumerate().find(|(_, r)| r.len() != cols) {
        return Err(CartError::InvalidShape(format!(
            "row {} has {} features, expected {}",
            i,
            r.len(),
            cols
        )));
    }
    let mut data = Vec::with_capacity(rows * cols);
    for j in 0..cols {
        data.extend(x.iter().map(|r| r[j]));
    }
    Ok((data, rows, cols))
}
