use crate::data::{flatten_rows, Matrix};
use crate::errors::CartError;
use crate::store::{load_value, save_value, ModelFormat};
use crate::tree::Tree;
use hashbrown::HashMap;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Classification and regression tree model.
///
/// Refitting needs `&mut self`, so a fitted model can be shared between
/// predicting threads but never retrained while they hold it.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Cart {
    /// The trained tree, without a root before fitting or after fitting
    /// on an empty dataset.
    pub tree: Tree,
    /// Number of features of the training data.
    pub n_features: Option<usize>,
    // Metadata for the model
    #[serde(default)]
    metadata: HashMap<String, String>,
}

impl Cart {
    pub fn new() -> Self {
        Cart::default()
    }

    /// Fit the tree on a provided dataset, replacing any previous fit.
    ///
    /// * `data` - The feature matrix, one row per sample.
    /// * `y` - One label per row, labels are compared by exact equality.
    pub fn fit(&mut self, data: &Matrix<f64>, y: &[f64]) -> Result<(), CartError> {
        self.tree.fit(data, y)?;
        self.n_features = Some(data.cols);
        Ok(())
    }

    /// Fit the tree on row-major samples.
    ///
    /// * `x` - Samples, all of the same width.
    /// * `y` - One label per sample.
    pub fn fit_rows(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), CartError> {
        let (flat, rows, cols) = flatten_rows(x)?;
        let data = Matrix::new(&flat, rows, cols);
        self.fit(&data, y)
    }

    /// Predict a label for every row of `data`.
    ///
    /// * `data` - The feature matrix.
    /// * `parallel` - Predict rows on the rayon thread pool.
    pub fn predict(&self, data: &Matrix<f64>, parallel: bool) -> Result<Vec<f64>, CartError> {
        self.tree.predict(data, parallel)
    }

    /// Predict a label for every sample, in order. Samples only need to be
    /// wide enough for the splits they visit.
    pub fn predict_rows(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, CartError> {
        if !self.tree.is_fitted() {
            return Err(CartError::NotFitted);
        }
        x.iter().map(|row| self.tree.predict_row(row)).collect()
    }

    /// Predict a label for a single sample.
    pub fn predict_row(&self, row: &[f64]) -> Result<f64, CartError> {
        self.tree.predict_row(row)
    }

    /// Save the model to a file, replacing its content.
    ///
    /// * `path` - Path to save the model.
    /// * `format` - Encoding of the saved model.
    pub fn save_model<P: AsRef<Path>>(&self, path: P, format: ModelFormat) -> Result<(), CartError> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        save_value(self, &mut writer, format)?;
        writer.flush()?;
        info!("Saved model to {}", path.as_ref().display());
        Ok(())
    }

    /// Load a model from a file written by [`Cart::save_model`].
    ///
    /// * `path` - Path to load the model from.
    pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Self, CartError> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let mut model: Cart = load_value(reader)?;
        model.tree.update_stats();
        info!("Loaded model from {}", path.as_ref().display());
        Ok(model)
    }

    /// Dump the model as a json string.
    pub fn json_dump(&self) -> Result<String, CartError> {
        serde_json::to_string(self).map_err(CartError::Serialize)
    }

    /// Load a model from a json string.
    ///
    /// * `json_str` - String produced by [`Cart::json_dump`].
    pub fn from_json(json_str: &str) -> Result<Self, CartError> {
        let mut model: Cart = load_value(json_str.as_bytes())?;
        model.tree.update_stats();
        Ok(model)
    }

    /// Insert metadata
    /// * `key` - String value for the metadata key.
    /// * `value` - value to assign to the metadata key.
    pub fn insert_metadata(&mut self, key: String, value: String) {
        self.metadata.insert(key, value);
    }

    /// Get Metadata
    /// * `key` - Get the associated value for the metadata key.
    pub fn get_metadata(&self, key: &str) -> Option<String> {
        self.metadata.get(key).cloned()
    }
}
