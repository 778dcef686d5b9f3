//! Errors
//!
//! Custom error types used throughout the `cart` crate.
use thiserror::Error;

/// Errors that can occur when fitting, predicting with, or persisting a tree.
#[derive(Debug, Error)]
pub enum CartError {
    /// The feature matrix and labels do not describe a rectangular dataset.
    #[error("Invalid dataset shape: {0}")]
    InvalidShape(String),
    /// NaN or infinite value found in the features or labels.
    #[error("The value {0} was found in the data, only finite values are supported.")]
    NonFiniteValue(f64),
    /// The stored node list does not describe a single binary tree.
    #[error("Corrupt tree: {0}")]
    CorruptTree(String),
    /// Model used before a tree was trained.
    #[error("Model has no trained tree.")]
    NotFitted,
    /// First value is the split feature, second is the width of the sample.
    #[error("Feature index {0} out of range for a sample with {1} features.")]
    FeatureIndexOutOfRange(usize, usize),
    /// Failure opening, reading or writing the model storage.
    #[error("Model storage error: {0}")]
    Io(#[from] std::io::Error),
    /// Unable to encode the model.
    #[error("Unable to write model: {0}")]
    Serialize(#[source] serde_json::Error),
    /// Unable to decode the model.
    #[error("Unable to read model: {0}")]
    Deserialize(#[source] serde_json::Error),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
}
