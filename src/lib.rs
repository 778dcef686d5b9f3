// Modules
pub mod cart;
pub mod data;
pub mod errors;
pub mod impurity;
pub mod node;
pub mod splitter;
pub mod store;
pub mod tree;
pub mod utils;

// Individual classes, and functions
pub use cart::Cart;
pub use data::Matrix;
pub use errors::CartError;
pub use node::Node;
pub use store::ModelFormat;
pub use tree::Tree;
