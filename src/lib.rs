//! hprice: housing sale-price regression library
//!
//! Cleans a training and a test table of housing attributes (column
//! classification, skew correction, one-hot encoding with train/test
//! alignment, mean imputation), fits cross-validated ridge and lasso models
//! on `log(1 + SalePrice)` and writes price predictions for the test table.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
