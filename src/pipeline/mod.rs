//! Pipeline module - cleaning steps and regression trainers

pub mod cleaner;
pub mod encoder;
pub mod error;
pub mod impute;
pub mod loader;
pub mod matrix;
pub mod regression;
pub mod schema;
pub mod skew;
pub mod target;

pub use cleaner::*;
pub use encoder::*;
pub use error::PipelineError;
pub use impute::*;
pub use loader::*;
pub use matrix::DesignMatrix;
pub use regression::{
    CvDiagnostics, CvRegressor, FittedModel, LassoCv, ModelKind, RegressionConfig, RidgeCv,
};
pub use schema::*;
pub use skew::*;
pub use target::*;
