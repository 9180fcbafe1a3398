pub mod app;
pub mod cli;
pub mod config;
pub mod data_models;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod providers;
pub mod transport;
pub mod validate;

pub use error::{ApiError, SearchError};
