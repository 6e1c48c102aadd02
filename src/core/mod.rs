pub mod config;
pub mod error;
pub mod iam;
pub mod loader;
pub mod preprocess;
pub mod validation;
