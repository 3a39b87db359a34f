pub mod config;
pub mod gallery;
pub mod model;
pub mod upload;
