pub mod config;
pub mod display;
pub mod error;
pub mod parser;
pub mod records;
pub mod santa;
pub mod validation;
pub mod web;

pub use error::{SantaError, SantaResult};
