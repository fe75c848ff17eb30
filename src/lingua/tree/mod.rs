pub mod build;
pub mod emit;
pub mod error;
pub mod io;
pub mod mapping;
pub mod model;

pub use error::{Result, ToolError};
