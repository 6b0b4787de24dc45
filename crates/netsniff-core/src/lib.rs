pub mod builder;
pub mod capture;
pub mod error;
pub mod har;

pub use builder::{CreatorInfo, HarBuilder, create_har};
pub use error::{Error, Result};
