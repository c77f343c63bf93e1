pub mod config;
pub mod error;
pub mod fields;
pub mod types;

pub use config::Config;
pub use error::TrendLensError;
pub use fields::{FieldChain, AUTHOR_FIELDS, CONTENT_FIELDS, DATE_FIELDS, TITLE_FIELDS};
pub use types::*;
