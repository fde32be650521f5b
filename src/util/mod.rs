pub mod errors;

pub use errors::{ReplogError, Result};
