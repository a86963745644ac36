pub mod error;

pub use error::{ForgeError, Result};
