pub mod aggregate;
pub mod classifier;
pub mod error;
pub mod gamify;
pub mod insight;
pub mod store;
pub mod task;
pub mod types;

pub use error::{ForgeError, Result};
