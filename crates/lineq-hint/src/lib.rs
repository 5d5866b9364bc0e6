pub mod client;
pub mod error;
pub mod prompt;
pub mod protocol;

pub use client::{HintClient, HintConfig};
pub use error::{HintError, HintResult};
