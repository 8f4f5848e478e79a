pub mod handler;
pub mod types;

pub use handler::*;
pub use types::*;
