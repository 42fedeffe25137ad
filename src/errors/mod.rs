pub mod types;

pub use types::{AppError, CompareError, RemovalError, WebError};
