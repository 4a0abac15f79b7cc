pub mod error;
pub mod models;

pub use error::{Error, ErrorKind};
pub type Result<T> = std::result::Result<T, Error>;
