pub mod error;
pub mod form;
pub mod id;
pub mod pagination;

pub use error::Error;
pub use id::Id;
pub use pagination::{Page, Paginator};
