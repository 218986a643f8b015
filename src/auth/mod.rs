pub mod password;
mod session;

pub use session::{Claims, IssueSessionError, SessionKeys, SESSION_COOKIE};
