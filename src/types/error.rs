use std::fmt::Display;

/// Category of a failed request. It decides which status code
/// (and which page) the requester gets back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    BadRequest,
    Internal,
    /// The route needs a signed in user. `next` is where the
    /// login page sends the user back to afterwards.
    LoginRequired { next: String },
    NotFound,
    ReadonlyMode,
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::BadRequest => f.write_str("Received a malformed request"),
            Error::Internal => f.write_str("Failed to perform request"),
            Error::LoginRequired { .. } => f.write_str("Attempt to access user-only route"),
            Error::NotFound => f.write_str("Requested resource does not exist"),
            Error::ReadonlyMode => f.write_str("Attempt to write read-only database"),
        }
    }
}
