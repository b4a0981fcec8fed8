use std::fmt;

/// Failure reported by a remote provider. Callers record these and move on;
/// they never feed back into local store control flow.
#[derive(Debug)]
pub struct RemoteError {
    message: String,
}

impl RemoteError {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RemoteError {}
