use thiserror::Error;

/// Errors that can occur while setting up a test environment.
#[derive(Error, Debug)]
pub enum TestError {
    /// Binding or inspecting the mock server's listener failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
