//! Presentation capability consumed by the deployer and the transport.
//!
//! The core never writes to the terminal itself. It renders every outcome
//! through a [`Reporter`] supplied by the caller, which decides where the
//! text goes and how it is styled.

/// Presentation primitives for user-facing deployment messages.
#[cfg_attr(test, mockall::automock)]
pub trait Reporter {
    /// Report that an operation completed successfully.
    fn success(&self, message: &str);

    /// Report a failure headline.
    fn error(&self, message: &str);

    /// Report supporting detail for the preceding headline, such as a
    /// server response body or an underlying I/O error.
    fn detail(&self, message: &str);
}
