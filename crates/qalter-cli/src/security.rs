//! Security-context lifecycle wrapped around the whole run.
//!
//! The context is initialised once before any server is contacted and
//! closed exactly once: explicitly on the fatal attribute-error path, or
//! when the context is dropped at the end of the run.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("unable to initialize security library.")]
pub(crate) struct SecurityError;

/// Credential layer consulted by the transport.
pub(crate) trait SecurityLibrary {
    fn init(&mut self) -> Result<(), SecurityError>;
    fn close(&mut self);
}

/// Library used when connections carry no credentials.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct NoSecurity;

impl SecurityLibrary for NoSecurity {
    fn init(&mut self) -> Result<(), SecurityError> {
        Ok(())
    }

    fn close(&mut self) {}
}

/// An initialised security context.
#[derive(Debug)]
pub(crate) struct SecurityContext<S: SecurityLibrary> {
    library: S,
    open: bool,
}

impl<S: SecurityLibrary> SecurityContext<S> {
    pub(crate) fn initialise(mut library: S) -> Result<Self, SecurityError> {
        library.init()?;
        tracing::debug!("security context initialised");
        Ok(Self {
            library,
            open: true,
        })
    }

    /// Closes the context now rather than at end of scope.
    pub(crate) fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.open {
            self.open = false;
            self.library.close();
            tracing::debug!("security context closed");
        }
    }
}

impl<S: SecurityLibrary> Drop for SecurityContext<S> {
    fn drop(&mut self) {
        self.release();
    }
}
