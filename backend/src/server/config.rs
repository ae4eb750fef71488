//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use ecowaste::settings::{Environment, RuntimeSettings};

/// Values the server needs once the domain state has been wired.
#[derive(Debug, Clone, Copy)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) environment: Environment,
}

impl ServerConfig {
    /// Construct a server configuration from validated settings.
    #[must_use]
    pub fn from_settings(settings: &RuntimeSettings) -> Self {
        Self {
            bind_addr: settings.bind_addr,
            environment: settings.environment,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Whether error envelopes carry diagnostic text.
    #[must_use]
    pub fn exposes_stack(&self) -> bool {
        self.environment.exposes_stack()
    }
}
