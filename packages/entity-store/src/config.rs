//! Service configuration.

/// Configuration for one entity service instance.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Request body read timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Store worker reply timeout in milliseconds
    pub response_timeout_ms: u64,
    /// Capacity of the store request queue
    pub queue_capacity: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_ms: 5000,
            response_timeout_ms: 10000,
            queue_capacity: 1000,
        }
    }
}
