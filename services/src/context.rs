// services/src/context.rs

/// Per-request context threaded explicitly through every orchestrator call.
/// The correlation id is an opaque end-to-end token; it is never stored in
/// shared logger state, so concurrent requests cannot interfere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub correlation_id: String,
    pub ip_address: Option<String>,
}

impl RequestContext {
    pub fn new(correlation_id: impl Into<String>) -> Self {
        RequestContext { correlation_id: correlation_id.into(), ip_address: None }
    }

    pub fn with_ip(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }
}
