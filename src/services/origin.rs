/// Supplies the hostname shown in the card's "Visit ..." line
pub trait OriginProvider: Send + Sync {
    fn hostname(&self) -> String;
}

/// A fixed hostname, typically from configuration
#[derive(Debug, Clone)]
pub struct StaticOrigin {
    host: String,
}

impl StaticOrigin {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl OriginProvider for StaticOrigin {
    fn hostname(&self) -> String {
        self.host.clone()
    }
}

/// Hostname taken from an HTTP `Host` header, without the port
#[derive(Debug, Clone)]
pub struct RequestOrigin {
    host: Option<String>,
    fallback: String,
}

impl RequestOrigin {
    pub fn new(host_header: Option<&str>, fallback: impl Into<String>) -> Self {
        Self {
            host: host_header.and_then(hostname_from_authority),
            fallback: fallback.into(),
        }
    }
}

impl OriginProvider for RequestOrigin {
    fn hostname(&self) -> String {
        self.host.clone().unwrap_or_else(|| self.fallback.clone())
    }
}

/// Strip the port from a `host[:port]` authority
fn hostname_from_authority(authority: &str) -> Option<String> {
    let authority = authority.trim();
    if authority.is_empty() {
        return None;
    }
    let url = reqwest::Url::parse(&format!("http://{authority}")).ok()?;
    url.host_str().map(str::to_string)
}
