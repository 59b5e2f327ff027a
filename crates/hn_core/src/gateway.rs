//! Maps transaction ids to URLs that the current deployment can reach.

pub const CANONICAL_HOST: &str = "arweave.net";
const CANONICAL_ROOT: [&str; 2] = ["ar", "io"];
const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

/// Resolves content ids against the gateway serving the current host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResolver {
    host: String,
}

impl GatewayResolver {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Build a resolver from a full origin such as `https://hackernoon.permagate.io`.
    pub fn from_origin(origin: &str) -> crate::Result<Self> {
        let url = url::Url::parse(origin)
            .map_err(|e| crate::Error::InvalidUrl(format!("{}: {}", origin, e)))?;
        let host = url
            .host_str()
            .ok_or_else(|| crate::Error::InvalidUrl(format!("{} has no host", origin)))?;
        Ok(Self::new(host))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn gateway_host(&self) -> String {
        gateway_host(&self.host)
    }

    pub fn resolve(&self, id: &str) -> String {
        resolve_gateway_url(&self.host, id)
    }
}

impl Default for GatewayResolver {
    fn default() -> Self {
        Self::new("localhost")
    }
}

fn gateway_host(host: &str) -> String {
    if LOOPBACK_HOSTS.contains(&host) {
        return CANONICAL_HOST.to_string();
    }

    let labels: Vec<&str> = host.split('.').collect();

    // ar.io subdomains route through the canonical gateway
    if labels.len() >= 2 && labels[labels.len() - 2..] == CANONICAL_ROOT {
        return CANONICAL_HOST.to_string();
    }

    // Drop the app-specific subdomain, e.g. `hackernoon` in `hackernoon.permagate.io`
    if labels.len() > 2 {
        return labels[1..].join(".");
    }

    host.to_string()
}

pub fn resolve_gateway_url(host: &str, id: &str) -> String {
    format!("https://{}/{}", gateway_host(host), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TX: &str = "Zt0bEfK6S3kKyU0Ml6Ap0kqFYpTMqBzGNgZuOM1NwY8";

    #[test]
    fn test_loopback_uses_canonical_host() {
        assert_eq!(resolve_gateway_url("localhost", TX), format!("https://arweave.net/{}", TX));
        assert_eq!(resolve_gateway_url("127.0.0.1", TX), format!("https://arweave.net/{}", TX));
    }

    #[test]
    fn test_ar_io_uses_canonical_host() {
        assert_eq!(resolve_gateway_url("foo.ar.io", TX), format!("https://arweave.net/{}", TX));
        assert_eq!(resolve_gateway_url("ar.io", TX), format!("https://arweave.net/{}", TX));
    }

    #[test]
    fn test_strips_leading_subdomain() {
        assert_eq!(
            resolve_gateway_url("bar.permagate.io", TX),
            format!("https://permagate.io/{}", TX)
        );
        assert_eq!(
            resolve_gateway_url("a.b.gateway.example", TX),
            format!("https://b.gateway.example/{}", TX)
        );
    }

    #[test]
    fn test_two_label_host_is_used_verbatim() {
        assert_eq!(resolve_gateway_url("g8way.io", TX), format!("https://g8way.io/{}", TX));
    }

    #[test]
    fn test_from_origin() {
        let resolver = GatewayResolver::from_origin("https://hackernoon.permagate.io/").unwrap();
        assert_eq!(resolver.host(), "hackernoon.permagate.io");
        assert_eq!(resolver.gateway_host(), "permagate.io");
        assert!(GatewayResolver::from_origin("not a url").is_err());
    }
}
