pub mod dns;
pub mod headers;
pub mod ownership;
pub mod resolver;
pub mod sitedetails;
pub mod techstack;
pub mod traceroute;

use crate::error::ReconError;
use crate::report::{Infrastructure, IpLookup, TechDetail};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};

pub use dns::DigCommand;
pub use headers::HeaderProbe;
pub use ownership::RdapOwnership;
pub use resolver::SystemResolver;
pub use sitedetails::WappalyzerProbe;
pub use techstack::BuiltWithProbe;
pub use traceroute::IpinfoTraceroute;

/// Maps a domain name to an IP address.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(&self, domain: &str) -> Result<String, ReconError>;
}

/// Traceroute to an IP via an external lookup service; opaque text result.
#[async_trait]
pub trait TracerouteLookup: Send + Sync {
    async fn traceroute(&self, ip: &str) -> Result<String, ReconError>;
}

/// DNS records for a domain via a local query tool; opaque text result.
#[async_trait]
pub trait DnsLookup: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<String, ReconError>;
}

/// Ownership metadata for an IP from a WHOIS/RDAP registry.
#[async_trait]
pub trait OwnershipLookup: Send + Sync {
    async fn lookup(&self, ip: &str) -> Result<IpLookup, ReconError>;
}

/// Technology categories detected against the live site.
#[async_trait]
pub trait TechFingerprint: Send + Sync {
    async fn fingerprint(&self, url: &str) -> Result<HashMap<String, HashSet<String>>, ReconError>;
}

/// Infrastructure hints classified from the target's response headers.
#[async_trait]
pub trait HeaderFetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Infrastructure, ReconError>;
}

/// Per-technology detail (version, categories) from loading the page.
#[async_trait]
pub trait SiteFingerprint: Send + Sync {
    async fn fingerprint(&self, url: &str) -> Result<BTreeMap<String, TechDetail>, ReconError>;
}
