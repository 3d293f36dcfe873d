use thiserror::Error;

#[derive(Debug, Error)]
pub enum MxError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain {domain} does not exist")]
    DomainNotFound { domain: String },
    #[error("MX lookup for {domain} timed out")]
    Timeout { domain: String },
    #[error("MX lookup failed: {source}")]
    Lookup {
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
}

impl MxError {
    pub(crate) fn lookup(source: trust_dns_resolver::error::ResolveError) -> Self {
        Self::Lookup { source }
    }

    pub(crate) fn not_found(domain: &str) -> Self {
        Self::DomainNotFound {
            domain: domain.to_string(),
        }
    }

    pub(crate) fn timeout(domain: &str) -> Self {
        Self::Timeout {
            domain: domain.to_string(),
        }
    }
}
