use std::collections::HashSet;

use async_trait::async_trait;
use tracing::{debug, warn};
use trust_dns_resolver::{
    TokioAsyncResolver,
    config::{ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    proto::op::ResponseCode,
    system_conf::read_system_conf,
};

use super::{DnsOptions, MxError, MxRecord, MxStatus};

/// Source of MX records. Implemented by [`SystemResolver`] and by test stubs.
#[async_trait]
pub trait LookupMx: Send + Sync {
    /// Raw records for `domain`. An empty vector means the domain exists but
    /// publishes no MX.
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, MxError>;
}

/// Async resolver built from the host's resolver configuration.
pub struct SystemResolver {
    inner: TokioAsyncResolver,
    options: DnsOptions,
}

impl SystemResolver {
    pub fn new(options: &DnsOptions) -> Self {
        let (config, mut opts) = match read_system_conf() {
            Ok(pair) => pair,
            Err(err) => {
                warn!("cannot read system resolver configuration ({err}), using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = options.timeout();
        // une seule tentative : pas de relance contre les serveurs
        opts.attempts = 1;
        Self {
            inner: TokioAsyncResolver::tokio(config, opts),
            options: options.clone(),
        }
    }
}

#[async_trait]
impl LookupMx for SystemResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, MxError> {
        let lookup = tokio::time::timeout(self.options.timeout(), self.inner.mx_lookup(domain))
            .await
            .map_err(|_| MxError::timeout(domain))?;
        match lookup {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|mx| {
                    MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8()))
                })
                .collect()),
            Err(err) => classify_error(domain, err),
        }
    }
}

fn classify_error(domain: &str, err: ResolveError) -> Result<Vec<MxRecord>, MxError> {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            if *response_code == ResponseCode::NXDomain {
                Err(MxError::not_found(domain))
            } else {
                Ok(Vec::new())
            }
        }
        ResolveErrorKind::Timeout => Err(MxError::timeout(domain)),
        _ => Err(MxError::lookup(err)),
    }
}

/// Looks up `ascii_domain`, then sorts by preference, removes duplicates and
/// drops null MX entries (RFC 7505).
pub async fn resolve_with<R>(resolver: &R, ascii_domain: &str) -> Result<MxStatus, MxError>
where
    R: LookupMx + ?Sized,
{
    let domain = ascii_domain.trim().trim_end_matches('.');
    if domain.is_empty() {
        return Err(MxError::EmptyDomain);
    }

    let mut records: Vec<MxRecord> = resolver
        .lookup_mx(domain)
        .await?
        .into_iter()
        .map(|record| MxRecord::new(record.preference, normalize_exchange(record.exchange)))
        .filter(|record| !record.exchange.is_empty())
        .collect();

    records.sort();
    let mut seen = HashSet::new();
    records.retain(|record| seen.insert(record.exchange.clone()));

    debug!(domain, count = records.len(), "MX lookup complete");
    if records.is_empty() {
        Ok(MxStatus::NoRecords)
    } else {
        Ok(MxStatus::Records(records))
    }
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}
