//! Disposable-domain and role-address detection.
//!
//! Both checks are plain set lookups. A match is a risk signal for the
//! scoring stage, never a rejection on its own.

use std::collections::HashSet;

use crate::config::defaults::{DISPOSABLE_DOMAINS, ROLE_PREFIXES};

const ROLE_SEPARATORS: [char; 3] = ['.', '-', '_'];

#[derive(Debug, Clone, Default)]
pub struct HeuristicSets {
    disposable: HashSet<String>,
    role_prefixes: HashSet<String>,
}

impl HeuristicSets {
    pub fn new<D, R>(disposable: D, role_prefixes: R) -> Self
    where
        D: IntoIterator,
        D::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        let mut sets = Self::empty();
        sets.extend_disposable(disposable);
        sets.extend_roles(role_prefixes);
        sets
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        Self::new(
            DISPOSABLE_DOMAINS.iter().copied(),
            ROLE_PREFIXES.iter().copied(),
        )
    }

    pub fn extend_disposable<I>(&mut self, domains: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.disposable.extend(
            domains
                .into_iter()
                .map(|d| d.into().trim().trim_end_matches('.').to_ascii_lowercase())
                .filter(|d| !d.is_empty()),
        );
    }

    pub fn extend_roles<I>(&mut self, prefixes: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.role_prefixes.extend(
            prefixes
                .into_iter()
                .map(|p| p.into().trim().to_ascii_lowercase())
                .filter(|p| !p.is_empty()),
        );
    }

    /// `true` for a listed domain or any subdomain of one.
    pub fn is_disposable(&self, domain: &str) -> bool {
        let domain = domain.trim_end_matches('.').to_ascii_lowercase();
        let mut candidate = domain.as_str();
        loop {
            if self.disposable.contains(candidate) {
                return true;
            }
            match candidate.split_once('.') {
                Some((_, parent)) if parent.contains('.') => candidate = parent,
                _ => return false,
            }
        }
    }

    /// `true` when the local part (sub-address tag removed) is a role
    /// prefix, alone or followed by `.`, `-` or `_`.
    pub fn is_role_based(&self, local: &str) -> bool {
        let local = local.to_ascii_lowercase();
        let base = local.split('+').next().unwrap_or_default();
        if self.role_prefixes.contains(base) {
            return true;
        }
        base.split(ROLE_SEPARATORS)
            .next()
            .is_some_and(|head| head != base && self.role_prefixes.contains(head))
    }
}
