//! URL handling module for Polite-Spider
//!
//! This module provides canonicalization (the deduplication key used by the
//! frontier), host extraction and the allow-list domain gate.

mod canonical;
mod domain;

pub use canonical::{canonicalize, canonicalize_parsed, CanonicalUrl};
pub use domain::{extract_host, host_in_allow_list, host_key, is_allowed_domain};
