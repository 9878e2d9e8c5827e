//! URL handling module
//!
//! Canonicalization is defined once here and applied everywhere a URL is
//! fingerprinted, matched against policy, or enqueued. Two URLs that differ
//! only by case, fragment, tracking parameters, or trailing slash must map
//! to the same canonical form.

mod fingerprint;
mod matcher;
mod normalize;

pub use fingerprint::Fingerprint;
pub use matcher::matches_wildcard;
pub use normalize::canonicalize_url;
