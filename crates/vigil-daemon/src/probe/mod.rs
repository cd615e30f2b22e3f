mod classify;
mod client;
mod profile;

pub use classify::{classify_error, looks_like_tls_failure, truncate};
pub use client::{ProbeClient, Prober};
pub use profile::ProbeProfile;

#[cfg(test)]
mod tests;
