//! Origin restriction.
//!
//! An [`OriginPolicy`] is an ordered chain of location filters with a
//! default decision. It answers one question, "may this source location be
//! used at all", and it answers it from configuration-time data only: the
//! chain is evaluated before anything is fetched from the location.
//!
//! # Redirects
//!
//! The policy only ever sees the location string that was configured. If a
//! transport later follows a redirect from an allowed location to somewhere
//! else, the policy is not consulted again. For tight control, deny by
//! default and only allow locations the application itself controls.

/// Declarative (serde) form of a policy.
pub mod config;
/// Error types.
pub mod error;
/// Filter kinds and match results.
pub mod filter;
/// Source locations.
pub mod location;
/// The filter chain.
pub mod policy;

pub use config::{FilterConfig, OriginPolicyConfig};
pub use error::{OriginError, Result};
pub use filter::{Decision, DirectoryFilter, GlobFilter, LocationFilter, MatchResult, SchemeFilter};
pub use location::Location;
pub use policy::OriginPolicy;
