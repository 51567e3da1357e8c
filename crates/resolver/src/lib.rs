//! Layered, policy-governed name resolution.
//!
//! A [`Resolver`] owns a local artifact space and consults an ordered set of
//! upstream [`Provider`]s: one primary [`Relationship`] and any number of
//! fallbacks. Each relationship carries its own [`IsolationLevel`] and
//! preferred / denied / allowed name patterns, separately for artifacts and
//! resources, which decide per name whether the upstream or the local
//! artifact wins.
//!
//! # Per-relationship decision
//!
//! 1. Denylisted names never reach the provider.
//! 2. Exported artifacts and preferred names come from upstream.
//! 3. Otherwise the isolation level chooses between upstream and local.
//! 4. Allowlisted names rescue an upstream artifact isolation would hide.
//!
//! Resolvers are immutable once built. A resolver can only reference
//! providers (including other resolvers) that already exist, so the provider
//! graph is acyclic by construction.

/// Artifacts and namespaces.
pub mod artifact;
/// Resolver chains.
pub mod chain;
/// Declarative (serde) configuration.
pub mod config;
/// Advisory delivery.
pub mod diagnostics;
/// Error types.
pub mod error;
/// Isolation levels and the choosers they select.
pub mod isolation;
/// The provider contract.
pub mod provider;
/// Provider relationships.
pub mod relationship;
/// The resolution engine.
pub mod resolver;

pub use artifact::{Artifact, ArtifactId, Namespace};
pub use chain::ResolverChain;
pub use config::{PatternConfig, RelationshipConfig, ResolverConfig};
pub use diagnostics::{Advisory, DiagnosticSink, NullSink, TracingSink};
pub use error::{ResolveError, Result};
pub use isolation::IsolationLevel;
pub use provider::{EmptyProvider, MemoryProvider, Provider, provided_by};
pub use relationship::{PatternPolicy, Relationship, RelationshipBuilder};
pub use resolver::{Resolver, ResolverBuilder};
pub use stratum_matcher::{Glob, NamePredicate, Pattern, PatternSet};
pub use stratum_origin::{Decision, Location, OriginPolicy};
