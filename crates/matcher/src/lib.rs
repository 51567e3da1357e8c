//! Name matching primitives shared by the origin policy and the resolver.
//!
//! - [`Glob`]: restricted glob syntax (`*`, `?`, literals) compiled to a full-string matcher
//! - [`NamePredicate`]: a glob or an arbitrary `Fn(&str) -> bool`, behind one type
//! - [`Pattern`]: an uncompiled pattern, as accumulated by fluent builders
//! - [`PatternSet`]: "does any predicate match this name"

/// Glob compilation.
pub mod glob;
/// Name predicates and predicate sets.
pub mod predicate;

pub use glob::{Glob, GlobError};
pub use predicate::{NamePredicate, Pattern, PatternSet};
