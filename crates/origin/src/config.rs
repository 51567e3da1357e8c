//! Declarative origin policies.
//!
//! ```toml
//! default = "deny"
//!
//! [[filters]]
//! kind = "scheme"
//! decision = "allow"
//! schemes = ["https"]
//!
//! [[filters]]
//! kind = "directory"
//! decision = "allow"
//! path = "/opt/app/lib"
//! recursive = true
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Result;
use crate::filter::Decision;
use crate::policy::OriginPolicy;

/// Serializable form of an [`OriginPolicy`].
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OriginPolicyConfig {
	/// Decision when no filter matches.
	pub default: Decision,
	/// Filters, in evaluation order.
	#[serde(default)]
	pub filters: Vec<FilterConfig>,
}

/// Serializable form of one filter.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FilterConfig {
	/// See [`crate::SchemeFilter`].
	Scheme {
		decision: Decision,
		schemes: Vec<String>,
	},
	/// See [`crate::DirectoryFilter`].
	Directory {
		decision: Decision,
		path: PathBuf,
		#[serde(default)]
		recursive: bool,
	},
	/// See [`crate::GlobFilter`].
	Glob { decision: Decision, pattern: String },
}

impl OriginPolicyConfig {
	/// Compiles the configuration into a policy.
	pub fn build(self) -> Result<OriginPolicy> {
		let mut policy = OriginPolicy::new(self.default);
		for filter in self.filters {
			policy = match filter {
				FilterConfig::Scheme { decision, schemes } => match decision {
					Decision::Allow => policy.allowing_schemes(schemes),
					Decision::Deny => policy.denying_schemes(schemes),
				},
				FilterConfig::Directory {
					decision,
					path,
					recursive,
				} => match decision {
					Decision::Allow => policy.allowing_directory(path, recursive),
					Decision::Deny => policy.denying_directory(path, recursive),
				},
				FilterConfig::Glob { decision, pattern } => match decision {
					Decision::Allow => policy.allowing_glob(&pattern)?,
					Decision::Deny => policy.denying_glob(&pattern)?,
				},
			};
		}
		Ok(policy)
	}
}
