//! Check whether Python packages support Python 3
//!
//! The two entry points are [`LookupService::supports_modern`], which asks
//! PyPI and classifies the answer, and [`OverrideStore::is_overridden`], which
//! consults a curated list of projects known to be ported.

pub mod cache;
pub mod check;
pub mod classify;
pub mod config;
pub mod http;
pub mod lookup;
pub mod name;
pub mod overrides;
pub mod requirements;
pub mod support;
pub mod version;
pub mod wheel;

#[cfg(test)]
mod testing;

pub use classify::{RegistryResponse, classify};
pub use lookup::LookupService;
pub use name::{NameError, ProjectName, just_name};
pub use overrides::OverrideStore;
pub use support::SupportLevel;
