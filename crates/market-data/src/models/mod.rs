//! Market data models
//!
//! - `quote` - Canonical records returned to callers (Quote, QuoteDetail)
//! - `profile` - Company profile data merged into details (CompanyProfile)
//! - `provider` - Provider identity, configuration and probe status

mod profile;
mod provider;
mod quote;

pub use profile::CompanyProfile;
pub use provider::{ProviderConfig, ProviderKind, ProviderStatus};
pub use quote::{Quote, QuoteDetail};
