//! WebWatch client components
//!
//! Everything that sits between the browser and the match engine: settings,
//! the REST client for the tracking server, the rule-set provider that owns
//! refresh cadence, and the navigation guard that applies the monitoring
//! policy. Infrastructure failures degrade to "allow and log".

pub mod api;
pub mod error;
pub mod guard;
pub mod provider;
pub mod settings;
pub mod visit;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, RuleKey};
pub use error::{ClientError, SettingsError};
pub use guard::{Navigation, NavigationGuard, NavigationOutcome, SkipReason};
pub use provider::{FetchFailurePolicy, RuleSetProvider, RuleSource, StaticRules};
pub use settings::Settings;
pub use visit::Visit;
