//! The activity block: window math, cached aggregates, user classification
//! and the template payload.

pub mod aggregator;
mod cached;
pub mod classifier;
pub mod dates;
pub mod display;
pub mod guests;
pub mod language;
pub mod listener;
pub mod render;
pub mod users;
pub mod window;

#[cfg(test)]
mod test_support;

pub use aggregator::{get_activity_counts, ACTIVITY_CACHE_KEY};
pub use classifier::{classify, Classification, ClassifyContext};
pub use dates::ChronoDateFormatter;
pub use display::{template_vars, ActivityDisplay, TemplateInputs};
pub use guests::{get_guest_count, GUESTS_CACHE_KEY};
pub use language::{LangEntry, LanguagePack};
pub use listener::{ActivityListener, DetailsPanel, ListenerSettings, Viewer, EXTENSION_NAME};
pub use render::{ProfileLinks, UsernameMode};
pub use users::{obtain_active_users, ACTIVE_USERS_CACHE_KEY};
pub use window::{compute_window, lookback_string, needs_warning};
