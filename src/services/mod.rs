pub mod mutation;
pub mod notifier;
pub mod query_cache;

pub use mutation::{MutationMessages, MutationOutcome, MutationRunner};
pub use notifier::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use query_cache::{Invalidation, QueryCache, QueryKey};
