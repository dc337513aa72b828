//! Vestry media subsystem
//!
//! Routes editor uploads to the image CDN or the fallback bucket, and turns
//! stored [`MediaReference`](vestry_core::MediaReference)s into delivery URLs.
//!
//! Components, leaves first:
//!
//! - [`MediaConfigProvider`]: TTL cache over the media settings
//! - [`DeliveryUrlResolver`]: reference + display options → URL
//! - [`UploadRouter`]: file + folder → [`UploadOutcome`](vestry_core::UploadOutcome)

pub mod cdn;
pub mod config_cache;
pub mod lifecycle;
pub mod notify;
pub mod resolver;
pub mod router;

pub use cdn::{CdnClient, CdnError, CdnUploadResponse};
pub use config_cache::MediaConfigProvider;
pub use lifecycle::MediaLifecycle;
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use resolver::DeliveryUrlResolver;
pub use router::{FallbackPolicy, UploadRouter};
