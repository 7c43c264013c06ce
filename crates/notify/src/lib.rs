//! `carbonharvest-notify` — email notification boundary.
//!
//! The ledger never calls into this crate; the API wiring subscribes a
//! [`Notifier`] to the event bus and lets it render and send messages.
//! SMTP delivery is an external concern behind the [`Mailer`] trait.

pub mod mailer;
pub mod notifier;

pub use mailer::{EmailMessage, InMemoryMailer, Mailer, NotifyError, TracingMailer};
pub use notifier::Notifier;
