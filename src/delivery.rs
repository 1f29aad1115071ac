//! Delivery channels: email with attachment and Slack notifications.

pub mod job;
pub mod mailer;
pub mod slack;

#[cfg(test)]
pub(crate) mod test_utils;

pub use job::DeliveryJob;
pub use mailer::{EmailAttachment, Mailer, OutgoingEmail, Recipients, SmtpMailer};
pub use slack::SlackNotifier;
