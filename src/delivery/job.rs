//! Background delivery of an uploaded timesheet.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::delivery::mailer::{EmailAttachment, Mailer, OutgoingEmail, Recipients};
use crate::delivery::slack::SlackNotifier;
use crate::identity::display_name;

/// Everything one delivery needs, owned so it can outlive the request.
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    /// Name of the stored file, including extension.
    pub file_name: String,
    /// File contents.
    pub data: Vec<u8>,
    /// Who receives the email.
    pub recipients: Recipients,
    /// Repository the timesheet was generated from, if known.
    pub repo_name: Option<String>,
    /// Link to the timesheet in the frontend.
    pub link: String,
}

/// Subject line for a timesheet received at `at`.
pub fn subject<Tz: TimeZone>(repo_name: Option<&str>, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "TimeSheet received for {}, {}",
        repo_name.unwrap_or("unknown repository"),
        at.format("%B %-d %Y, %-I:%M %p")
    )
}

/// HTML body with a greeting and the dashboard link.
pub fn render_html(recipient_name: &str, link: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html><body>\n\
         <p>Hi {recipient_name},</p>\n\
         <p>A new timesheet has been submitted. The CSV is attached; you can also view it online:</p>\n\
         <p><a href=\"{link}\">{link}</a></p>\n\
         </body></html>\n"
    )
}

impl DeliveryJob {
    /// Builds the email for this job.
    pub fn email(&self) -> OutgoingEmail {
        let to = &self.recipients.to;
        let greeting = to
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| display_name(to.email.user()));

        OutgoingEmail {
            recipients: self.recipients.clone(),
            subject: subject(self.repo_name.as_deref(), &Local::now()),
            html: render_html(&greeting, &self.link),
            attachments: vec![EmailAttachment {
                file_name: self.file_name.clone(),
                content_type: "text/csv".to_string(),
                data: self.data.clone(),
            }],
        }
    }

    /// Sends the email, then the optional Slack notice.
    ///
    /// Failures are logged and never propagated; the stored file is
    /// unaffected by them.
    pub async fn run(self, mailer: Arc<dyn Mailer>, notifier: Option<Arc<SlackNotifier>>) {
        let email = self.email();
        if let Err(e) = mailer.send(&email).await {
            error!(file = %self.file_name, error = %e, "Failed to email timesheet");
            return;
        }
        info!(file = %self.file_name, to = %self.recipients.to, "Timesheet emailed");

        if let Some(notifier) = notifier {
            if let Err(e) = notifier.notify(&self.file_name, &self.link).await {
                warn!(file = %self.file_name, error = %e, "Slack notification failed");
            }
        }
    }

    /// Runs the job on a detached task.
    pub fn spawn(
        self,
        mailer: Arc<dyn Mailer>,
        notifier: Option<Arc<SlackNotifier>>,
    ) -> JoinHandle<()> {
        tokio::spawn(self.run(mailer, notifier))
    }
}
