//! Shared test utilities for the `delivery` module.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use crate::delivery::mailer::{Mailer, OutgoingEmail};
use crate::error::{Result, SheetError};

/// Mailer that records every email instead of sending it.
///
/// Use [`sent_handle`](Self::sent_handle) to read the recorded emails after
/// the mailer has been moved behind an `Arc<dyn Mailer>`.
#[derive(Default)]
pub(crate) struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
    fail: bool,
}

impl RecordingMailer {
    /// A mailer whose every send fails with a delivery error.
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Shared handle to the recorded emails.
    pub(crate) fn sent_handle(&self) -> Arc<Mutex<Vec<OutgoingEmail>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for RecordingMailer {
    fn send<'a>(
        &'a self,
        email: &'a OutgoingEmail,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail {
                return Err(SheetError::Delivery("smtp down".into()));
            }
            self.sent
                .lock()
                .map_err(|_| SheetError::Delivery("mailer lock poisoned".into()))?
                .push(email.clone());
            Ok(())
        })
    }
}
