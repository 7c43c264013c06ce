//! Renders ledger events into user-facing email notifications.

use std::sync::Arc;

use carbonharvest_ledger::LedgerEvent;
use carbonharvest_ledger::events::{
    CreditIssued, CreditRetired, CreditTransferred, UserRegistered,
};

use crate::mailer::{EmailMessage, Mailer};

/// Maps ledger events to notification emails and hands them to the mailer.
///
/// Not every event notifies: verification and record updates are silent
/// today. Delivery failures are logged and swallowed; the ledger record is
/// already committed by the time an event reaches this worker.
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    pub fn handle(&self, event: &LedgerEvent) {
        let Some(message) = render(event) else {
            return;
        };

        if let Err(e) = self.mailer.send(message) {
            tracing::warn!("notification delivery failed: {e}");
        }
    }
}

fn render(event: &LedgerEvent) -> Option<EmailMessage> {
    match event {
        LedgerEvent::CreditIssued(CreditIssued {
            credit_id,
            owner_id,
            quantity,
            ..
        }) => Some(EmailMessage::new(
            owner_id.as_str(),
            format!("Credit {credit_id} issued"),
            format!("{quantity} tCO2e of carbon credit {credit_id} has been issued to your account."),
        )),
        LedgerEvent::CreditTransferred(CreditTransferred { credit_id, to, .. }) => {
            Some(EmailMessage::new(
                to.as_str(),
                format!("Credit {credit_id} received"),
                format!("Carbon credit {credit_id} has been transferred to your account."),
            ))
        }
        LedgerEvent::CreditRetired(CreditRetired {
            credit_id,
            retirer_id,
            ..
        }) => Some(EmailMessage::new(
            retirer_id.as_str(),
            format!("Credit {credit_id} retired"),
            format!("Carbon credit {credit_id} has been permanently retired."),
        )),
        LedgerEvent::UserRegistered(UserRegistered { user_id, role, .. }) => {
            Some(EmailMessage::new(
                user_id.as_str(),
                "Welcome to CarbonHarvest".to_string(),
                format!("Your {role} account is ready."),
            ))
        }
        LedgerEvent::CreditVerified(_)
        | LedgerEvent::ProjectCreated(_)
        | LedgerEvent::ProjectUpdated(_)
        | LedgerEvent::UserUpdated(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::InMemoryMailer;
    use chrono::Utc;

    fn notifier() -> (Notifier, Arc<InMemoryMailer>) {
        let mailer = Arc::new(InMemoryMailer::new());
        (Notifier::new(mailer.clone()), mailer)
    }

    #[test]
    fn transfer_notifies_the_receiving_owner() {
        let (notifier, mailer) = notifier();

        notifier.handle(&LedgerEvent::CreditTransferred(CreditTransferred {
            credit_id: "C1".into(),
            from: "U1".into(),
            to: "U2".into(),
            occurred_at: Utc::now(),
        }));

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "U2");
        assert!(sent[0].subject.contains("C1"));
    }

    #[test]
    fn verification_is_silent() {
        let (notifier, mailer) = notifier();

        notifier.handle(&LedgerEvent::CreditVerified(
            carbonharvest_ledger::events::CreditVerified {
                credit_id: "C1".into(),
                verification_status: "verified".to_string(),
                occurred_at: Utc::now(),
            },
        ));

        assert!(mailer.sent().is_empty());
    }

    #[test]
    fn registration_sends_a_welcome() {
        let (notifier, mailer) = notifier();

        notifier.handle(&LedgerEvent::UserRegistered(UserRegistered {
            user_id: "U1".into(),
            role: "farmer".to_string(),
            occurred_at: Utc::now(),
        }));

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].body.contains("farmer"));
    }
}
