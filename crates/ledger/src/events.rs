//! Ledger events published to the surrounding application.
//!
//! The ledger itself never publishes: operations return the resulting
//! record and nothing else. The calling layer builds these events after a
//! successful operation and fans them out (notifications, live dashboards).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carbonharvest_core::{CreditId, ProjectId, UserId};
use carbonharvest_events::Event;

/// Event: a credit entered the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditIssued {
    pub credit_id: CreditId,
    pub project_id: ProjectId,
    pub owner_id: UserId,
    pub quantity: f64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a credit changed owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditTransferred {
    pub credit_id: CreditId,
    pub from: UserId,
    pub to: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a credit was permanently consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRetired {
    pub credit_id: CreditId,
    pub retirer_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a credit's verification axis changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditVerified {
    pub credit_id: CreditId,
    pub verification_status: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a new offset project was registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCreated {
    pub project_id: ProjectId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a project's details were overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectUpdated {
    pub project_id: ProjectId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a ledger user was registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    pub user_id: UserId,
    pub role: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a user's details were overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdated {
    pub user_id: UserId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    CreditIssued(CreditIssued),
    CreditTransferred(CreditTransferred),
    CreditRetired(CreditRetired),
    CreditVerified(CreditVerified),
    ProjectCreated(ProjectCreated),
    ProjectUpdated(ProjectUpdated),
    UserRegistered(UserRegistered),
    UserUpdated(UserUpdated),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::CreditIssued(_) => "credits.credit.issued",
            LedgerEvent::CreditTransferred(_) => "credits.credit.transferred",
            LedgerEvent::CreditRetired(_) => "credits.credit.retired",
            LedgerEvent::CreditVerified(_) => "credits.credit.verified",
            LedgerEvent::ProjectCreated(_) => "projects.project.created",
            LedgerEvent::ProjectUpdated(_) => "projects.project.updated",
            LedgerEvent::UserRegistered(_) => "users.user.registered",
            LedgerEvent::UserUpdated(_) => "users.user.updated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::CreditIssued(e) => e.occurred_at,
            LedgerEvent::CreditTransferred(e) => e.occurred_at,
            LedgerEvent::CreditRetired(e) => e.occurred_at,
            LedgerEvent::CreditVerified(e) => e.occurred_at,
            LedgerEvent::ProjectCreated(e) => e.occurred_at,
            LedgerEvent::ProjectUpdated(e) => e.occurred_at,
            LedgerEvent::UserRegistered(e) => e.occurred_at,
            LedgerEvent::UserUpdated(e) => e.occurred_at,
        }
    }
}
