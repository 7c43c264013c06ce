//! `carbonharvest-ledger` — the authoritative carbon-credit ledger.
//!
//! Three entity tables (credits, projects, users) and the operations over
//! them: issuance, transfer, retirement, verification, and entity CRUD.
//! All operations are synchronous in-memory transitions that either return
//! the resulting record or fail atomically with one of the four
//! [`carbonharvest_core::LedgerError`] kinds.

pub mod credit;
pub mod events;
pub mod project;
pub mod service;
pub mod store;
pub mod user;

pub use credit::{
    Credit, IssueCredit, OWNERSHIP_HISTORY_LIMIT, RetireCredit, TransferCredit, VerifyCredit,
};
pub use events::LedgerEvent;
pub use project::{CreateProject, Project, UpdateProject};
pub use service::{InMemoryLedger, LedgerService};
pub use store::{InMemoryStore, KeyValueStore};
pub use user::{RegisterUser, UpdateUser, User};
