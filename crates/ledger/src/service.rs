//! The ledger service: every operation over the three entity tables.
//!
//! Each operation executes as an atomic unit: validation, lookup, and
//! mutation happen without interleaving from another operation. An internal
//! mutex serializes the mutating paths, so two concurrent transfers of the
//! same credit cannot both read the same prior owner (the ownership check
//! is check-then-act, not compare-and-swap). A failed check always occurs
//! before any field is written.

use std::sync::{Mutex, MutexGuard, PoisonError};

use carbonharvest_core::{CreditId, LedgerError, LedgerResult, ProjectId, UserId};

use crate::credit::{Credit, IssueCredit, RetireCredit, TransferCredit, VerifyCredit};
use crate::project::{CreateProject, Project, UpdateProject};
use crate::store::{InMemoryStore, KeyValueStore};
use crate::user::{RegisterUser, UpdateUser, User};

/// Authoritative ledger over credits, projects, and users.
///
/// The service exclusively owns its three tables; no record is shared with
/// or mutated by any other component. It is generic over the table backend
/// so tests run against isolated in-memory instances and deployments can
/// inject whatever satisfies [`KeyValueStore`].
pub struct LedgerService<C, P, U> {
    credits: C,
    projects: P,
    users: U,
    /// Serializes check-then-act across all mutating operations.
    write: Mutex<()>,
}

/// Ledger backed entirely by in-memory tables.
pub type InMemoryLedger = LedgerService<
    InMemoryStore<CreditId, Credit>,
    InMemoryStore<ProjectId, Project>,
    InMemoryStore<UserId, User>,
>;

impl InMemoryLedger {
    pub fn in_memory() -> Self {
        Self::new(
            InMemoryStore::new(),
            InMemoryStore::new(),
            InMemoryStore::new(),
        )
    }
}

impl<C, P, U> LedgerService<C, P, U>
where
    C: KeyValueStore<CreditId, Credit>,
    P: KeyValueStore<ProjectId, Project>,
    U: KeyValueStore<UserId, User>,
{
    pub fn new(credits: C, projects: P, users: U) -> Self {
        Self {
            credits,
            projects,
            users,
            write: Mutex::new(()),
        }
    }

    fn write_guard(&self) -> MutexGuard<'_, ()> {
        // A poisoned guard only means another thread panicked mid-operation;
        // the tables themselves are never left half-written.
        self.write.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ─── credits ────────────────────────────────────────────────────────────

    /// Create a credit record, seeding the initial owner into its history.
    ///
    /// No referential check is performed on `project_id`/`owner_id`: credits
    /// may be issued against identifiers the ledger has not seen. Callers
    /// wanting stricter integrity enforce it before issuing.
    pub fn issue_credit(&self, req: IssueCredit) -> LedgerResult<Credit> {
        req.validate()?;

        let _guard = self.write_guard();
        if self.credits.exists(&req.credit_id) {
            return Err(LedgerError::conflict(format!(
                "credit {} already exists",
                req.credit_id
            )));
        }

        let credit = Credit::issue(req)?;
        self.credits.put(credit.credit_id.clone(), credit.clone());

        tracing::info!(credit_id = %credit.credit_id, owner = %credit.owner_id, "credit issued");
        Ok(credit)
    }

    /// Move a credit to a new owner.
    ///
    /// Fails `Unauthorized` unless `current_owner_id` is the owner of
    /// record, and `Conflict` if the credit has been retired.
    pub fn transfer_credit(&self, req: TransferCredit) -> LedgerResult<Credit> {
        req.validate()?;

        let _guard = self.write_guard();
        let mut credit = self
            .credits
            .get(&req.credit_id)
            .ok_or_else(|| LedgerError::not_found(format!("credit {}", req.credit_id)))?;

        credit.ensure_owned_by(&req.current_owner_id)?;
        if credit.is_retired() {
            return Err(LedgerError::conflict(format!(
                "credit {} is retired",
                req.credit_id
            )));
        }

        credit.record_transfer(req.new_owner_id);
        self.credits.put(req.credit_id.clone(), credit.clone());

        tracing::info!(
            credit_id = %credit.credit_id,
            from = %req.current_owner_id,
            to = %credit.owner_id,
            "credit transferred"
        );
        Ok(credit)
    }

    /// Permanently mark a credit as consumed.
    ///
    /// Only the owner of record may retire. Retiring an already-retired
    /// credit re-runs the same checks and re-sets the same fields, so the
    /// operation is idempotent for the owner.
    pub fn retire_credit(&self, req: RetireCredit) -> LedgerResult<Credit> {
        req.validate()?;

        let _guard = self.write_guard();
        let mut credit = self
            .credits
            .get(&req.credit_id)
            .ok_or_else(|| LedgerError::not_found(format!("credit {}", req.credit_id)))?;

        credit.ensure_owned_by(&req.retirer_id)?;

        credit.record_retirement(req.retirer_id);
        self.credits.put(req.credit_id.clone(), credit.clone());

        tracing::info!(credit_id = %credit.credit_id, retirer = %credit.owner_id, "credit retired");
        Ok(credit)
    }

    /// Overwrite a credit's verification status and attestation payload.
    ///
    /// No ownership check: any caller may verify. Integrators who want to
    /// restrict verification do so in the calling layer.
    pub fn verify_credit(&self, req: VerifyCredit) -> LedgerResult<Credit> {
        req.validate()?;

        let _guard = self.write_guard();
        let mut credit = self
            .credits
            .get(&req.credit_id)
            .ok_or_else(|| LedgerError::not_found(format!("credit {}", req.credit_id)))?;

        credit.record_verification(req.verification_status, req.verification_data);
        self.credits.put(req.credit_id.clone(), credit.clone());

        tracing::info!(credit_id = %credit.credit_id, status = %credit.verification_status, "credit verified");
        Ok(credit)
    }

    pub fn get_credit(&self, id: &CreditId) -> Option<Credit> {
        self.credits.get(id)
    }

    pub fn list_credits(&self) -> Vec<Credit> {
        self.credits.list()
    }

    pub fn credits_by_owner(&self, owner: &UserId) -> Vec<Credit> {
        self.credits
            .list()
            .into_iter()
            .filter(|c| &c.owner_id == owner)
            .collect()
    }

    pub fn credits_by_project(&self, project: &ProjectId) -> Vec<Credit> {
        self.credits
            .list()
            .into_iter()
            .filter(|c| &c.project_id == project)
            .collect()
    }

    // ─── projects ───────────────────────────────────────────────────────────

    pub fn create_project(&self, req: CreateProject) -> LedgerResult<Project> {
        req.validate()?;

        let _guard = self.write_guard();
        if self.projects.exists(&req.project_id) {
            return Err(LedgerError::conflict(format!(
                "project {} already exists",
                req.project_id
            )));
        }

        let project = Project::create(req)?;
        self.projects
            .put(project.project_id.clone(), project.clone());

        tracing::info!(project_id = %project.project_id, "project created");
        Ok(project)
    }

    pub fn update_project(&self, req: UpdateProject) -> LedgerResult<Project> {
        req.validate()?;

        let _guard = self.write_guard();
        let mut project = self
            .projects
            .get(&req.project_id)
            .ok_or_else(|| LedgerError::not_found(format!("project {}", req.project_id)))?;

        let key = project.project_id.clone();
        project.apply_update(req);
        self.projects.put(key, project.clone());

        tracing::info!(project_id = %project.project_id, "project updated");
        Ok(project)
    }

    pub fn get_project(&self, id: &ProjectId) -> Option<Project> {
        self.projects.get(id)
    }

    pub fn list_projects(&self) -> Vec<Project> {
        self.projects.list()
    }

    // ─── users ──────────────────────────────────────────────────────────────

    pub fn register_user(&self, req: RegisterUser) -> LedgerResult<User> {
        req.validate()?;

        let _guard = self.write_guard();
        if self.users.exists(&req.user_id) {
            return Err(LedgerError::conflict(format!(
                "user {} already exists",
                req.user_id
            )));
        }

        let user = User::register(req)?;
        self.users.put(user.user_id.clone(), user.clone());

        tracing::info!(user_id = %user.user_id, role = %user.role, "user registered");
        Ok(user)
    }

    pub fn update_user(&self, req: UpdateUser) -> LedgerResult<User> {
        req.validate()?;

        let _guard = self.write_guard();
        let mut user = self
            .users
            .get(&req.user_id)
            .ok_or_else(|| LedgerError::not_found(format!("user {}", req.user_id)))?;

        let key = user.user_id.clone();
        user.apply_update(req);
        self.users.put(key, user.clone());

        tracing::info!(user_id = %user.user_id, "user updated");
        Ok(user)
    }

    pub fn get_user(&self, id: &UserId) -> Option<User> {
        self.users.get(id)
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credit::OWNERSHIP_HISTORY_LIMIT;
    use proptest::prelude::*;

    fn ledger() -> InMemoryLedger {
        InMemoryLedger::in_memory()
    }

    fn issue_req(credit_id: &str, owner: &str) -> IssueCredit {
        IssueCredit {
            credit_id: credit_id.into(),
            project_id: "P1".into(),
            issuance_date: "2024-01-01".to_string(),
            quantity: 10.0,
            verification_status: "pending".to_string(),
            verification_data: String::new(),
            owner_id: owner.into(),
        }
    }

    fn create_project_req(project_id: &str) -> CreateProject {
        CreateProject {
            project_id: project_id.into(),
            description: "No-till farming across the district".to_string(),
            location: "Multan".to_string(),
            project_type: "soil-carbon".to_string(),
            verification_body: "Verra".to_string(),
        }
    }

    #[test]
    fn issue_then_lookup_round_trips() {
        let ledger = ledger();

        let issued = ledger.issue_credit(issue_req("C1", "U1")).unwrap();
        let fetched = ledger.get_credit(&"C1".into()).unwrap();

        assert_eq!(issued, fetched);
        assert_eq!(fetched.ownership_history, vec![UserId::from("U1")]);
        assert!(!fetched.retirement_status);
    }

    #[test]
    fn duplicate_issue_conflicts_and_leaves_record_unchanged() {
        let ledger = ledger();

        let original = ledger.issue_credit(issue_req("C1", "U1")).unwrap();

        let mut second = issue_req("C1", "U9");
        second.quantity = 99.0;
        let err = ledger.issue_credit(second).unwrap_err();

        assert!(matches!(err, LedgerError::Conflict(_)));
        assert_eq!(ledger.get_credit(&"C1".into()).unwrap(), original);
    }

    #[test]
    fn issue_rejects_incomplete_requests() {
        let ledger = ledger();

        let mut req = issue_req("C1", "U1");
        req.verification_status = String::new();
        assert!(matches!(
            ledger.issue_credit(req),
            Err(LedgerError::Validation(_))
        ));
        assert!(ledger.get_credit(&"C1".into()).is_none());
    }

    #[test]
    fn transfer_moves_ownership_and_appends_history() {
        let ledger = ledger();
        ledger.issue_credit(issue_req("C1", "U1")).unwrap();

        let credit = ledger
            .transfer_credit(TransferCredit {
                credit_id: "C1".into(),
                current_owner_id: "U1".into(),
                new_owner_id: "U2".into(),
            })
            .unwrap();

        assert_eq!(credit.owner_id, "U2".into());
        assert_eq!(
            credit.ownership_history,
            vec![UserId::from("U1"), UserId::from("U2")]
        );
    }

    #[test]
    fn transfer_by_non_owner_is_unauthorized_and_leaves_record_unchanged() {
        let ledger = ledger();
        ledger.issue_credit(issue_req("C1", "U1")).unwrap();
        ledger
            .transfer_credit(TransferCredit {
                credit_id: "C1".into(),
                current_owner_id: "U1".into(),
                new_owner_id: "U2".into(),
            })
            .unwrap();

        let before = ledger.get_credit(&"C1".into()).unwrap();
        let err = ledger
            .transfer_credit(TransferCredit {
                credit_id: "C1".into(),
                current_owner_id: "U1".into(),
                new_owner_id: "U3".into(),
            })
            .unwrap_err();

        assert_eq!(err, LedgerError::Unauthorized);
        assert_eq!(ledger.get_credit(&"C1".into()).unwrap(), before);
        assert_eq!(before.owner_id, "U2".into());
    }

    #[test]
    fn transfer_of_unknown_credit_is_not_found() {
        let ledger = ledger();

        let err = ledger
            .transfer_credit(TransferCredit {
                credit_id: "NOPE".into(),
                current_owner_id: "U1".into(),
                new_owner_id: "U2".into(),
            })
            .unwrap_err();

        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn retire_sets_status_and_records_retirer() {
        let ledger = ledger();
        ledger.issue_credit(issue_req("C1", "U2")).unwrap();

        let credit = ledger
            .retire_credit(RetireCredit {
                credit_id: "C1".into(),
                retirer_id: "U2".into(),
            })
            .unwrap();

        assert!(credit.retirement_status);
        assert_eq!(credit.retirer_id, Some("U2".into()));
    }

    #[test]
    fn retire_by_non_owner_is_unauthorized() {
        let ledger = ledger();
        ledger.issue_credit(issue_req("C1", "U1")).unwrap();

        let before = ledger.get_credit(&"C1".into()).unwrap();
        let err = ledger
            .retire_credit(RetireCredit {
                credit_id: "C1".into(),
                retirer_id: "U2".into(),
            })
            .unwrap_err();

        assert_eq!(err, LedgerError::Unauthorized);
        assert_eq!(ledger.get_credit(&"C1".into()).unwrap(), before);
    }

    #[test]
    fn retire_is_idempotent_for_the_owner_of_record() {
        let ledger = ledger();
        ledger.issue_credit(issue_req("C1", "U1")).unwrap();

        let first = ledger
            .retire_credit(RetireCredit {
                credit_id: "C1".into(),
                retirer_id: "U1".into(),
            })
            .unwrap();
        let second = ledger
            .retire_credit(RetireCredit {
                credit_id: "C1".into(),
                retirer_id: "U1".into(),
            })
            .unwrap();

        assert_eq!(first, second);
        assert!(second.retirement_status);
    }

    #[test]
    fn retired_credit_cannot_be_transferred() {
        let ledger = ledger();
        ledger.issue_credit(issue_req("C1", "U1")).unwrap();
        ledger
            .retire_credit(RetireCredit {
                credit_id: "C1".into(),
                retirer_id: "U1".into(),
            })
            .unwrap();

        let err = ledger
            .transfer_credit(TransferCredit {
                credit_id: "C1".into(),
                current_owner_id: "U1".into(),
                new_owner_id: "U2".into(),
            })
            .unwrap_err();

        assert!(matches!(err, LedgerError::Conflict(_)));
        assert_eq!(
            ledger.get_credit(&"C1".into()).unwrap().owner_id,
            "U1".into()
        );
    }

    #[test]
    fn verify_overwrites_both_fields_without_ownership_check() {
        let ledger = ledger();
        ledger.issue_credit(issue_req("C1", "U1")).unwrap();

        // No caller identity in the request at all.
        let credit = ledger
            .verify_credit(VerifyCredit {
                credit_id: "C1".into(),
                verification_status: "verified".to_string(),
                verification_data: "audit-2024-117".to_string(),
            })
            .unwrap();

        assert_eq!(credit.verification_status, "verified");
        assert_eq!(credit.verification_data, "audit-2024-117");
    }

    #[test]
    fn history_window_stays_bounded_under_many_transfers() {
        let ledger = ledger();
        ledger.issue_credit(issue_req("C1", "U0")).unwrap();

        let mut owner = String::from("U0");
        for i in 1..=250 {
            let next = format!("U{i}");
            ledger
                .transfer_credit(TransferCredit {
                    credit_id: "C1".into(),
                    current_owner_id: owner.as_str().into(),
                    new_owner_id: next.as_str().into(),
                })
                .unwrap();
            owner = next;
        }

        let credit = ledger.get_credit(&"C1".into()).unwrap();
        assert_eq!(credit.ownership_history.len(), OWNERSHIP_HISTORY_LIMIT);
        assert_eq!(credit.owner_id, "U250".into());
        assert_eq!(credit.ownership_history.last(), Some(&credit.owner_id));
        // Oldest entries slid out.
        assert_eq!(
            credit.ownership_history.first(),
            Some(&UserId::from("U151"))
        );
    }

    #[test]
    fn create_project_twice_conflicts() {
        let ledger = ledger();

        ledger.create_project(create_project_req("P1")).unwrap();
        let err = ledger
            .create_project(create_project_req("P1"))
            .unwrap_err();

        assert!(matches!(err, LedgerError::Conflict(_)));
    }

    #[test]
    fn update_project_overwrites_fields_but_not_identity() {
        let ledger = ledger();
        ledger.create_project(create_project_req("P1")).unwrap();

        let updated = ledger
            .update_project(UpdateProject {
                project_id: "P1".into(),
                description: "Expanded to 900ha".to_string(),
                location: "Multan".to_string(),
                project_type: "soil-carbon".to_string(),
                verification_body: "Gold Standard".to_string(),
            })
            .unwrap();

        assert_eq!(updated.project_id, "P1".into());
        assert_eq!(updated.description, "Expanded to 900ha");
        assert_eq!(updated.verification_body, "Gold Standard");
    }

    #[test]
    fn update_unknown_project_is_not_found() {
        let ledger = ledger();

        let err = ledger
            .update_project(UpdateProject {
                project_id: "P404".into(),
                description: "x".to_string(),
                location: "x".to_string(),
                project_type: "x".to_string(),
                verification_body: "x".to_string(),
            })
            .unwrap_err();

        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn register_user_twice_conflicts() {
        let ledger = ledger();

        let req = RegisterUser {
            user_id: "U1".into(),
            public_key: "mk-9f2c".to_string(),
            role: "farmer".to_string(),
        };
        ledger.register_user(req.clone()).unwrap();
        let err = ledger.register_user(req).unwrap_err();

        assert!(matches!(err, LedgerError::Conflict(_)));
    }

    #[test]
    fn update_user_overwrites_fields_but_not_identity() {
        let ledger = ledger();
        ledger
            .register_user(RegisterUser {
                user_id: "U1".into(),
                public_key: "mk-9f2c".to_string(),
                role: "farmer".to_string(),
            })
            .unwrap();

        let updated = ledger
            .update_user(UpdateUser {
                user_id: "U1".into(),
                public_key: "mk-0a11".to_string(),
                role: "industry".to_string(),
            })
            .unwrap();

        assert_eq!(updated.user_id, "U1".into());
        assert_eq!(updated.public_key, "mk-0a11");
        assert_eq!(updated.role, "industry");
    }

    #[test]
    fn owner_and_project_filters_select_the_right_credits() {
        let ledger = ledger();
        ledger.issue_credit(issue_req("C1", "U1")).unwrap();
        ledger.issue_credit(issue_req("C2", "U1")).unwrap();
        ledger.issue_credit(issue_req("C3", "U2")).unwrap();

        assert_eq!(ledger.credits_by_owner(&"U1".into()).len(), 2);
        assert_eq!(ledger.credits_by_owner(&"U2".into()).len(), 1);
        assert_eq!(ledger.credits_by_owner(&"U3".into()).len(), 0);
        assert_eq!(ledger.credits_by_project(&"P1".into()).len(), 3);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: however many transfers happen, the history window never
        /// exceeds its bound and its last element is the current owner.
        #[test]
        fn history_invariants_hold_for_any_transfer_count(
            transfers in 1usize..300
        ) {
            let ledger = ledger();
            ledger.issue_credit(issue_req("C1", "U0")).unwrap();

            let mut owner = String::from("U0");
            for i in 1..=transfers {
                let next = format!("U{i}");
                ledger
                    .transfer_credit(TransferCredit {
                        credit_id: "C1".into(),
                        current_owner_id: owner.as_str().into(),
                        new_owner_id: next.as_str().into(),
                    })
                    .unwrap();
                owner = next;
            }

            let credit = ledger.get_credit(&"C1".into()).unwrap();
            prop_assert!(credit.ownership_history.len() <= OWNERSHIP_HISTORY_LIMIT);
            prop_assert!(!credit.ownership_history.is_empty());
            prop_assert_eq!(credit.ownership_history.last(), Some(&credit.owner_id));
            prop_assert_eq!(&credit.owner_id, &UserId::from(owner.as_str()));
        }
    }
}
