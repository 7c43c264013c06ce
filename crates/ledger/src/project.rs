//! Offset project record and its operation requests.

use serde::{Deserialize, Serialize};

use carbonharvest_core::{LedgerError, LedgerResult, ProjectId};

/// An agricultural offset project that credits are issued against.
///
/// Created once and updatable in place; never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: ProjectId,
    pub description: String,
    pub location: String,
    pub project_type: String,
    pub verification_body: String,
}

impl Project {
    pub fn create(req: CreateProject) -> LedgerResult<Self> {
        req.validate()?;
        Ok(Self {
            project_id: req.project_id,
            description: req.description,
            location: req.location,
            project_type: req.project_type,
            verification_body: req.verification_body,
        })
    }

    /// Overwrite the mutable fields from an update request.
    ///
    /// The identity key is deliberately not on this list: the stored
    /// `project_id` survives whatever the caller sends.
    pub fn apply_update(&mut self, req: UpdateProject) {
        self.description = req.description;
        self.location = req.location;
        self.project_type = req.project_type;
        self.verification_body = req.verification_body;
    }
}

/// Request: register a new offset project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProject {
    pub project_id: ProjectId,
    pub description: String,
    pub location: String,
    pub project_type: String,
    pub verification_body: String,
}

impl CreateProject {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.project_id.is_blank() {
            return Err(LedgerError::validation("project_id is required"));
        }
        validate_project_fields(
            &self.description,
            &self.location,
            &self.project_type,
            &self.verification_body,
        )
    }
}

/// Request: full overwrite of a project's mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProject {
    pub project_id: ProjectId,
    pub description: String,
    pub location: String,
    pub project_type: String,
    pub verification_body: String,
}

impl UpdateProject {
    pub fn validate(&self) -> LedgerResult<()> {
        if self.project_id.is_blank() {
            return Err(LedgerError::validation("project_id is required"));
        }
        validate_project_fields(
            &self.description,
            &self.location,
            &self.project_type,
            &self.verification_body,
        )
    }
}

fn validate_project_fields(
    description: &str,
    location: &str,
    project_type: &str,
    verification_body: &str,
) -> LedgerResult<()> {
    if description.trim().is_empty() {
        return Err(LedgerError::validation("description is required"));
    }
    if location.trim().is_empty() {
        return Err(LedgerError::validation("location is required"));
    }
    if project_type.trim().is_empty() {
        return Err(LedgerError::validation("project_type is required"));
    }
    if verification_body.trim().is_empty() {
        return Err(LedgerError::validation("verification_body is required"));
    }
    Ok(())
}
