//! Request/response DTOs and JSON mapping helpers.
//!
//! Field names are camelCase on the wire; the ledger's own records never
//! leave this module unserialized.

use serde::Deserialize;
use serde_json::json;

use carbonharvest_ledger::{Credit, Project, User};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCreditRequest {
    pub credit_id: String,
    pub project_id: String,
    pub issuance_date: String,
    pub quantity: f64,
    pub verification_status: String,
    #[serde(default)]
    pub verification_data: String,
    pub owner_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCreditRequest {
    pub current_owner_id: String,
    pub new_owner_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetireCreditRequest {
    pub retirer_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCreditRequest {
    pub verification_status: String,
    #[serde(default)]
    pub verification_data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub project_id: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "type")]
    pub project_type: String,
    pub verification_body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub description: String,
    pub location: String,
    #[serde(rename = "type")]
    pub project_type: String,
    pub verification_body: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub user_id: String,
    pub public_key: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub public_key: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct ListCreditsParams {
    pub owner: Option<String>,
    pub project: Option<String>,
}

pub fn credit_to_json(credit: &Credit) -> serde_json::Value {
    json!({
        "creditId": credit.credit_id.as_str(),
        "projectId": credit.project_id.as_str(),
        "issuanceDate": credit.issuance_date,
        "quantity": credit.quantity,
        "verificationStatus": credit.verification_status,
        "verificationData": credit.verification_data,
        "ownerId": credit.owner_id.as_str(),
        "ownershipHistory": credit
            .ownership_history
            .iter()
            .map(|u| u.as_str())
            .collect::<Vec<_>>(),
        "retirementStatus": credit.retirement_status,
        "retirerId": credit.retirer_id.as_ref().map(|u| u.as_str()),
    })
}

pub fn project_to_json(project: &Project) -> serde_json::Value {
    json!({
        "projectId": project.project_id.as_str(),
        "description": project.description,
        "location": project.location,
        "type": project.project_type,
        "verificationBody": project.verification_body,
    })
}

pub fn user_to_json(user: &User) -> serde_json::Value {
    json!({
        "userId": user.user_id.as_str(),
        "publicKey": user.public_key,
        "role": user.role,
    })
}
