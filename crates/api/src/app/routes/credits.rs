use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use carbonharvest_auth::Permission;
use carbonharvest_ledger::events::{
    CreditIssued, CreditRetired, CreditTransferred, CreditVerified,
};
use carbonharvest_ledger::{
    IssueCredit, LedgerEvent, RetireCredit, TransferCredit, VerifyCredit,
};

use crate::app::routes::common::CmdAuth;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(issue_credit).get(list_credits))
        .route("/:id", get(get_credit))
        .route("/:id/transfer", post(transfer_credit))
        .route("/:id/retire", post(retire_credit))
        .route("/:id/verify", post(verify_credit))
}

async fn issue_credit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::IssueCreditRequest>,
) -> axum::response::Response {
    let cmd = IssueCredit {
        credit_id: body.credit_id.into(),
        project_id: body.project_id.into(),
        issuance_date: body.issuance_date,
        quantity: body.quantity,
        verification_status: body.verification_status,
        verification_data: body.verification_data,
        owner_id: body.owner_id.into(),
    };

    let cmd_auth = CmdAuth {
        inner: cmd,
        required: vec![Permission::new("credits.issue")],
    };
    if let Err(e) = crate::authz::authorize_command(&principal, &cmd_auth) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let credit = match services.ledger().issue_credit(cmd_auth.inner) {
        Ok(c) => c,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    services.publish(LedgerEvent::CreditIssued(CreditIssued {
        credit_id: credit.credit_id.clone(),
        project_id: credit.project_id.clone(),
        owner_id: credit.owner_id.clone(),
        quantity: credit.quantity,
        occurred_at: Utc::now(),
    }));

    (StatusCode::CREATED, Json(dto::credit_to_json(&credit))).into_response()
}

async fn transfer_credit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::TransferCreditRequest>,
) -> axum::response::Response {
    let cmd = TransferCredit {
        credit_id: id.into(),
        current_owner_id: body.current_owner_id.into(),
        new_owner_id: body.new_owner_id.into(),
    };

    let cmd_auth = CmdAuth {
        inner: cmd,
        required: vec![Permission::new("credits.transfer")],
    };
    if let Err(e) = crate::authz::authorize_command(&principal, &cmd_auth) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let from = cmd_auth.inner.current_owner_id.clone();
    let credit = match services.ledger().transfer_credit(cmd_auth.inner) {
        Ok(c) => c,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    services.publish(LedgerEvent::CreditTransferred(CreditTransferred {
        credit_id: credit.credit_id.clone(),
        from,
        to: credit.owner_id.clone(),
        occurred_at: Utc::now(),
    }));

    (StatusCode::OK, Json(dto::credit_to_json(&credit))).into_response()
}

async fn retire_credit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::RetireCreditRequest>,
) -> axum::response::Response {
    let cmd = RetireCredit {
        credit_id: id.into(),
        retirer_id: body.retirer_id.into(),
    };

    let cmd_auth = CmdAuth {
        inner: cmd,
        required: vec![Permission::new("credits.retire")],
    };
    if let Err(e) = crate::authz::authorize_command(&principal, &cmd_auth) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let credit = match services.ledger().retire_credit(cmd_auth.inner) {
        Ok(c) => c,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    services.publish(LedgerEvent::CreditRetired(CreditRetired {
        credit_id: credit.credit_id.clone(),
        retirer_id: credit
            .retirer_id
            .clone()
            .unwrap_or_else(|| credit.owner_id.clone()),
        occurred_at: Utc::now(),
    }));

    (StatusCode::OK, Json(dto::credit_to_json(&credit))).into_response()
}

async fn verify_credit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::VerifyCreditRequest>,
) -> axum::response::Response {
    let cmd = VerifyCredit {
        credit_id: id.into(),
        verification_status: body.verification_status,
        verification_data: body.verification_data,
    };

    let cmd_auth = CmdAuth {
        inner: cmd,
        required: vec![Permission::new("credits.verify")],
    };
    if let Err(e) = crate::authz::authorize_command(&principal, &cmd_auth) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let credit = match services.ledger().verify_credit(cmd_auth.inner) {
        Ok(c) => c,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    services.publish(LedgerEvent::CreditVerified(CreditVerified {
        credit_id: credit.credit_id.clone(),
        verification_status: credit.verification_status.clone(),
        occurred_at: Utc::now(),
    }));

    (StatusCode::OK, Json(dto::credit_to_json(&credit))).into_response()
}

async fn get_credit(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.ledger().get_credit(&id.into()) {
        Some(credit) => (StatusCode::OK, Json(dto::credit_to_json(&credit))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "credit not found"),
    }
}

async fn list_credits(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::ListCreditsParams>,
) -> axum::response::Response {
    let credits = match (&params.owner, &params.project) {
        (Some(owner), _) => services.ledger().credits_by_owner(&owner.as_str().into()),
        (None, Some(project)) => services
            .ledger()
            .credits_by_project(&project.as_str().into()),
        (None, None) => services.ledger().list_credits(),
    };

    let items = credits.iter().map(dto::credit_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
