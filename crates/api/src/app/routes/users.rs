use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;

use carbonharvest_auth::Permission;
use carbonharvest_ledger::events::{UserRegistered, UserUpdated};
use carbonharvest_ledger::{LedgerEvent, RegisterUser, UpdateUser};

use crate::app::routes::common::CmdAuth;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_user).get(list_users))
        .route("/:id", get(get_user).put(update_user))
}

async fn register_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::RegisterUserRequest>,
) -> axum::response::Response {
    let cmd = RegisterUser {
        user_id: body.user_id.into(),
        public_key: body.public_key,
        role: body.role,
    };

    // Onboarding goes through the regulator (the signup flow upstream acts
    // with regulator credentials once identity is vetted).
    let cmd_auth = CmdAuth {
        inner: cmd,
        required: vec![Permission::new("users.register")],
    };
    if let Err(e) = crate::authz::authorize_command(&principal, &cmd_auth) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let user = match services.ledger().register_user(cmd_auth.inner) {
        Ok(u) => u,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    services.publish(LedgerEvent::UserRegistered(UserRegistered {
        user_id: user.user_id.clone(),
        role: user.role.clone(),
        occurred_at: Utc::now(),
    }));

    (StatusCode::CREATED, Json(dto::user_to_json(&user))).into_response()
}

async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    let cmd = UpdateUser {
        user_id: id.into(),
        public_key: body.public_key,
        role: body.role,
    };

    let cmd_auth = CmdAuth {
        inner: cmd,
        required: vec![Permission::new("users.update")],
    };
    if let Err(e) = crate::authz::authorize_command(&principal, &cmd_auth) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let user = match services.ledger().update_user(cmd_auth.inner) {
        Ok(u) => u,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    services.publish(LedgerEvent::UserUpdated(UserUpdated {
        user_id: user.user_id.clone(),
        occurred_at: Utc::now(),
    }));

    (StatusCode::OK, Json(dto::user_to_json(&user))).into_response()
}

async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.ledger().get_user(&id.into()) {
        Some(user) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
    }
}

async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items = services
        .ledger()
        .list_users()
        .iter()
        .map(dto::user_to_json)
        .collect::<Vec<_>>();

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
