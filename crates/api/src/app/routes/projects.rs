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
use carbonharvest_ledger::events::{ProjectCreated, ProjectUpdated};
use carbonharvest_ledger::{CreateProject, LedgerEvent, UpdateProject};

use crate::app::routes::common::CmdAuth;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_project).get(list_projects))
        .route("/:id", get(get_project).put(update_project))
}

async fn create_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateProjectRequest>,
) -> axum::response::Response {
    let cmd = CreateProject {
        project_id: body.project_id.into(),
        description: body.description,
        location: body.location,
        project_type: body.project_type,
        verification_body: body.verification_body,
    };

    let cmd_auth = CmdAuth {
        inner: cmd,
        required: vec![Permission::new("projects.create")],
    };
    if let Err(e) = crate::authz::authorize_command(&principal, &cmd_auth) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let project = match services.ledger().create_project(cmd_auth.inner) {
        Ok(p) => p,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    services.publish(LedgerEvent::ProjectCreated(ProjectCreated {
        project_id: project.project_id.clone(),
        occurred_at: Utc::now(),
    }));

    (StatusCode::CREATED, Json(dto::project_to_json(&project))).into_response()
}

async fn update_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProjectRequest>,
) -> axum::response::Response {
    let cmd = UpdateProject {
        project_id: id.into(),
        description: body.description,
        location: body.location,
        project_type: body.project_type,
        verification_body: body.verification_body,
    };

    let cmd_auth = CmdAuth {
        inner: cmd,
        required: vec![Permission::new("projects.update")],
    };
    if let Err(e) = crate::authz::authorize_command(&principal, &cmd_auth) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let project = match services.ledger().update_project(cmd_auth.inner) {
        Ok(p) => p,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    services.publish(LedgerEvent::ProjectUpdated(ProjectUpdated {
        project_id: project.project_id.clone(),
        occurred_at: Utc::now(),
    }));

    (StatusCode::OK, Json(dto::project_to_json(&project))).into_response()
}

async fn get_project(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match services.ledger().get_project(&id.into()) {
        Some(project) => (StatusCode::OK, Json(dto::project_to_json(&project))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "project not found"),
    }
}

async fn list_projects(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let items = services
        .ledger()
        .list_projects()
        .iter()
        .map(dto::project_to_json)
        .collect::<Vec<_>>();

    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}
