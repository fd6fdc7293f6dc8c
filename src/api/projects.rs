use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde_json::{Value, json};

use crate::db::{project as project_db, seed};
use crate::models::{CreateProjectInput, Stage, UpdateProjectInput};

use super::{ApiError, AppState, ProjectView};

pub(super) async fn list(State(state): State<AppState>) -> Result<Json<Vec<ProjectView>>, ApiError> {
    let projects = project_db::list_projects(&*state.db()?, None)?;
    Ok(Json(ProjectView::all(projects, Utc::now())))
}

pub(super) async fn list_by_stage(
    State(state): State<AppState>,
    Path(stage): Path<String>,
) -> Result<Json<Vec<ProjectView>>, ApiError> {
    let stage: Stage = stage
        .parse()
        .map_err(|e: anyhow::Error| ApiError::Validation(e.to_string()))?;
    let projects = project_db::list_projects_by_stage(&*state.db()?, stage)?;
    Ok(Json(ProjectView::all(projects, Utc::now())))
}

pub(super) async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProjectView>, ApiError> {
    let project = project_db::get_project(&*state.db()?, &id)?.ok_or_else(ApiError::not_found)?;
    Ok(Json(ProjectView::at(project, Utc::now())))
}

pub(super) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateProjectInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ProjectView>), ApiError> {
    let Json(input) = payload?;
    let project = project_db::create_project(&*state.db()?, input)?;
    tracing::info!(id = %project.id, project_id = %project.project_id, "project created");
    Ok((StatusCode::CREATED, Json(ProjectView::at(project, Utc::now()))))
}

pub(super) async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateProjectInput>, JsonRejection>,
) -> Result<Json<ProjectView>, ApiError> {
    let Json(patch) = payload?;
    let project =
        project_db::update_project(&*state.db()?, &id, patch)?.ok_or_else(ApiError::not_found)?;
    tracing::info!(id = %project.id, "project updated");
    Ok(Json(ProjectView::at(project, Utc::now())))
}

pub(super) async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !project_db::delete_project(&*state.db()?, &id)? {
        return Err(ApiError::not_found());
    }
    tracing::info!(id = %id, "project deleted");
    Ok(Json(json!({ "message": "Project deleted" })))
}

pub(super) async fn clear_all(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let deleted = project_db::clear_projects(&*state.db()?)?;
    tracing::info!(deleted, "all projects cleared");
    Ok(Json(json!({
        "message": "All projects cleared successfully",
        "deleted": deleted,
    })))
}

pub(super) async fn seed(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let count = seed::seed_projects(&*state.db()?)?;
    Ok(Json(json!({
        "message": "Sample data successfully added",
        "count": count,
    })))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};

    use crate::api::tests::{send, test_app};

    fn body(project_id: &str) -> Value {
        json!({
            "projectId": project_id,
            "projectName": "Zen 6 Core Microarchitecture",
            "startDate": "2025-01-10",
            "endDate": "2025-12-15",
            "stage": "In Progress",
            "resourceAllocated": 5.5,
            "ppaTarget": { "performance": "+15% Perf", "power": "+0% Power", "area": "+2% Area" },
            "eligibleRD": 80,
            "actualSpend": 1200000,
            "forecastSpend": 1500000,
            "taxCreditEligible": 1
        })
    }

    #[tokio::test]
    async fn test_create_get_update_delete() {
        let (app, _dir) = test_app();

        let (status, created) = send(&app, Method::POST, "/projects", Some(body("CPU-014"))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["name"], "Zen 6 Core Microarchitecture");
        assert_eq!(created["taxCreditEligible"], 192_000);
        assert_eq!(created["duration"], 339);
        assert!(created["completionPercentage"].is_f64());
        let id = created["_id"].as_str().unwrap().to_string();

        let (status, fetched) = send(&app, Method::GET, &format!("/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["projectId"], "CPU-014");

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/projects/{id}"),
            Some(json!({ "stage": "Completed", "actualSpend": 100000 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["stage"], "Completed");
        assert_eq!(updated["taxCreditEligible"], 16_000);
        assert_eq!(updated["resourceAllocated"], 5.5);

        let (status, deleted) = send(&app, Method::DELETE, &format!("/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["message"], "Project deleted");

        let (status, missing) = send(&app, Method::GET, &format!("/projects/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(missing["message"], "Project not found");
    }

    #[tokio::test]
    async fn test_unknown_id_is_404_for_every_method() {
        let (app, _dir) = test_app();
        for method in [Method::GET, Method::DELETE] {
            let (status, _) = send(&app, method, "/projects/nope", None).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        let (status, _) = send(
            &app,
            Method::PUT,
            "/projects/nope",
            Some(json!({ "name": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_project_id_is_client_error() {
        let (app, _dir) = test_app();
        send(&app, Method::POST, "/projects", Some(body("GPU-001"))).await;

        let (status, err) = send(&app, Method::POST, "/projects", Some(body("GPU-001"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["message"].as_str().unwrap().contains("GPU-001"));
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_client_errors() {
        let (app, _dir) = test_app();

        let mut bad_stage = body("X-1");
        bad_stage["stage"] = json!("Planning");
        let mut missing = body("X-2");
        missing.as_object_mut().unwrap().remove("forecastSpend");
        let mut backwards = body("X-3");
        backwards["endDate"] = json!("2024-01-01");
        let mut over = body("X-4");
        over["eligibleRD"] = json!(150);

        for payload in [bad_stage, missing, backwards, over] {
            let (status, err) = send(&app, Method::POST, "/projects", Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(err["message"].is_string());
        }

        let (_, list) = send(&app, Method::GET, "/projects", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_list_sorted_and_filtered_by_stage() {
        let (app, _dir) = test_app();
        for pid in ["IP-022", "AI-008"] {
            send(&app, Method::POST, "/projects", Some(body(pid))).await;
        }
        let mut design = body("CPU-001");
        design["stage"] = json!("R&D Prototype");
        send(&app, Method::POST, "/projects", Some(design)).await;

        let (_, list) = send(&app, Method::GET, "/projects", None).await;
        let ids: Vec<&str> = list
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["projectId"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["AI-008", "CPU-001", "IP-022"]);

        let (status, rd) =
            send(&app, Method::GET, "/projects/stage/R%26D%20Prototype", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rd.as_array().unwrap().len(), 1);

        let (status, _) = send(&app, Method::GET, "/projects/stage/Planning", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reseed_is_rejected() {
        let (app, _dir) = test_app();
        send(&app, Method::POST, "/projects/seed", None).await;

        let (status, _) = send(&app, Method::POST, "/projects/seed", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, stats) = send(&app, Method::GET, "/projects/stats/dashboard", None).await;
        assert_eq!(stats["totalProjects"], 57);
    }

    #[tokio::test]
    async fn test_clear_all_is_idempotent() {
        let (app, _dir) = test_app();
        let (status, body) = send(&app, Method::DELETE, "/projects/clear-all", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], 0);
    }
}
