use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use db::object_id::ProjectId;
use db::projects::{Project, ProjectListQuery, SortField, SortOrder};
use db::{ProjectPriority, ProjectStatus};
use track_store_db as db;

use crate::{
    service::{CreateProject, UpdateProject},
    shared_state::AppState,
    Error,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOutput {
    id: ProjectId,
    name: String,
    client_name: String,
    status: ProjectStatus,
    priority: ProjectPriority,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectOutput {
    fn from(value: Project) -> Self {
        ProjectOutput {
            id: value.id,
            name: value.name,
            client_name: value.client_name,
            status: value.status,
            priority: value.priority,
            start_date: value.start_date,
            end_date: value.end_date,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsParams {
    status: Option<ProjectStatus>,
    priority: Option<ProjectPriority>,
    search: Option<String>,
    sort_by: Option<String>,
    #[serde(default)]
    sort_order: SortOrder,
    created_from_date: Option<NaiveDate>,
    created_to_date: Option<NaiveDate>,
    start_from_date: Option<NaiveDate>,
    start_to_date: Option<NaiveDate>,
}

impl ListProjectsParams {
    fn into_query(self) -> ProjectListQuery {
        ProjectListQuery {
            status: self.status,
            priority: self.priority,
            search: self.search,
            sort_by: SortField::parse_or_default(self.sort_by.as_deref()),
            sort_order: self.sort_order,
            created_from: self.created_from_date.map(start_of_day),
            created_to: self.created_to_date.map(start_of_day),
            start_from: self.start_from_date,
            start_to: self.start_to_date,
        }
    }
}

// The created-date bounds compare against midnight UTC on both ends, which is
// what the original filter form submits.
fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProjectStatus {
    status: ProjectStatus,
}

async fn new_project(
    State(state): State<AppState>,
    payload: Result<Json<CreateProject>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(body) = payload?;
    let project = state.service.create(body).await?;

    Ok((StatusCode::CREATED, Json(ProjectOutput::from(project))))
}

async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<ListProjectsParams>,
) -> Result<impl IntoResponse, Error> {
    let projects = state.service.list(params.into_query()).await?;
    let output = projects
        .into_iter()
        .map(ProjectOutput::from)
        .collect::<Vec<_>>();

    Ok((StatusCode::OK, Json(output)))
}

async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<impl IntoResponse, Error> {
    let project = state.service.get(project_id).await?;

    Ok((StatusCode::OK, Json(ProjectOutput::from(project))))
}

async fn write_project_status(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    payload: Result<Json<UpdateProjectStatus>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(body) = payload?;
    let project = state.service.update_status(project_id, body.status).await?;

    Ok((StatusCode::OK, Json(ProjectOutput::from(project))))
}

async fn write_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    payload: Result<Json<UpdateProject>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(body) = payload?;
    let project = state.service.update(project_id, body).await?;

    Ok((StatusCode::OK, Json(ProjectOutput::from(project))))
}

async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<impl IntoResponse, Error> {
    state.service.delete(project_id).await?;

    Ok((StatusCode::OK, Json(json!({}))))
}

pub fn configure() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects))
        .route("/", post(new_project))
        .route("/:project_id", get(get_project))
        .route("/:project_id", patch(write_project))
        .route("/:project_id", delete(delete_project))
        .route("/:project_id/status", patch(write_project_status))
}
