use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;

use track_store_db::object_id::ProjectId;
use track_store_db::projects::{NewProject, Project, ProjectChanges, ProjectListQuery};
use track_store_db::{ProjectPriority, ProjectStatus, ProjectStore};

use crate::error::{Error, Result};

/// A project creation request. Required fields are optional here so that the
/// service owns the "missing field" failure instead of the deserializer.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: Option<String>,
    pub client_name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// A generic project update. Only these fields are mutable; anything else in
/// the request body is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
}

/// Orchestrates the project lifecycle over a [`ProjectStore`]. All reads and
/// writes go through the store's non-deleted scope, so a soft-deleted project
/// surfaces as [`Error::NotFound`] just like an id that never existed.
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreateProject) -> Result<Project> {
        let project = validate_new_project(input)?;
        Ok(self.store.insert(project).await?)
    }

    pub async fn list(&self, query: ProjectListQuery) -> Result<Vec<Project>> {
        Ok(self.store.list(&query).await?)
    }

    pub async fn get(&self, id: ProjectId) -> Result<Project> {
        self.store.find_active(id).await?.ok_or(Error::NotFound)
    }

    pub async fn update_status(&self, id: ProjectId, requested: ProjectStatus) -> Result<Project> {
        let current = self.get(id).await?;
        check_transition(current.status, requested)?;

        let changes = ProjectChanges {
            status: Some(requested),
            ..Default::default()
        };
        self.store.update(id, changes).await?.ok_or(Error::NotFound)
    }

    pub async fn update(&self, id: ProjectId, updates: UpdateProject) -> Result<Project> {
        let current = self.get(id).await?;

        // A status change must pass the transition check before any of the
        // other fields are applied.
        if let Some(requested) = updates.status {
            check_transition(current.status, requested)?;
        }

        let changes = ProjectChanges {
            status: updates.status,
            priority: updates.priority,
            deleted: None,
        };
        self.store.update(id, changes).await?.ok_or(Error::NotFound)
    }

    pub async fn delete(&self, id: ProjectId) -> Result<()> {
        let changes = ProjectChanges {
            deleted: Some(true),
            ..Default::default()
        };
        self.store
            .update(id, changes)
            .await?
            .map(|_| ())
            .ok_or(Error::NotFound)
    }

    pub async fn healthy(&self) -> bool {
        matches!(self.store.healthy().await, Ok(true))
    }
}

fn check_transition(current: ProjectStatus, requested: ProjectStatus) -> Result<()> {
    if current.can_transition_to(requested) {
        Ok(())
    } else {
        Err(Error::InvalidTransition {
            current,
            requested,
            allowed: current.allowed_transitions(),
        })
    }
}

fn validate_new_project(input: CreateProject) -> Result<NewProject> {
    let name = required_string(input.name, "name", "Project name is required")?;
    let client_name =
        required_string(input.client_name, "clientName", "Client name is required")?;
    let start_date = input.start_date.ok_or_else(|| Error::Validation {
        field: "startDate",
        message: "Start date is required".to_string(),
    })?;

    if let Some(end_date) = input.end_date {
        if end_date < start_date {
            return Err(Error::Validation {
                field: "endDate",
                message: "End date must be greater than or equal to start date".to_string(),
            });
        }
    }

    Ok(NewProject {
        name,
        client_name,
        status: input.status.unwrap_or_default(),
        priority: input.priority.unwrap_or_default(),
        start_date,
        end_date: input.end_date,
    })
}

fn required_string(
    value: Option<String>,
    field: &'static str,
    message: &str,
) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .ok_or_else(|| Error::Validation {
            field,
            message: message.to_string(),
        })
}
