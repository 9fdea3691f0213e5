//! Test support: an in-memory [`ProjectStore`] so service and API tests can
//! run without a Postgres instance.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::object_id::ProjectId;
use crate::projects::{NewProject, Project, ProjectChanges, ProjectListQuery};
use crate::store::{ProjectStore, StoreError};

#[derive(Default)]
pub struct MemoryProjectStore {
    projects: Mutex<Vec<Project>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a row by id without the non-deleted scope. This is the
    /// administrative view that the normal operations never expose; tests use
    /// it to check that soft-deleted rows physically remain.
    pub fn raw(&self, id: ProjectId) -> Option<Project> {
        self.projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    /// Seed a fully-specified row, bypassing the store's id and timestamp
    /// assignment.
    pub fn seed(&self, project: Project) {
        self.projects.lock().unwrap().push(project);
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn insert(&self, project: NewProject) -> Result<Project, StoreError> {
        let now = Utc::now();
        let project = Project {
            id: ProjectId::new(),
            name: project.name,
            client_name: project.client_name,
            status: project.status,
            priority: project.priority,
            start_date: project.start_date,
            end_date: project.end_date,
            deleted: false,
            created_at: now,
            updated_at: now,
        };

        self.projects.lock().unwrap().push(project.clone());
        Ok(project)
    }

    async fn find_active(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id && !p.deleted)
            .cloned())
    }

    async fn list(&self, query: &ProjectListQuery) -> Result<Vec<Project>, StoreError> {
        let mut result = self
            .projects
            .lock()
            .unwrap()
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect::<Vec<_>>();

        query.sort(&mut result);
        Ok(result)
    }

    async fn update(
        &self,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> Result<Option<Project>, StoreError> {
        let mut projects = self.projects.lock().unwrap();
        let Some(project) = projects.iter_mut().find(|p| p.id == id && !p.deleted) else {
            return Ok(None);
        };

        if let Some(status) = changes.status {
            project.status = status;
        }
        if let Some(priority) = changes.priority {
            project.priority = priority;
        }
        if let Some(deleted) = changes.deleted {
            project.deleted = deleted;
        }
        project.updated_at = Utc::now();

        Ok(Some(project.clone()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::enums::{ProjectPriority, ProjectStatus};

    fn new_project(name: &str) -> NewProject {
        NewProject {
            name: name.to_string(),
            client_name: "Acme Corp".to_string(),
            status: ProjectStatus::Active,
            priority: ProjectPriority::Medium,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            end_date: None,
        }
    }

    #[tokio::test]
    async fn soft_deleted_rows_remain_but_are_hidden() {
        let store = MemoryProjectStore::new();
        let project = store.insert(new_project("Website Redesign")).await.unwrap();

        let changes = ProjectChanges {
            deleted: Some(true),
            ..Default::default()
        };
        store.update(project.id, changes).await.unwrap().unwrap();

        assert!(store.find_active(project.id).await.unwrap().is_none());
        assert!(store
            .list(&ProjectListQuery::default())
            .await
            .unwrap()
            .is_empty());

        let raw = store.raw(project.id).expect("row should still exist");
        assert!(raw.deleted);
    }

    #[tokio::test]
    async fn update_is_scoped_to_non_deleted_rows() {
        let store = MemoryProjectStore::new();
        let project = store.insert(new_project("Website Redesign")).await.unwrap();

        let delete = ProjectChanges {
            deleted: Some(true),
            ..Default::default()
        };
        store.update(project.id, delete.clone()).await.unwrap();

        // A second update, including a repeated delete, sees nothing.
        assert!(store.update(project.id, delete).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_bumps_updated_at_and_applies_whitelisted_fields() {
        let store = MemoryProjectStore::new();
        let project = store.insert(new_project("Website Redesign")).await.unwrap();

        let changes = ProjectChanges {
            status: Some(ProjectStatus::OnHold),
            priority: Some(ProjectPriority::High),
            ..Default::default()
        };
        let updated = store.update(project.id, changes).await.unwrap().unwrap();

        assert_eq!(updated.status, ProjectStatus::OnHold);
        assert_eq!(updated.priority, ProjectPriority::High);
        assert!(updated.updated_at >= project.updated_at);
        assert_eq!(updated.created_at, project.created_at);
    }
}
