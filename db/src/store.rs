use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use thiserror::Error;

use crate::object_id::ProjectId;
use crate::projects::{
    self, build_list_query, dsl, NewProject, Project, ProjectChanges, ProjectListQuery,
};
use crate::{Pool, PoolExt};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database Error: {0}")]
    Db(#[from] diesel::result::Error),

    #[error("Database Pool Error: {0}")]
    Pool(#[from] deadpool_diesel::PoolError),
}

/// The persistence seam for project records. Every operation is atomic at
/// single-row granularity; the read and update operations are scoped to
/// non-deleted rows, so a soft-deleted project is indistinguishable from an
/// absent one.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Persist a new project, assigning its id and timestamps.
    async fn insert(&self, project: NewProject) -> Result<Project, StoreError>;

    /// Fetch a non-deleted project by id.
    async fn find_active(&self, id: ProjectId) -> Result<Option<Project>, StoreError>;

    /// Fetch all non-deleted projects matching the query, in its sort order.
    async fn list(&self, query: &ProjectListQuery) -> Result<Vec<Project>, StoreError>;

    /// Apply the changes to a non-deleted project and bump `updated_at`,
    /// returning the updated row. Returns `None` when the id has no
    /// non-deleted row.
    async fn update(
        &self,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> Result<Option<Project>, StoreError>;

    /// Check that the backing storage is reachable.
    async fn healthy(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

#[derive(Clone)]
pub struct DieselProjectStore {
    pool: Pool,
}

impl DieselProjectStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for DieselProjectStore {
    async fn insert(&self, project: NewProject) -> Result<Project, StoreError> {
        let id = ProjectId::new();
        self.pool
            .interact(move |conn| {
                diesel::insert_into(projects::table)
                    .values((dsl::id.eq(id), &project))
                    .returning(Project::as_returning())
                    .get_result::<Project>(conn)
                    .map_err(StoreError::from)
            })
            .await
    }

    async fn find_active(&self, id: ProjectId) -> Result<Option<Project>, StoreError> {
        self.pool
            .interact(move |conn| {
                projects::table
                    .select(Project::as_select())
                    .filter(dsl::id.eq(id))
                    .filter(dsl::deleted.eq(false))
                    .first::<Project>(conn)
                    .optional()
                    .map_err(StoreError::from)
            })
            .await
    }

    async fn list(&self, query: &ProjectListQuery) -> Result<Vec<Project>, StoreError> {
        let query = query.clone();
        self.pool
            .interact(move |conn| {
                build_list_query(&query)
                    .load::<Project>(conn)
                    .map_err(StoreError::from)
            })
            .await
    }

    async fn update(
        &self,
        id: ProjectId,
        changes: ProjectChanges,
    ) -> Result<Option<Project>, StoreError> {
        self.pool
            .interact(move |conn| {
                diesel::update(
                    projects::table
                        .filter(dsl::id.eq(id))
                        .filter(dsl::deleted.eq(false)),
                )
                .set((changes, dsl::updated_at.eq(Utc::now())))
                .returning(Project::as_returning())
                .get_result::<Project>(conn)
                .optional()
                .map_err(StoreError::from)
            })
            .await
    }

    async fn healthy(&self) -> Result<bool, StoreError> {
        self.pool
            .interact(move |conn| {
                diesel::sql_query("SELECT 1")
                    .execute(conn)
                    .map_err(StoreError::from)
            })
            .await?;
        Ok(true)
    }
}
