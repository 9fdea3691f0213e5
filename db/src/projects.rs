use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use serde::Deserialize;

use crate::enums::{ProjectPriority, ProjectStatus};
use crate::object_id::ProjectId;
use crate::schema::*;

pub use crate::schema::projects::{dsl, table, BoxedQuery};

#[derive(Clone, Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = projects)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub client_name: String,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated project ready to be persisted. The store assigns the id and
/// the timestamps.
#[derive(Clone, Debug, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProject {
    pub name: String,
    pub client_name: String,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// The mutable fields of a project. `None` fields are left untouched.
#[derive(Clone, Debug, Default, AsChangeset)]
#[diesel(table_name = projects)]
pub struct ProjectChanges {
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub deleted: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    StartDate,
}

impl SortField {
    /// Parse a `sortBy` parameter. Anything outside the sortable whitelist
    /// falls back to the default field instead of failing the request.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("startDate") => Self::StartDate,
            _ => Self::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// The filters and sort for a project listing, independent of any particular
/// store. Every query is implicitly scoped to non-deleted projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectListQuery {
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub start_from: Option<NaiveDate>,
    pub start_to: Option<NaiveDate>,
}

impl ProjectListQuery {
    /// Whether a project satisfies the filter portion of the query. This is
    /// the reference semantics; the diesel translation in
    /// [`build_list_query`] must stay in sync with it.
    pub fn matches(&self, project: &Project) -> bool {
        if project.deleted {
            return false;
        }

        if let Some(status) = self.status {
            if project.status != status {
                return false;
            }
        }

        if let Some(priority) = self.priority {
            if project.priority != priority {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let name_hit = project.name.to_lowercase().contains(&needle);
            let client_hit = project.client_name.to_lowercase().contains(&needle);
            if !name_hit && !client_hit {
                return false;
            }
        }

        if let Some(from) = self.created_from {
            if project.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.created_to {
            if project.created_at > to {
                return false;
            }
        }

        if let Some(from) = self.start_from {
            if project.start_date < from {
                return false;
            }
        }
        if let Some(to) = self.start_to {
            if project.start_date > to {
                return false;
            }
        }

        true
    }

    pub fn sort(&self, projects: &mut [Project]) {
        projects.sort_by(|a, b| {
            let ordering = match self.sort_by {
                SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                SortField::StartDate => a.start_date.cmp(&b.start_date),
            };

            match self.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

/// Translate a [`ProjectListQuery`] into a diesel query against the
/// `projects` table, always scoped to non-deleted rows.
pub fn build_list_query(
    query: &ProjectListQuery,
) -> projects::BoxedQuery<'static, Pg, diesel::dsl::AsSelect<Project, Pg>> {
    let mut q = projects::table
        .select(Project::as_select())
        .filter(dsl::deleted.eq(false))
        .into_boxed();

    if let Some(status) = query.status {
        q = q.filter(dsl::status.eq(status));
    }

    if let Some(priority) = query.priority {
        q = q.filter(dsl::priority.eq(priority));
    }

    if let Some(search) = query.search.as_deref() {
        let pattern = format!("%{}%", escape_like(search));
        q = q.filter(
            dsl::name
                .ilike(pattern.clone())
                .or(dsl::client_name.ilike(pattern)),
        );
    }

    if let Some(from) = query.created_from {
        q = q.filter(dsl::created_at.ge(from));
    }
    if let Some(to) = query.created_to {
        q = q.filter(dsl::created_at.le(to));
    }

    if let Some(from) = query.start_from {
        q = q.filter(dsl::start_date.ge(from));
    }
    if let Some(to) = query.start_to {
        q = q.filter(dsl::start_date.le(to));
    }

    match (query.sort_by, query.sort_order) {
        (SortField::CreatedAt, SortOrder::Asc) => q.order(dsl::created_at.asc()),
        (SortField::CreatedAt, SortOrder::Desc) => q.order(dsl::created_at.desc()),
        (SortField::StartDate, SortOrder::Asc) => q.order(dsl::start_date.asc()),
        (SortField::StartDate, SortOrder::Desc) => q.order(dsl::start_date.desc()),
    }
}
