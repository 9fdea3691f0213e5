pub mod sql_types {
    #[derive(diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "project_status"))]
    pub struct ProjectStatus;

    #[derive(diesel::sql_types::SqlType)]
    #[diesel(postgres_type(name = "project_priority"))]
    pub struct ProjectPriority;
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::ProjectStatus;
    use super::sql_types::ProjectPriority;

    projects (id) {
        id -> Uuid,
        name -> Text,
        client_name -> Text,
        status -> ProjectStatus,
        priority -> ProjectPriority,
        start_date -> Date,
        end_date -> Nullable<Date>,
        deleted -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
