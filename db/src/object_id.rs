use std::{ops::Deref, str::FromStr};

use base64::{display::Base64Display, Engine};
use diesel::{deserialize::FromSql, serialize::ToSql};
use thiserror::Error;
use uuid::Uuid;

use crate::new_uuid;

#[derive(Debug, Error)]
pub enum ObjectIdError {
    #[error("Invalid ID prefix, expected {0}")]
    InvalidPrefix(&'static str),

    #[error("Failed to decode object ID")]
    DecodeFailure,
}

const PROJECT_PREFIX: &str = "prj";

/// A project ID, stored as a UUID but exposed externally as a more
/// accessible prefixed string such as `prjAYTVCGCLPGQD3XYRHYY3JFVBDE`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, AsExpression, FromSqlRow)]
#[diesel(sql_type = diesel::sql_types::Uuid)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(new_uuid())
    }

    pub fn from_uuid(u: Uuid) -> Self {
        Self(u)
    }

    pub fn into_inner(self) -> Uuid {
        self.0
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    fn display_without_prefix(&self) -> Base64Display<base64::engine::GeneralPurpose> {
        Base64Display::new(
            self.0.as_bytes(),
            &base64::engine::general_purpose::URL_SAFE_NO_PAD,
        )
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq<Uuid> for ProjectId {
    fn eq(&self, other: &Uuid) -> bool {
        &self.0 == other
    }
}

impl Deref for ProjectId {
    type Target = Uuid;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Uuid> for ProjectId {
    fn from(u: Uuid) -> Self {
        Self(u)
    }
}

impl From<ProjectId> for Uuid {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

impl std::fmt::Debug for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ProjectId")
            .field(&self.to_string())
            .field(&self.0)
            .finish()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(PROJECT_PREFIX)?;
        self.display_without_prefix().fmt(f)
    }
}

fn decode_suffix(s: &str) -> Result<Uuid, ObjectIdError> {
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|_| ObjectIdError::DecodeFailure)?;
    Uuid::from_slice(&bytes).map_err(|_| ObjectIdError::DecodeFailure)
}

impl FromStr for ProjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s
            .strip_prefix(PROJECT_PREFIX)
            .ok_or(ObjectIdError::InvalidPrefix(PROJECT_PREFIX))?;

        decode_suffix(suffix).map(Self)
    }
}

/// Serialize into string form with the prefix
impl serde::Serialize for ProjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = self.to_string();
        serializer.serialize_str(&s)
    }
}

struct ProjectIdVisitor;

impl<'de> serde::de::Visitor<'de> for ProjectIdVisitor {
    type Value = ProjectId;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an object ID starting with ")?;
        formatter.write_str(PROJECT_PREFIX)
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        match ProjectId::from_str(v) {
            Ok(id) => Ok(id),
            Err(e) => {
                // See if it's in plain UUID format instead of the encoded format,
                // which mostly happens for values generated inside Postgres.
                Uuid::from_str(v)
                    .map(ProjectId::from_uuid)
                    // Return the more descriptive original error instead of the UUID parsing error
                    .map_err(|_| e)
            }
        }
        .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(v), &self))
    }
}

/// Deserialize from string form with the prefix.
impl<'de> serde::Deserialize<'de> for ProjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(ProjectIdVisitor)
    }
}

impl FromSql<diesel::sql_types::Uuid, diesel::pg::Pg> for ProjectId {
    fn from_sql(
        bytes: <diesel::pg::Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> diesel::deserialize::Result<Self> {
        <Uuid as FromSql<diesel::sql_types::Uuid, diesel::pg::Pg>>::from_sql(bytes).map(Self)
    }
}

impl ToSql<diesel::sql_types::Uuid, diesel::pg::Pg> for ProjectId {
    fn to_sql(
        &self,
        out: &mut diesel::serialize::Output<diesel::pg::Pg>,
    ) -> diesel::serialize::Result {
        <Uuid as ToSql<diesel::sql_types::Uuid, diesel::pg::Pg>>::to_sql(
            &self.0,
            &mut out.reborrow(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_from_str() {
        let id = ProjectId::new();

        let s = id.to_string();
        let id2 = ProjectId::from_str(&s).unwrap();
        assert_eq!(id, id2, "ID converts to string and back");
    }

    #[test]
    fn rejects_wrong_prefix() {
        let s = format!("usr{}", ProjectId::new().display_without_prefix());
        assert!(ProjectId::from_str(&s).is_err());
    }

    #[test]
    fn serde() {
        let id = ProjectId::new();
        let json_str = serde_json::to_string(&id).unwrap();
        let id2: ProjectId = serde_json::from_str(&json_str).unwrap();
        assert_eq!(id, id2, "Value serializes and deserializes to itself");
    }

    #[test]
    fn deserializes_plain_uuid() {
        let id = ProjectId::new();
        let json_str = format!("\"{}\"", id.as_uuid());
        let id2: ProjectId = serde_json::from_str(&json_str).unwrap();
        assert_eq!(id, id2);
    }
}
