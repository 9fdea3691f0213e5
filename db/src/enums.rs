use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::ProjectStatus"]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    OnHold,
    Completed,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        Self::Active
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let desc = match self {
            Self::Active => "active",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
        };

        f.write_str(desc)
    }
}

impl ProjectStatus {
    /// The statuses a project in this status may move to. A status never
    /// appears in its own list, so a same-status "transition" is rejected
    /// rather than treated as a no-op.
    pub fn allowed_transitions(self) -> &'static [ProjectStatus] {
        match self {
            Self::Active => &[Self::OnHold, Self::Completed],
            Self::OnHold => &[Self::Active, Self::Completed],
            Self::Completed => &[Self::Active, Self::OnHold],
        }
    }

    pub fn can_transition_to(self, requested: ProjectStatus) -> bool {
        self.allowed_transitions().contains(&requested)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum)]
#[ExistingTypePath = "crate::schema::sql_types::ProjectPriority"]
#[serde(rename_all = "snake_case")]
pub enum ProjectPriority {
    High,
    Medium,
    Low,
}

impl Default for ProjectPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl std::fmt::Display for ProjectPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let desc = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };

        f.write_str(desc)
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectStatus::{self, *};

    const ALL: [ProjectStatus; 3] = [Active, OnHold, Completed];

    #[test]
    fn transitions_between_distinct_statuses() {
        for from in ALL {
            for to in ALL {
                if from == to {
                    continue;
                }
                assert!(
                    from.can_transition_to(to),
                    "{from} -> {to} should be allowed"
                );
            }
        }
    }

    #[test]
    fn same_status_transition_is_rejected() {
        for status in ALL {
            assert!(
                !status.can_transition_to(status),
                "{status} -> {status} should be rejected"
            );
        }
    }

    #[test]
    fn allowed_list_covers_the_other_two_statuses() {
        for status in ALL {
            let allowed = status.allowed_transitions();
            assert_eq!(allowed.len(), 2);
            assert!(!allowed.contains(&status));
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let s: ProjectStatus = serde_json::from_str(r#""on_hold""#).unwrap();
        assert_eq!(s, OnHold);
        assert_eq!(serde_json::to_string(&Completed).unwrap(), r#""completed""#);
    }
}
