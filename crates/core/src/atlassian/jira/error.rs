//! Errors raised while turning raw Jira records into domain values

/// Kind of record being mapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Board,
    Sprint,
    Person,
    Status,
    Issue,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Entity::Board => "board",
            Entity::Sprint => "sprint",
            Entity::Person => "person",
            Entity::Status => "status",
            Entity::Issue => "issue",
        };
        f.write_str(name)
    }
}

/// A raw record did not fit the domain model
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    #[error("{entity} record is missing required field `{field}`")]
    MissingField { entity: Entity, field: &'static str },

    #[error("{entity} record has an invalid `{field}`: {reason}")]
    InvalidField {
        entity: Entity,
        field: &'static str,
        reason: String,
    },
}

/// Failure of a tracker query.
///
/// Transport errors come from the [`super::AgileApi`] implementation and are
/// passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError<E> {
    #[error(transparent)]
    Transport(E),

    #[error(transparent)]
    Mapping(#[from] MappingError),
}
