use crate::model::validation::ValidationError;
use crate::repo::{EntityKind, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error shared by kitchen use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// No current cook, or the cook no longer exists.
    Unauthenticated,
    /// Target record does not exist.
    NotFound { entity: EntityKind, id: Uuid },
    /// Input rejected; carries the offending field.
    Validation(ValidationError),
    /// Unique value already taken; nothing was written.
    Conflict { field: &'static str, value: String },
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Write succeeded but the read-back did not find the record.
    InconsistentState(&'static str),
}

impl ServiceError {
    /// Stable machine-readable kind, used in logs and API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation",
            Self::Conflict { .. } => "conflict",
            Self::Repo(_) | Self::InconsistentState(_) => "internal",
        }
    }

    /// Field name for validation and conflict errors.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation(err) => Some(err.field()),
            Self::Conflict { field, .. } => Some(field),
            Self::Unauthenticated
            | Self::NotFound { .. }
            | Self::Repo(_)
            | Self::InconsistentState(_) => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "authentication required"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict { field, value } => write!(f, "{field} `{value}` is already taken"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent kitchen state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::Conflict { field, value } => Self::Conflict { field, value },
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;
    use crate::model::validation::ValidationError;
    use crate::repo::{EntityKind, RepoError};
    use uuid::Uuid;

    #[test]
    fn semantic_repo_errors_are_lifted() {
        let id = Uuid::new_v4();
        let err = ServiceError::from(RepoError::NotFound {
            entity: EntityKind::Dish,
            id,
        });
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: EntityKind::Dish,
                ..
            }
        ));

        let err = ServiceError::from(RepoError::Validation(ValidationError::InvalidPage));
        assert_eq!(err.field(), Some("page"));

        let err = ServiceError::from(RepoError::Conflict {
            field: "username",
            value: "chef".to_string(),
        });
        assert_eq!(err.field(), Some("username"));
        assert_eq!(err.to_string(), "username `chef` is already taken");
    }

    #[test]
    fn storage_errors_stay_wrapped() {
        let err = ServiceError::from(RepoError::InvalidData("bad row".to_string()));
        assert!(matches!(err, ServiceError::Repo(_)));
        assert_eq!(err.field(), None);
    }
}
