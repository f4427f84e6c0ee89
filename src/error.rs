// 0.0: error taxonomy. every fallible operation in the crate returns InstrumentError.
// construction is atomic: either a fully valid value comes back or one of these.

/// Failure raised while building or converting an instrument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstrumentError {
    /// A field violates a documented invariant.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A string-encoded field could not be decoded.
    #[error("Failed to parse {field} from '{value}': {reason}")]
    Parse {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A required mapping key is absent.
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
}

impl InstrumentError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn parse(field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Re-labels the field, so a generic value error reports the mapping key it came from.
    pub fn with_field(self, field: &'static str) -> Self {
        match self {
            Self::Validation { reason, .. } => Self::Validation { field, reason },
            Self::Parse { value, reason, .. } => Self::Parse {
                field,
                value,
                reason,
            },
            Self::MissingField(_) => Self::MissingField(field),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub fn is_missing_field(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }

    /// Name of the field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Validation { field, .. } | Self::Parse { field, .. } => field,
            Self::MissingField(field) => field,
        }
    }
}

pub type InstrumentResult<T> = Result<T, InstrumentError>;
