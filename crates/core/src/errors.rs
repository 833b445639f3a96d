use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed time range '{raw}': {reason}")]
    MalformedTimeRange { raw: String, reason: String },

    #[error("Invalid schedule entry {context}: {reason}")]
    InvalidScheduleEntry { context: String, reason: String },

    #[error("Malformed booking time '{raw}': {reason}")]
    MalformedBookingTime { raw: String, reason: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),
}

impl BookingError {
    pub(crate) fn malformed_range(raw: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTimeRange {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_entry(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidScheduleEntry {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_booking(raw: &str, reason: impl Into<String>) -> Self {
        Self::MalformedBookingTime {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by corrupt stored data rather than the request.
    pub fn is_data_integrity(&self) -> bool {
        matches!(
            self,
            Self::MalformedTimeRange { .. }
                | Self::InvalidScheduleEntry { .. }
                | Self::MalformedBookingTime { .. }
        )
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
