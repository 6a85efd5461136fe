use super::event::Event;

/// Failures raised while turning a raw result into points.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("age {0} is outside the scored range 17-75")]
    InvalidAge(u32),
    #[error("'{0}' is not a recognized event or sex code")]
    UnknownEventOrSex(String),
    #[error("standards table '{0}' not found")]
    ResourceNotFound(String),
    #[error("'{0}' is not a M:SS or MM:SS time")]
    MalformedTime(String),
    #[error("'{0}' is not a number")]
    MalformedNumber(String),
    #[error("standards table '{resource}' is malformed: {detail}")]
    MalformedTable { resource: String, detail: String },
    #[error("raw score {raw} could not be placed in the {event} standards")]
    RawScoreOutOfDomain { event: Event, raw: f64 },
    #[error("failed to read standards table '{resource}': {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV in standards table '{resource}': {source}")]
    Csv {
        resource: String,
        #[source]
        source: csv::Error,
    },
}

impl ScoringError {
    /// True when the caller supplied bad input, as opposed to a broken table resource.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ScoringError::InvalidAge(_)
                | ScoringError::UnknownEventOrSex(_)
                | ScoringError::MalformedTime(_)
                | ScoringError::MalformedNumber(_)
        )
    }
}
