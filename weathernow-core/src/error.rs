use thiserror::Error;

/// Failures surfaced by the weather provider boundary.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The provider reported that the queried place does not exist.
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    /// Any other non-success response, including network failures.
    #[error("Weather service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The provider answered with a body we could not decode.
    #[error("Malformed response from weather service: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::LocationNotFound(_))
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        WeatherError::UpstreamUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_distinguishable() {
        let err = WeatherError::LocationNotFound("Nonexistentville".into());
        assert!(err.is_not_found());
        assert!(err.to_string().contains("Nonexistentville"));

        let err = WeatherError::UpstreamUnavailable("status 500".into());
        assert!(!err.is_not_found());
    }
}
