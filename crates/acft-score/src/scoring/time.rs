use super::error::ScoringError;

/// Parses a `M:SS` or `MM:SS` duration into whole seconds.
pub fn parse_seconds(text: &str) -> Result<u32, ScoringError> {
    let malformed = || ScoringError::MalformedTime(text.to_string());
    let trimmed = text.trim();

    let (minutes, seconds) = trimmed.split_once(':').ok_or_else(malformed)?;
    if !(1..=2).contains(&minutes.len()) || seconds.len() != 2 {
        return Err(malformed());
    }
    if !minutes.bytes().chain(seconds.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let minutes: u32 = minutes.parse().map_err(|_| malformed())?;
    let seconds: u32 = seconds.parse().map_err(|_| malformed())?;
    if seconds >= 60 {
        return Err(malformed());
    }

    Ok(minutes * 60 + seconds)
}

/// Renders whole seconds as `M:SS`.
pub fn format_seconds(total: u32) -> String {
    format!("{}:{:02}", total / 60, total % 60)
}
