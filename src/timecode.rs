use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimecodeError {
    #[error("invalid timecode '{timecode}': component '{component}' is not a non-negative integer")]
    InvalidComponent { timecode: String, component: String },
    #[error("timecode '{0}' is too large")]
    Overflow(String),
}

/// Convert a colon-separated base-60 timecode (`SS`, `MM:SS`, `HH:MM:SS`, ...)
/// into whole seconds. Components are not range checked, so `75:00` is 4500.
pub fn timecode_to_secs(timecode: &str) -> Result<u64, TimecodeError> {
    let mut total: u64 = 0;
    let mut scale: u64 = 1;

    for (i, component) in timecode.rsplit(':').enumerate() {
        let trimmed = component.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TimecodeError::InvalidComponent {
                timecode: timecode.to_string(),
                component: component.to_string(),
            });
        }

        let overflow = || TimecodeError::Overflow(timecode.to_string());
        let value: u64 = trimmed.parse().map_err(|_| overflow())?;

        if i > 0 {
            scale = scale.checked_mul(60).ok_or_else(overflow)?;
        }
        let part = value.checked_mul(scale).ok_or_else(overflow)?;
        total = total.checked_add(part).ok_or_else(overflow)?;
    }

    Ok(total)
}

/// Render whole seconds as `H:MM:SS`. Hours are not wrapped into days.
pub fn secs_to_timecode(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}
