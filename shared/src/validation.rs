//! Input validation functions
//!
//! Request DTOs also carry `validator` derives; these helpers cover the
//! checks services run on values that arrive outside a DTO.

/// Longest feedback text accepted with a plan adjustment
pub const MAX_FEEDBACK_CHARS: usize = 500;

/// Bounds for the `days` window of the heatmap and weight-history views
pub const MIN_WINDOW_DAYS: i64 = 1;
pub const MAX_WINDOW_DAYS: i64 = 365;

/// Validate plan adjustment feedback
pub fn validate_feedback(feedback: &str) -> Result<(), String> {
    if feedback.chars().count() > MAX_FEEDBACK_CHARS {
        return Err(format!(
            "Feedback must be at most {} characters",
            MAX_FEEDBACK_CHARS
        ));
    }
    Ok(())
}

/// Validate a requested window length in days
pub fn validate_window_days(days: i64) -> Result<(), String> {
    if days < MIN_WINDOW_DAYS {
        return Err("Window must cover at least 1 day".to_string());
    }
    if days > MAX_WINDOW_DAYS {
        return Err(format!("Window cannot exceed {} days", MAX_WINDOW_DAYS));
    }
    Ok(())
}

/// Validate a configured analysis window (zero is never meaningful)
pub fn validate_configured_window(name: &str, days: i64) -> Result<(), String> {
    validate_window_days(days).map_err(|e| format!("{}: {}", name, e))
}
