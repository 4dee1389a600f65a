use super::GenerationError;

/// Models tried in order before falling back to the first available one.
pub const DEFAULT_MODEL_PREFERENCES: [&str; 3] = [
    "models/gemini-2.5-flash",
    "models/gemini-1.0-pro",
    "models/gemini-pro",
];

/// Pick the first preferred model that is available, else the first available model.
pub fn select_model<S: AsRef<str>>(
    available: &[String],
    preferences: &[S],
) -> Result<String, GenerationError> {
    if let Some(preferred) = preferences
        .iter()
        .map(AsRef::as_ref)
        .find(|preferred| available.iter().any(|name| name == preferred))
    {
        return Ok(preferred.to_string());
    }

    match available.first() {
        Some(first) => {
            log::warn!("No preferred model available, using available model: {}", first);
            Ok(first.clone())
        }
        None => Err(GenerationError::NoModelAvailable),
    }
}
