//! Persona loading from the workspace.

use crate::types::Persona;
use faqdesk_core::{AppError, AppResult};
use std::path::Path;

const PERSONA_FILE: &str = "persona.yaml";

/// Load the persona from `.faqdesk/persona.yaml` under the workspace root.
///
/// A missing file yields the built-in default persona; a present but
/// malformed file is an error, so a typo never silently falls back.
pub fn load_persona(workspace_path: &Path) -> AppResult<Persona> {
    let persona_file = workspace_path.join(".faqdesk").join(PERSONA_FILE);

    if !persona_file.exists() {
        tracing::debug!("No persona file at {:?}, using defaults", persona_file);
        return Ok(Persona::default());
    }

    let contents = std::fs::read_to_string(&persona_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read persona file {:?}: {}",
            persona_file, e
        ))
    })?;

    let persona: Persona = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse persona file {:?}: {}",
            persona_file, e
        ))
    })?;

    tracing::info!("Loaded persona {:?} from {:?}", persona.name, persona_file);
    Ok(persona)
}
