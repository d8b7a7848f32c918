//! Project contract model and frontmatter parsing.
//!
//! A contract is a markdown note whose YAML frontmatter carries the project
//! metadata and the planned tickets. Only the frontmatter is meaningful
//! here; the markdown body is free-form notes.

pub mod render;

use serde::{Deserialize, Serialize};

use crate::error::ContractError;

/// A planned unit of work from a project contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub name: String,
    /// Size estimate in abstract slots (fibonacci by convention).
    /// Absent or zero means unestimated.
    #[serde(default)]
    pub estimate_slots: Option<u32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub scope_excluded: Vec<String>,
}

/// A project contract parsed from a note's YAML frontmatter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub project: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
    pub definition_of_done: String,
    /// Free-form deadline string; null is allowed but the key must exist.
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub excluded_scope: Vec<String>,
    pub tickets: Vec<Ticket>,
}

const REQUIRED_FIELDS: [&str; 4] = ["project", "deadline", "tickets", "definition_of_done"];

/// Parse a contract note: split the frontmatter fences, check required
/// fields, then deserialize.
///
/// # Errors
///
/// Returns a [`ContractError`] if the note has no frontmatter, the YAML is
/// invalid, a required field is missing, or the tickets are malformed.
pub fn parse_contract(text: &str) -> Result<Contract, ContractError> {
    let yaml_block = split_frontmatter(text)?;

    let value: serde_yaml::Value = serde_yaml::from_str(yaml_block)?;
    validate_contract(&value)?;

    let contract: Contract = serde_yaml::from_value(value)?;
    Ok(contract)
}

/// Extract the YAML block between the leading `---` fences.
fn split_frontmatter(text: &str) -> Result<&str, ContractError> {
    if !text.starts_with("---") {
        return Err(ContractError::MissingFrontmatter);
    }

    let mut parts = text.splitn(3, "---");
    let _leading = parts.next();
    let yaml_block = parts.next().ok_or(ContractError::MalformedFrontmatter)?;
    if parts.next().is_none() {
        return Err(ContractError::MalformedFrontmatter);
    }

    Ok(yaml_block)
}

/// Check required fields on the raw YAML before deserializing, so the
/// caller gets a field-level error rather than a serde type mismatch.
fn validate_contract(value: &serde_yaml::Value) -> Result<(), ContractError> {
    if !value.is_mapping() {
        return Err(ContractError::MalformedFrontmatter);
    }

    for field in REQUIRED_FIELDS {
        if value.get(field).is_none() {
            return Err(ContractError::MissingField(field));
        }
    }

    let tickets = match value.get("tickets") {
        Some(serde_yaml::Value::Sequence(seq)) if !seq.is_empty() => seq,
        _ => return Err(ContractError::NoTickets),
    };

    for ticket in tickets {
        let has_name = ticket
            .get("name")
            .and_then(serde_yaml::Value::as_str)
            .map(|name| !name.is_empty())
            .unwrap_or(false);
        if !has_name {
            return Err(ContractError::UnnamedTicket);
        }
    }

    Ok(())
}
