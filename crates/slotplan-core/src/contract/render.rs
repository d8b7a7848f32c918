//! Rendering and prompting around contracts.
//!
//! `render_readme` turns a parsed contract into the repository README;
//! `build_contract_prompt` produces the LLM prompt that converts a
//! brainstorm note into a strict contract.

use super::Contract;

/// Prompt template for converting a brainstorm note into a contract.
/// `{brainstorm}` is substituted by [`build_contract_prompt`].
pub const PROJECT_CONTRACT_PROMPT: &str = r#"
You are a systems analyst.

Your task is to convert the following brainstorm into a STRICT project contract.

Rules:
- Output ONLY valid Markdown.
- Must start with YAML frontmatter.
- No explanations, no commentary.
- Be concise, deterministic, explicit.
- Avoid vague goals, each ticket should produce a binary outcome.
- Maximum 9 tickets.
- Each ticket must be independently shippable.
- Excluded scope must be a list of strings.

Frontmatter schema:

---
project: <string>
title: <string>
objective: <string>
definition_of_done: <string>
deadline: <string or null>
excluded_scope:
  - <string>
tickets:
  - name: <string>
    estimate_slots: <integer or null> (fibonacci sequence: 1, 2, 3, 5, 8, 13, 21, 34, 55, 89)
    description: <string>
    scope_excluded:
      - <string>
---

Brainstorm input:
==================
{brainstorm}
"#;

/// Substitute the brainstorm text into the contract prompt.
pub fn build_contract_prompt(brainstorm: &str) -> String {
    PROJECT_CONTRACT_PROMPT.replace("{brainstorm}", brainstorm)
}

/// Render the repository README from a contract.
pub fn render_readme(contract: &Contract) -> String {
    let excluded = contract
        .excluded_scope
        .iter()
        .map(|x| format!("- {x}"))
        .collect::<Vec<_>>()
        .join("\n");

    let title = contract.title.as_deref().unwrap_or(&contract.project);
    let objective = contract.objective.as_deref().unwrap_or("");
    let deadline = contract.deadline.as_deref().unwrap_or("N/A");

    format!(
        "# {title}\n\n\
         ## 🎯 Objective\n{objective}\n\n\
         ## ✅ Definition of Done\n{definition}\n\n\
         ## 🚫 Excluded Scope\n{excluded}\n\n\
         ## ⏳ Deadline\n{deadline}\n",
        definition = contract.definition_of_done,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::Ticket;

    fn make_contract() -> Contract {
        Contract {
            project: "demo".to_string(),
            title: Some("Demo Project".to_string()),
            objective: Some("Ship it".to_string()),
            definition_of_done: "All tickets closed".to_string(),
            deadline: Some("2026-09-01".to_string()),
            excluded_scope: vec!["mobile app".to_string(), "i18n".to_string()],
            tickets: vec![Ticket {
                name: "Set up repo".to_string(),
                estimate_slots: Some(1),
                description: String::new(),
                scope_excluded: Vec::new(),
            }],
        }
    }

    #[test]
    fn readme_has_all_sections() {
        let readme = render_readme(&make_contract());
        assert!(readme.starts_with("# Demo Project"));
        assert!(readme.contains("## 🎯 Objective\nShip it"));
        assert!(readme.contains("## ✅ Definition of Done\nAll tickets closed"));
        assert!(readme.contains("- mobile app\n- i18n"));
        assert!(readme.contains("## ⏳ Deadline\n2026-09-01"));
    }

    #[test]
    fn readme_falls_back_to_project_name_and_na_deadline() {
        let mut contract = make_contract();
        contract.title = None;
        contract.deadline = None;
        let readme = render_readme(&contract);
        assert!(readme.starts_with("# demo"));
        assert!(readme.contains("## ⏳ Deadline\nN/A"));
    }

    #[test]
    fn prompt_substitutes_brainstorm() {
        let prompt = build_contract_prompt("build a birdhouse");
        assert!(prompt.contains("build a birdhouse"));
        assert!(!prompt.contains("{brainstorm}"));
        assert!(prompt.contains("Maximum 9 tickets."));
    }
}
