use clap::Subcommand;

use slotplan_core::contract::render::build_contract_prompt;
use slotplan_core::integrations::llm::LlmClient;
use slotplan_core::integrations::notes::NotesClient;
use slotplan_core::{Config, NoteStore};

#[derive(Subcommand)]
pub enum ContractAction {
    /// Generate a project contract from the brainstorm note
    Generate {
        /// Project directory name under the configured projects root
        project: String,
    },
}

pub fn run(action: ContractAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ContractAction::Generate { project } => {
            let config = Config::load()?;
            let notes = NotesClient::new(&config.notes.api_base, &config.notes.vault);
            let llm = LlmClient::new(&config.llm.api_base, &config.llm.model);

            let brainstorm_path = format!(
                "{}/{}/00_brainstorm.md",
                config.notes.projects_root, project
            );
            let output_path = format!(
                "{}/{}/01_project_contract.md",
                config.notes.projects_root, project
            );

            let brainstorm = notes.read_note(&brainstorm_path)?;
            let result = llm.generate(&build_contract_prompt(&brainstorm))?;

            if !result.trim_start().starts_with("---") {
                return Err("LLM output is not a valid contract (no frontmatter)".into());
            }

            notes.write_note(&output_path, &result)?;
            println!("contract written to {output_path}");
        }
    }
    Ok(())
}
