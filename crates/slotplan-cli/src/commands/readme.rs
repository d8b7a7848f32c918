use clap::Subcommand;

use slotplan_core::contract::render::render_readme;
use slotplan_core::integrations::github::GitHubClient;
use slotplan_core::integrations::notes::NotesClient;
use slotplan_core::{parse_contract, Config, NoteStore};

#[derive(Subcommand)]
pub enum ReadmeAction {
    /// Render the contract README and push it to the repository
    Sync {
        /// Project directory name under the configured projects root
        project: String,
    },
}

pub fn run(action: ReadmeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ReadmeAction::Sync { project } => {
            let config = Config::load()?;
            let notes = NotesClient::new(&config.notes.api_base, &config.notes.vault);

            let contract_path = format!(
                "{}/{}/01_project_contract.md",
                config.notes.projects_root, project
            );
            let contract = parse_contract(&notes.read_note(&contract_path)?)?;

            let github = GitHubClient::new(&config.github.owner, &config.github.repo);
            github.upsert_readme(&render_readme(&contract))?;
            println!("README synced");
        }
    }
    Ok(())
}
