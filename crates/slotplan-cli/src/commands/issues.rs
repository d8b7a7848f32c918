use clap::Subcommand;

use slotplan_core::integrations::github::GitHubClient;
use slotplan_core::integrations::notes::NotesClient;
use slotplan_core::{parse_contract, Config, NoteStore};

#[derive(Subcommand)]
pub enum IssuesAction {
    /// Create tracker issues for contract tickets that have none yet
    Sync {
        /// Project directory name under the configured projects root
        project: String,
    },
}

pub fn run(action: IssuesAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        IssuesAction::Sync { project } => {
            let config = Config::load()?;
            let notes = NotesClient::new(&config.notes.api_base, &config.notes.vault);

            let contract_path = format!(
                "{}/{}/01_project_contract.md",
                config.notes.projects_root, project
            );
            let contract = parse_contract(&notes.read_note(&contract_path)?)?;

            let github = GitHubClient::new(&config.github.owner, &config.github.repo);
            let created = github.sync_tickets(&contract.tickets)?;
            println!("{created} issues created");
        }
    }
    Ok(())
}
