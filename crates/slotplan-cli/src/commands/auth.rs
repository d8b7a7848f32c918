use clap::Subcommand;

use slotplan_core::Config;

#[derive(Subcommand)]
pub enum AuthAction {
    /// GitHub: login / logout / status
    Github {
        #[command(subcommand)]
        action: AuthOp,
    },
    /// Notes vault: login / logout / status
    Notes {
        #[command(subcommand)]
        action: AuthOp,
    },
    /// Calendar: login / logout / status
    Calendar {
        #[command(subcommand)]
        action: AuthOp,
    },
    /// LLM endpoint: login / logout / status
    Llm {
        #[command(subcommand)]
        action: AuthOp,
    },
}

#[derive(Subcommand)]
pub enum AuthOp {
    /// Store a credential and verify it against the service
    Login {
        /// API token or key
        #[arg(long)]
        token: Option<String>,
    },
    /// Remove credentials
    Logout,
    /// Check authentication status
    Status,
}

pub fn run(action: AuthAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AuthAction::Github { action: op } => handle_github(op),
        AuthAction::Notes { action: op } => handle_notes(op),
        AuthAction::Calendar { action: op } => handle_calendar(op),
        AuthAction::Llm { action: op } => handle_llm(op),
    }
}

fn handle_github(op: AuthOp) -> Result<(), Box<dyn std::error::Error>> {
    use slotplan_core::integrations::{github::GitHubClient, Integration};
    let config = Config::load_or_default();
    let mut client = GitHubClient::new(&config.github.owner, &config.github.repo);
    match op {
        AuthOp::Login { token } => {
            let tok = token.ok_or("--token required for GitHub")?;
            client.set_credentials(&tok)?;
            client.authenticate()?;
            println!("GitHub authenticated");
        }
        AuthOp::Logout => {
            client.disconnect()?;
            println!("GitHub disconnected");
        }
        AuthOp::Status => print_status(client.is_authenticated()),
    }
    Ok(())
}

fn handle_notes(op: AuthOp) -> Result<(), Box<dyn std::error::Error>> {
    use slotplan_core::integrations::{notes::NotesClient, Integration};
    let config = Config::load_or_default();
    let mut client = NotesClient::new(&config.notes.api_base, &config.notes.vault);
    match op {
        AuthOp::Login { token } => {
            let tok = token.ok_or("--token required for the notes vault")?;
            client.set_credentials(&tok)?;
            client.authenticate()?;
            println!("Notes vault authenticated");
        }
        AuthOp::Logout => {
            client.disconnect()?;
            println!("Notes vault disconnected");
        }
        AuthOp::Status => print_status(client.is_authenticated()),
    }
    Ok(())
}

fn handle_calendar(op: AuthOp) -> Result<(), Box<dyn std::error::Error>> {
    use slotplan_core::integrations::{calendar::CalendarClient, Integration};
    let config = Config::load_or_default();
    let mut client = CalendarClient::new(&config.calendar.api_base, &config.calendar.calendar_id);
    match op {
        AuthOp::Login { token } => {
            let tok = token.ok_or("--token required for the calendar")?;
            client.set_credentials(&tok)?;
            client.authenticate()?;
            println!("Calendar authenticated");
        }
        AuthOp::Logout => {
            client.disconnect()?;
            println!("Calendar disconnected");
        }
        AuthOp::Status => print_status(client.is_authenticated()),
    }
    Ok(())
}

fn handle_llm(op: AuthOp) -> Result<(), Box<dyn std::error::Error>> {
    use slotplan_core::integrations::{llm::LlmClient, Integration};
    let config = Config::load_or_default();
    let mut client = LlmClient::new(&config.llm.api_base, &config.llm.model);
    match op {
        AuthOp::Login { token } => {
            let tok = token.ok_or("--token required for the LLM endpoint")?;
            client.set_credentials(&tok)?;
            client.authenticate()?;
            println!("LLM endpoint authenticated");
        }
        AuthOp::Logout => {
            client.disconnect()?;
            println!("LLM endpoint disconnected");
        }
        AuthOp::Status => print_status(client.is_authenticated()),
    }
    Ok(())
}

fn print_status(authenticated: bool) {
    println!(
        "{}",
        if authenticated {
            "authenticated"
        } else {
            "not authenticated"
        }
    );
}
