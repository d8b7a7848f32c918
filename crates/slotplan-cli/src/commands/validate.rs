use std::path::Path;

use slotplan_core::{parse_contract, Config, ContractError};

pub fn run(contract_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let _config = Config::load().map_err(|e| format!("Config error: {e}"))?;
    println!("✓ Config loaded");

    let text = std::fs::read_to_string(contract_path)
        .map_err(|_| ContractError::NotFound(contract_path.to_path_buf()))?;
    let contract = parse_contract(&text).map_err(|e| format!("Contract error: {e}"))?;
    println!("✓ Contract loaded");

    println!();
    println!("Contract summary");
    println!("Project: {}", contract.project);
    println!(
        "Deadline: {}",
        contract.deadline.as_deref().unwrap_or("N/A")
    );
    println!("Tickets: {}", contract.tickets.len());
    Ok(())
}
