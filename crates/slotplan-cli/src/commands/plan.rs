use chrono::{NaiveDate, Utc};

use slotplan_core::integrations::calendar::CalendarClient;
use slotplan_core::integrations::github::{GitHubClient, SCHEDULED_LABEL};
use slotplan_core::integrations::notes::NotesClient;
use slotplan_core::{parse_contract, CalendarSink, Config, IssueSource, NoteStore, SlotPlanner};

pub fn run(
    project: &str,
    start: Option<&str>,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let now = Utc::now();

    let start_date = match start {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")?
            .and_hms_opt(0, 0, 0)
            .ok_or("invalid start date")?
            .and_utc(),
        None => now,
    };

    let notes = NotesClient::new(&config.notes.api_base, &config.notes.vault);
    let contract_path = format!(
        "{}/{}/01_project_contract.md",
        config.notes.projects_root, project
    );
    let contract = parse_contract(&notes.read_note(&contract_path)?)?;

    let github = GitHubClient::new(&config.github.owner, &config.github.repo);
    let issues = github.open_unscheduled_issues()?;

    if issues.is_empty() {
        println!("no open unscheduled issues");
        return Ok(());
    }

    let planner = SlotPlanner::new(config.planner_config(start_date)?)?;
    let schedule = planner.plan(&issues, &contract.tickets, now);

    let calendar = CalendarClient::new(&config.calendar.api_base, &config.calendar.calendar_id);
    for entry in &schedule {
        println!(
            "#{} {} -> {} ({} slots)",
            entry.issue_number,
            entry.issue_title,
            entry.slot_time.format("%Y-%m-%d %H:%M"),
            entry.estimate_slots
        );

        if dry_run {
            continue;
        }

        let title = format!("#{} {}", entry.issue_number, entry.issue_title);
        let event_id = calendar.create_event(
            &title,
            &contract.project,
            entry.slot_time,
            planner.slot_minutes(),
        )?;
        github.add_label(entry.issue_number, SCHEDULED_LABEL)?;
        println!("  event {event_id}");
    }

    println!("{} of {} issues scheduled", schedule.len(), issues.len());
    Ok(())
}
