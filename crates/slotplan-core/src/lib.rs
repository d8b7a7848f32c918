//! # Slotplan Core Library
//!
//! This library provides the core business logic for slotplan, which turns
//! a brainstorm note into scheduled work: a project contract is parsed from
//! a vault note, its tickets become tracker issues, and open issues are
//! matched, ordered, and placed into calendar slots.
//!
//! ## Architecture
//!
//! - **Scheduler**: a deterministic slot-scheduling engine that matches
//!   issues to tickets, orders them by estimate, and walks the calendar
//!   under work-day, work-hour, spacing, and rest constraints
//! - **Contract**: YAML-frontmatter contract parsing, validation, and
//!   README rendering
//! - **Integrations**: narrow clients for the issue tracker, notes vault,
//!   calendar, and LLM endpoint
//! - **Config**: TOML-based application configuration
//!
//! ## Key Components
//!
//! - [`SlotPlanner`]: the scheduling engine
//! - [`Contract`]: parsed project contract
//! - [`Config`]: application configuration management
//! - [`Integration`]: trait for external service clients

pub mod config;
pub mod contract;
pub mod error;
pub mod integrations;
pub mod scheduler;

pub use config::Config;
pub use contract::{parse_contract, Contract, Ticket};
pub use error::{ConfigError, ContractError, CoreError, ScheduleError};
pub use integrations::{CalendarSink, Integration, IssueSource, NoteStore};
pub use scheduler::{Issue, ScheduleEntry, SlotPlanner, SlotPlannerConfig};
