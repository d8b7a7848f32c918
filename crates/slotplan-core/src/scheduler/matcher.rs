//! Issue-to-ticket similarity matching.
//!
//! First-fit heuristic: scan tickets in input order and take the first one
//! that passes either check. Input order is the tie-break, which keeps the
//! pairing deterministic.

use std::collections::HashSet;

use crate::contract::Ticket;

/// Default size estimate for unmatched issues and unestimated tickets.
pub const DEFAULT_ESTIMATE: u32 = 3;

/// How many leading words of each title participate in the overlap check.
const OVERLAP_WINDOW: usize = 4;

/// Minimum common words for an overlap match.
const OVERLAP_THRESHOLD: usize = 2;

/// Match an issue title against the tickets, first hit wins.
///
/// Checks, per ticket: case-insensitive substring containment in either
/// direction, then ≥2 common words among the first four whitespace-separated
/// words of each title.
pub fn match_issue_to_ticket<'a>(issue_title: &str, tickets: &'a [Ticket]) -> Option<&'a Ticket> {
    let issue_lower = issue_title.to_lowercase();

    for ticket in tickets {
        let ticket_name = ticket.name.to_lowercase();

        if ticket_name.contains(&issue_lower) || issue_lower.contains(&ticket_name) {
            return Some(ticket);
        }

        let issue_words: HashSet<&str> = issue_lower.split_whitespace().take(OVERLAP_WINDOW).collect();
        let ticket_words: HashSet<&str> =
            ticket_name.split_whitespace().take(OVERLAP_WINDOW).collect();
        if issue_words.intersection(&ticket_words).count() >= OVERLAP_THRESHOLD {
            return Some(ticket);
        }
    }

    None
}

/// Resolve the effective estimate for a matched (or unmatched) ticket.
/// A missing or zero estimate falls back to [`DEFAULT_ESTIMATE`].
pub fn effective_estimate(ticket: Option<&Ticket>) -> u32 {
    ticket
        .and_then(|t| t.estimate_slots)
        .filter(|&slots| slots > 0)
        .unwrap_or(DEFAULT_ESTIMATE)
}
