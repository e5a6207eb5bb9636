//! Closing-time estimation.
//!
//! A pure function of the ticket summary, the role embedded in the caller's
//! delegation token, and an injected randomness source representing workload
//! uncertainty. Estimates are display-only and never persisted as ground
//! truth. Admin-scoped tokens receive a finer time unit than normal-scoped
//! ones; the two renderings are not comparable.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::ticket::{Category, TicketTitle};
use crate::domain::user::Role;

/// Lower bound of the random workload term, in hours.
const RANDOM_HOURS_MIN: u64 = 1;
/// Upper bound of the random workload term, in hours (inclusive).
const RANDOM_HOURS_MAX: u64 = 240;
/// Hours charged per non-space character of title and category.
const HOURS_PER_CHAR: u64 = 10;

/// Ticket content fed to the estimator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketSummary {
    pub title: TicketTitle,
    pub category: Category,
}

/// Role-sensitive estimate rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    /// Human-readable closing-time estimate.
    pub estimation: String,
}

fn non_space_chars(text: &str) -> u64 {
    text.chars().filter(|c| !c.is_whitespace()).count() as u64
}

/// Total estimated hours: a deterministic term derived from the content plus
/// a bounded random term.
fn workload_hours(summary: &TicketSummary, rng: &mut impl Rng) -> u64 {
    let content_chars =
        non_space_chars(summary.title.as_ref()) + non_space_chars(summary.category.label());
    content_chars * HOURS_PER_CHAR + rng.gen_range(RANDOM_HOURS_MIN..=RANDOM_HOURS_MAX)
}

/// Estimate the closing time for a ticket.
///
/// Normal callers see whole days; admin callers additionally see the residual
/// hours.
pub fn estimate(summary: &TicketSummary, role: Role, rng: &mut impl Rng) -> Estimate {
    let hours = workload_hours(summary, rng);
    let days = hours / 24;
    let estimation = match role {
        Role::Normal => format!("{days} days"),
        Role::Admin => format!("{days} days and {} hours", hours % 24),
    };
    Estimate { estimation }
}
