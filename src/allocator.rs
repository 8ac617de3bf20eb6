//! Allocation of coalesced operating days to field tickets
//!
//! Each ticket is joined to its activity's coalesced day total. The total is
//! split evenly across all tickets sharing the activity, regardless of each
//! ticket's own duration, so the shares of one activity always add back up
//! to its coalesced value. Every ticket is attributed to a reporting month
//! with [`adjust_month`] on its end date, and its share is also expressed as
//! a fraction of that month's days.

use crate::error::{FieldrollError, Result};
use crate::types::{ActivityId, AllocatedTicket, CoalescedActivity, TicketRecord};
use fieldroll_core::calendar::{adjust_month, days_in_month};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// What to do with tickets whose activity is absent from the journal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnmatchedPolicy {
    /// Keep the ticket and its revenue; its operating days stay empty and
    /// add nothing to sums
    #[default]
    Keep,
    /// Drop the ticket before allocation and aggregation
    Exclude,
    /// Fail the run
    Reject,
}

impl fmt::Display for UnmatchedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keep => write!(f, "keep"),
            Self::Exclude => write!(f, "exclude"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

impl std::str::FromStr for UnmatchedPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep" => Ok(Self::Keep),
            "exclude" => Ok(Self::Exclude),
            "reject" => Ok(Self::Reject),
            _ => Err(format!("Invalid unmatched policy: {s}")),
        }
    }
}

/// Counts describing one allocation pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AllocationReport {
    /// Tickets returned by the allocator
    pub tickets: usize,
    /// Tickets that found their activity
    pub matched: usize,
    /// Tickets without an activity, kept or excluded depending on the policy
    pub unmatched: usize,
    /// Tickets dropped by [`UnmatchedPolicy::Exclude`]
    pub excluded: usize,
}

/// Ticket allocator
#[derive(Debug, Default, Clone)]
pub struct Allocator {
    policy: UnmatchedPolicy,
}

impl Allocator {
    /// Create a new Allocator with the given unmatched-ticket policy
    pub fn new(policy: UnmatchedPolicy) -> Self {
        Self { policy }
    }

    /// Get the unmatched-ticket policy
    pub fn policy(&self) -> UnmatchedPolicy {
        self.policy
    }

    /// Allocate operating days to tickets, preserving ticket order
    pub fn allocate(
        &self,
        tickets: Vec<TicketRecord>,
        activities: &[CoalescedActivity],
    ) -> Result<Vec<AllocatedTicket>> {
        self.allocate_with_report(tickets, activities)
            .map(|(allocated, _)| allocated)
    }

    /// Allocate operating days and report match counts
    pub fn allocate_with_report(
        &self,
        tickets: Vec<TicketRecord>,
        activities: &[CoalescedActivity],
    ) -> Result<(Vec<AllocatedTicket>, AllocationReport)> {
        let values = activity_values(activities);
        let mut report = AllocationReport::default();

        let unmatched: Vec<&ActivityId> = tickets
            .iter()
            .map(|t| &t.activity_id)
            .filter(|id| !values.contains_key(id))
            .collect();
        report.unmatched = unmatched.len();

        if let Some(first) = unmatched.first() {
            match self.policy {
                UnmatchedPolicy::Reject => {
                    return Err(FieldrollError::UnmatchedActivity {
                        activity_id: (*first).clone(),
                        tickets: unmatched.len(),
                    });
                }
                UnmatchedPolicy::Exclude => {
                    warn!(
                        "Excluding {} tickets without a journal activity (first: {})",
                        unmatched.len(),
                        first
                    );
                }
                UnmatchedPolicy::Keep => {
                    warn!(
                        "{} tickets have no journal activity (first: {}); their operating days are left empty",
                        unmatched.len(),
                        first
                    );
                }
            }
        }

        let tickets: Vec<TicketRecord> = match self.policy {
            UnmatchedPolicy::Exclude => {
                let before = tickets.len();
                let kept: Vec<_> = tickets
                    .into_iter()
                    .filter(|t| values.contains_key(&t.activity_id))
                    .collect();
                report.excluded = before - kept.len();
                kept
            }
            _ => tickets,
        };

        let mut ticket_counts: HashMap<ActivityId, usize> = HashMap::new();
        for ticket in &tickets {
            *ticket_counts.entry(ticket.activity_id.clone()).or_default() += 1;
        }

        let allocated: Vec<_> = tickets
            .into_iter()
            .map(|ticket| {
                let share = values.get(&ticket.activity_id).map(|value| {
                    let count = ticket_counts.get(&ticket.activity_id).copied().unwrap_or(1);
                    *value as f64 / count as f64
                });
                allocate_one(ticket, share)
            })
            .collect();

        report.tickets = allocated.len();
        report.matched = allocated.iter().filter(|t| t.is_matched()).count();
        debug!(
            "Allocated {} tickets across {} activities ({} matched)",
            report.tickets,
            ticket_counts.len(),
            report.matched
        );

        Ok((allocated, report))
    }
}

/// Attach the reporting month and the given day share to one ticket
pub fn allocate_one(ticket: TicketRecord, operating_days: Option<f64>) -> AllocatedTicket {
    let adjusted_date = adjust_month(ticket.field_ticket_end_date.date());
    let month_days = f64::from(days_in_month(adjusted_date));

    AllocatedTicket {
        adjusted_date,
        operating_days,
        operating_cellmonth: operating_days.map(|days| days / month_days),
        ticket,
    }
}

/// Coalesced value per activity; the first row wins for duplicated ids
fn activity_values(activities: &[CoalescedActivity]) -> HashMap<&ActivityId, i64> {
    let mut values = HashMap::with_capacity(activities.len());
    let mut duplicates = 0usize;
    for activity in activities {
        if values.contains_key(&activity.activity_id) {
            duplicates += 1;
            continue;
        }
        values.insert(&activity.activity_id, activity.value);
    }
    if duplicates > 0 {
        warn!(
            "Ignored {} duplicated activity rows in the coalesced journal",
            duplicates
        );
    }
    values
}
