//! Aggregation module for the monthly rollup
//!
//! Allocated tickets are grouped by reporting month and the ten ticket
//! dimensions. Each group reports its distinct well count and the sums of
//! revenue, operating days and month fractions. Groups live in a `BTreeMap`
//! so rows come out sorted by key and a run is reproducible byte for byte.
//!
//! # Examples
//!
//! ```
//! use fieldroll::aggregation::Aggregator;
//!
//! let rollups = Aggregator::new().aggregate(&[]);
//! assert!(rollups.is_empty());
//! let months = Aggregator::aggregate_by_month(&rollups);
//! assert!(months.is_empty());
//! ```

use crate::aggregation_types::{MonthSummary, MonthlyRollup, RollupKey};
use crate::types::AllocatedTicket;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Relative tolerance for the revenue conservation check
pub const REVENUE_TOLERANCE: f64 = 1e-6;

/// Number of zero-revenue groups quoted in the warning
const ZERO_REVENUE_SAMPLE: usize = 5;

/// Accumulator for one rollup group
#[derive(Default)]
struct RollupAccumulator<'a> {
    wells: BTreeSet<&'a str>,
    revenue: f64,
    operating_days: f64,
    operating_cellmonth: f64,
}

impl<'a> RollupAccumulator<'a> {
    fn add_ticket(&mut self, ticket: &'a AllocatedTicket) {
        self.wells.insert(ticket.ticket.well_name.as_str());
        self.revenue += ticket.ticket.net_value_usd;
        self.operating_days += ticket.operating_days.unwrap_or(0.0);
        self.operating_cellmonth += ticket.operating_cellmonth.unwrap_or(0.0);
    }

    fn into_rollup(self, key: RollupKey) -> MonthlyRollup {
        MonthlyRollup {
            key,
            unique_well_count: self.wells.len(),
            tickets_revenue: self.revenue,
            operating_days: self.operating_days,
            operating_cellmonth: self.operating_cellmonth,
        }
    }
}

/// Main aggregation engine
#[derive(Debug, Clone)]
pub struct Aggregator {
    zero_revenue_sample: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    /// Create a new Aggregator
    pub fn new() -> Self {
        Self {
            zero_revenue_sample: ZERO_REVENUE_SAMPLE,
        }
    }

    /// Set how many zero-revenue groups are quoted in the warning
    pub fn with_zero_revenue_sample(mut self, sample: usize) -> Self {
        self.zero_revenue_sample = sample;
        self
    }

    /// Group allocated tickets into monthly rollup rows sorted by key
    pub fn aggregate(&self, tickets: &[AllocatedTicket]) -> Vec<MonthlyRollup> {
        let mut groups: BTreeMap<RollupKey, RollupAccumulator<'_>> = BTreeMap::new();

        for ticket in tickets {
            let key = RollupKey {
                adjusted_date: ticket.adjusted_date,
                dimensions: ticket.ticket.dimensions.clone(),
            };
            groups.entry(key).or_default().add_ticket(ticket);
        }

        let rollups: Vec<_> = groups
            .into_iter()
            .map(|(key, acc)| acc.into_rollup(key))
            .collect();

        let revenue_in: f64 = tickets.iter().map(|t| t.ticket.net_value_usd).sum();
        let revenue_out: f64 = rollups.iter().map(|r| r.tickets_revenue).sum();
        info!(
            "Aggregated {} tickets into {} groups (revenue before {:.2}, after {:.2})",
            tickets.len(),
            rollups.len(),
            revenue_in,
            revenue_out
        );
        if !revenue_matches(revenue_in, revenue_out) {
            warn!(
                "Revenue changed during aggregation: {} before, {} after",
                revenue_in, revenue_out
            );
        }

        self.report_zero_revenue(&rollups);
        rollups
    }

    fn report_zero_revenue(&self, rollups: &[MonthlyRollup]) {
        let zero: Vec<&MonthlyRollup> = rollups
            .iter()
            .filter(|r| r.tickets_revenue == 0.0)
            .collect();
        if zero.is_empty() {
            return;
        }

        let sample: Vec<String> = zero
            .iter()
            .take(self.zero_revenue_sample)
            .map(|r| {
                format!(
                    "{} {}/{}/{}",
                    r.key.adjusted_date.format("%Y-%m"),
                    r.key.dimensions.geounit_code,
                    r.key.dimensions.rig_name,
                    r.key.dimensions.billing_account
                )
            })
            .collect();
        warn!(
            "{} groups have zero revenue, e.g. {}",
            zero.len(),
            sample.join("; ")
        );
    }

    /// Fold rollup rows into one summary per reporting month
    pub fn aggregate_by_month(rollups: &[MonthlyRollup]) -> Vec<MonthSummary> {
        let mut monthly_map: BTreeMap<String, MonthSummary> = BTreeMap::new();

        for row in rollups {
            let month = row.key.adjusted_date.format("%Y-%m").to_string();
            let entry = monthly_map
                .entry(month.clone())
                .or_insert_with(|| MonthSummary {
                    month,
                    groups: 0,
                    well_count: 0,
                    tickets_revenue: 0.0,
                    operating_days: 0.0,
                    operating_cellmonth: 0.0,
                });

            entry.groups += 1;
            entry.well_count += row.unique_well_count;
            entry.tickets_revenue += row.tickets_revenue;
            entry.operating_days += row.operating_days;
            entry.operating_cellmonth += row.operating_cellmonth;
        }

        monthly_map.into_values().collect()
    }
}

/// Compare two revenue totals within [`REVENUE_TOLERANCE`]
pub fn revenue_matches(before: f64, after: f64) -> bool {
    let scale = before.abs().max(after.abs()).max(1.0);
    (before - after).abs() <= REVENUE_TOLERANCE * scale
}
