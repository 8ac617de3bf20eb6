//! Property-based tests for fieldroll using proptest

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use fieldroll::{
    aggregation::Aggregator,
    allocator::{Allocator, UnmatchedPolicy},
    calendar::{adjust_month, days_in_month},
    coalescer::{MergeRule, coalesce, count_days},
    types::{ActivityId, CoalescedActivity, JournalRecord, TicketDimensions, TicketRecord},
};
use proptest::prelude::*;

// Strategies for generating test data

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

prop_compose! {
    fn arb_date()(offset in 0i64..3000) -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 1, 1).unwrap() + Duration::days(offset)
    }
}

prop_compose! {
    fn arb_interval(activity: &'static str)(
        start_hours in 0i64..24 * 120,
        length_hours in 0i64..24 * 20,
    ) -> JournalRecord {
        let start = base() + Duration::hours(start_hours);
        JournalRecord {
            activity_id: ActivityId::new(activity),
            start_time: start,
            end_time: start + Duration::hours(length_hours),
            geounit_code: "NSA".to_string(),
        }
    }
}

fn arb_rule() -> impl Strategy<Value = MergeRule> {
    prop_oneof![Just(MergeRule::Adjacent), Just(MergeRule::Overlapping)]
}

fn ticket(activity: &str, end: NaiveDateTime, revenue: f64, rig: &str) -> TicketRecord {
    TicketRecord {
        activity_id: ActivityId::new(activity),
        field_ticket_start_date: end,
        field_ticket_end_date: end,
        net_value_usd: revenue,
        dimensions: TicketDimensions {
            geounit_code: "NSA".to_string(),
            country_name: "Norway".to_string(),
            job_group_code: "WL".to_string(),
            job_type_code: "OH".to_string(),
            billing_account: "ACME".to_string(),
            rig_name: rig.to_string(),
            rig_type: "Jackup".to_string(),
            rig_environment: "Offshore".to_string(),
            well_type: "Oil".to_string(),
            well_operating_environment: "Offshore".to_string(),
        },
        well_name: format!("W-{rig}"),
        booking_status: "Booked".to_string(),
        field_ticket_id: "FT".to_string(),
        field_ticket_status: "Closed".to_string(),
        well_geometry: "Vertical".to_string(),
    }
}

proptest! {
    #[test]
    fn test_adjusted_month_properties(date in arb_date()) {
        let adjusted = adjust_month(date);
        prop_assert_eq!(adjusted.day(), 1);
        prop_assert!(adjusted <= date + Duration::days(7));
        if date.day() <= 25 {
            prop_assert_eq!((adjusted.year(), adjusted.month()), (date.year(), date.month()));
        } else {
            prop_assert!(adjusted > date);
        }
        prop_assert!((28..=31).contains(&days_in_month(adjusted)));
    }

    #[test]
    fn test_coalesced_value_bounds(
        records in prop::collection::vec(arb_interval("A"), 1..12),
        rule in arb_rule(),
    ) {
        let mut sorted = records.clone();
        sorted.sort_by_key(|r| r.start_time);

        let value = count_days(&sorted, rule);
        let first = sorted.first().unwrap().start_time.date();
        let latest = sorted.iter().map(|r| r.end_time.date()).max().unwrap();
        let union_len = (latest - first).num_days() + 1;
        let per_record: i64 = sorted
            .iter()
            .map(|r| (r.end_time.date() - r.start_time.date()).num_days() + 1)
            .sum();

        prop_assert!(value >= 1);
        prop_assert!(value <= per_record);
        if rule == MergeRule::Overlapping {
            prop_assert!(value <= union_len);
        }
    }

    #[test]
    fn test_coalesce_is_order_independent_for_distinct_starts(
        records in prop::collection::vec(arb_interval("A"), 1..10),
        rule in arb_rule(),
    ) {
        let mut reversed = records.clone();
        reversed.reverse();
        let mut starts: Vec<_> = records.iter().map(|r| r.start_time).collect();
        starts.sort();
        starts.dedup();
        prop_assume!(starts.len() == records.len());

        prop_assert_eq!(coalesce(records, rule), coalesce(reversed, rule));
    }

    #[test]
    fn test_allocation_conserves_value(
        value in 1i64..400,
        ends in prop::collection::vec(0i64..365, 1..25),
    ) {
        let activities = vec![CoalescedActivity {
            geounit_code: "NSA".to_string(),
            activity_id: ActivityId::new("A"),
            value,
            oa_start: base(),
            oa_end: base(),
        }];
        let tickets: Vec<_> = ends
            .iter()
            .map(|d| ticket("A", base() + Duration::days(*d), 1.0, "R"))
            .collect();

        let allocated = Allocator::new(UnmatchedPolicy::Keep)
            .allocate(tickets, &activities)
            .unwrap();
        let total: f64 = allocated.iter().filter_map(|t| t.operating_days).sum();
        prop_assert!((total - value as f64).abs() < 1e-9);
    }

    #[test]
    fn test_aggregation_conserves_revenue(
        rows in prop::collection::vec((0i64..365, 0.0f64..1e6, 0usize..4), 1..60),
    ) {
        let rigs = ["R1", "R2", "R3", "R4"];
        let tickets: Vec<_> = rows
            .iter()
            .map(|(d, revenue, rig)| ticket("A", base() + Duration::days(*d), *revenue, rigs[*rig]))
            .collect();
        let activities = vec![CoalescedActivity {
            geounit_code: "NSA".to_string(),
            activity_id: ActivityId::new("A"),
            value: 30,
            oa_start: base(),
            oa_end: base(),
        }];

        let allocated = Allocator::default().allocate(tickets, &activities).unwrap();
        let rollups = Aggregator::new().aggregate(&allocated);

        let before: f64 = rows.iter().map(|(_, revenue, _)| revenue).sum();
        let after: f64 = rollups.iter().map(|r| r.tickets_revenue).sum();
        prop_assert!((before - after).abs() <= 1e-6 * before.max(1.0));

        let days: f64 = rollups.iter().map(|r| r.operating_days).sum();
        prop_assert!((days - 30.0).abs() < 1e-9);
    }
}
