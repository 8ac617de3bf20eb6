use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{Criterion, criterion_group, criterion_main};
use fieldroll::{
    aggregation::Aggregator,
    allocator::Allocator,
    coalescer::{MergeRule, coalesce},
    types::{ActivityId, JournalRecord, TicketDimensions, TicketRecord},
};
use std::hint::black_box;

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2019, 1, 1)
        .unwrap()
        .and_hms_opt(6, 0, 0)
        .unwrap()
}

fn create_journal(count: usize) -> Vec<JournalRecord> {
    let mut records = Vec::with_capacity(count);

    for i in 0..count {
        let activity = i % (count / 20).max(1);
        let start = base_time() + Duration::hours((i * 7 % 5000) as i64);
        records.push(JournalRecord {
            activity_id: ActivityId::new(format!("ACT-{activity}")),
            start_time: start,
            end_time: start + Duration::hours((i % 96) as i64),
            geounit_code: format!("GEO-{}", activity % 8),
        });
    }

    records
}

fn create_tickets(count: usize, activities: usize) -> Vec<TicketRecord> {
    (0..count)
        .map(|i| TicketRecord {
            activity_id: ActivityId::new(format!("ACT-{}", i % activities)),
            field_ticket_start_date: base_time(),
            field_ticket_end_date: base_time() + Duration::days((i % 700) as i64),
            net_value_usd: (i as f64) * 12.5,
            dimensions: TicketDimensions {
                geounit_code: format!("GEO-{}", i % 8),
                country_name: format!("Country {}", i % 5),
                job_group_code: "WL".to_string(),
                job_type_code: "OH".to_string(),
                billing_account: format!("Account {}", i % 30),
                rig_name: format!("Rig {}", i % 40),
                rig_type: "Jackup".to_string(),
                rig_environment: "Offshore".to_string(),
                well_type: "Oil".to_string(),
                well_operating_environment: "Offshore".to_string(),
            },
            well_name: format!("W-{}", i % 200),
            booking_status: "Booked".to_string(),
            field_ticket_id: format!("FT-{i}"),
            field_ticket_status: "Closed".to_string(),
            well_geometry: "Vertical".to_string(),
        })
        .collect()
}

fn benchmark_coalesce(c: &mut Criterion) {
    let mut group = c.benchmark_group("coalesce");
    group.sample_size(20);

    for size in [1_000, 10_000, 100_000] {
        let journal = create_journal(size);
        for rule in [MergeRule::Adjacent, MergeRule::Overlapping] {
            group.bench_function(format!("{rule}_{size}"), |b| {
                b.iter(|| coalesce(black_box(journal.clone()), rule))
            });
        }
    }

    group.finish();
}

fn benchmark_allocate_and_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate_and_aggregate");
    group.sample_size(10);

    let activities = coalesce(create_journal(20_000), MergeRule::Adjacent);
    for size in [10_000, 100_000] {
        let tickets = create_tickets(size, activities.len().max(1) + 50);
        group.bench_function(format!("tickets_{size}"), |b| {
            b.iter(|| {
                let allocated = Allocator::default()
                    .allocate(black_box(tickets.clone()), &activities)
                    .unwrap();
                Aggregator::new().aggregate(&allocated)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_coalesce, benchmark_allocate_and_aggregate);
criterion_main!(benches);
