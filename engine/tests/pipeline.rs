//! End-to-end tests over the ingestion → store → query/matching/KPI pipeline.
//!
//! Rows enter the engine the way the remote store delivers them (flat JSON
//! objects with stringly-typed values) and every derived result is checked
//! against the public API only.

use acres_engine::{
    dashboard, due_buckets, funnel, leaderboard, match_properties, normalize, score_lead,
    sort_refs_by_field, EntityStore, Lead, LeadFilter, LeadStatus, Property, Snapshot, SortOrder,
    Task, MS_PER_DAY,
};
use chrono::NaiveDate;
use proptest::prelude::*;
use serde_json::json;

const NOW: i64 = 1_710_000_000_000; // 2024-03-09 16:00 UTC

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
}

fn day(offset: i64) -> String {
    let date = if offset >= 0 {
        today() + chrono::Days::new(offset as u64)
    } else {
        today() - chrono::Days::new((-offset) as u64)
    };
    date.format("%Y-%m-%d").to_string()
}

fn load_store() -> EntityStore {
    let lead_rows = vec![
        json!({
            "ID": "lead-1", "Name": "Asha Kumar", "Phone": "9876543210",
            "Location": "Andheri", "PropertyType": "Flat", "Budget": "5000000",
            "Status": "Site Visit", "Agent": "Meera", "PropertyID": "prop-1",
            "LeadDate": day(-2),
        }),
        json!({
            "ID": "lead-2", "Name": "Ravi Shah", "Budget": 2000000,
            "Status": "Closed", "Agent": "Meera", "LeadDate": day(-40),
        }),
        json!({
            "ID": "lead-3", "Name": "Unknown Walk-in", "Status": "New",
        }),
    ];
    let property_rows = vec![
        json!({
            "ID": "prop-1", "Title": "Sunrise Towers 2BHK", "Location": "Andheri West",
            "Type": "Flat", "Mode": "Sale", "Price": 5200000,
        }),
        json!({
            "ID": "prop-2", "Title": "Bandra Sea View Villa", "Location": "Bandra",
            "Type": "Villa", "Mode": "Sale", "Price": 20000000,
        }),
    ];
    let task_rows = vec![
        json!({ "ID": "task-1", "Type": "Call", "Status": "Open", "LeadID": "lead-1", "DueDate": day(0) }),
        json!({ "ID": "task-2", "Type": "Site Visit", "Status": "Open", "DueDate": day(2) }),
        json!({ "ID": "task-3", "Type": "Call", "Status": "Open", "Due": day(-1) }),
        json!({ "ID": "task-4", "Type": "Note", "Status": "Done", "DueDate": day(0) }),
    ];

    let mut store = EntityStore::new();
    store.replace(Snapshot {
        leads: lead_rows.iter().map(normalize::lead_from_row).collect(),
        properties: property_rows.iter().map(normalize::property_from_row).collect(),
        tasks: task_rows.iter().map(normalize::task_from_row).collect(),
        ..Snapshot::default()
    });
    store
}

#[test]
fn matching_over_ingested_rows() {
    let store = load_store();
    let lead = store.lead(&"lead-1".into()).unwrap();

    let ranked = match_properties(lead, store.properties());
    // Type + location + budget all line up for prop-1; prop-2 matches nothing.
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].property.id.as_str(), "prop-1");
    assert_eq!(ranked[0].score, 100);
}

#[test]
fn scoring_over_ingested_rows() {
    let store = load_store();

    // Site Visit (+30), one affordable property (+10), two days old (+15)
    let asha = store.lead(&"lead-1".into()).unwrap();
    assert_eq!(score_lead(asha, store.properties(), NOW), 55);

    // Closed (+50), nothing affordable, 40 days old
    let ravi = store.lead(&"lead-2".into()).unwrap();
    assert_eq!(score_lead(ravi, store.properties(), NOW), 50);

    // New with no lead date counts as created now (+15)
    let walk_in = store.lead(&"lead-3".into()).unwrap();
    assert_eq!(score_lead(walk_in, store.properties(), NOW), 15);
}

#[test]
fn text_filter_reaches_through_linked_property() {
    let store = load_store();
    let filter = LeadFilter {
        text: Some("sunrise".to_string()),
        ..LeadFilter::default()
    };
    let hits = filter.apply(&store);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id.as_str(), "lead-1");
}

#[test]
fn filter_then_sort_preserves_stability() {
    let store = load_store();
    let mut leads = LeadFilter::default().apply(&store);
    sort_refs_by_field(&mut leads, "budget", SortOrder::Descending);

    let ids: Vec<_> = leads.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["lead-1", "lead-2", "lead-3"]);
}

#[test]
fn funnel_and_leaderboard_from_store() {
    let store = load_store();

    let report = funnel(store.leads());
    assert_eq!(report.total, 3);
    assert_eq!(report.new, 1);
    assert_eq!(report.site_visit, 1);
    assert_eq!(report.closed, 1);
    assert_eq!(report.completion_pct, 33);

    let ranks = leaderboard(store.leads());
    assert_eq!(ranks[0].agent, "Meera");
    assert_eq!(ranks[0].closed, 1);
    assert_eq!(ranks[1].agent, "Unassigned");
    assert_eq!(ranks[1].closed, 0);
}

#[test]
fn due_buckets_from_store() {
    let store = load_store();
    let buckets = due_buckets(store.tasks(), today());

    // task-3 (alternate "Due" spelling) is overdue, task-1 is today,
    // task-2 is soon, the Done task is skipped.
    assert_eq!(buckets.overdue, 1);
    assert_eq!(buckets.today, 1);
    assert_eq!(buckets.soon, 1);
    assert_eq!(buckets.later, 0);
}

#[test]
fn dashboard_from_store() {
    let store = load_store();
    let kpis = dashboard(store.leads(), store.tasks(), NOW);
    assert_eq!(kpis.total_leads, 3);
    assert_eq!(kpis.hot_leads, 1);
    assert_eq!(kpis.hot_this_week, 1);
    assert_eq!(kpis.closed_leads, 1);
    assert_eq!(kpis.open_tasks, 3);
}

#[test]
fn snapshot_replace_discards_previous_collections() {
    let mut store = load_store();
    assert_eq!(store.counts().leads, 3);

    store.replace(Snapshot::default());
    assert!(store.is_empty());
    assert!(store.lead(&"lead-1".into()).is_none());
}

// Derived results must not depend on when or how often they run.
#[test]
fn derived_results_are_repeatable() {
    let store = load_store();
    let lead = store.lead(&"lead-1".into()).unwrap();

    let a: Vec<_> = match_properties(lead, store.properties())
        .iter()
        .map(|m| (m.property.id.clone(), m.score))
        .collect();
    let b: Vec<_> = match_properties(lead, store.properties())
        .iter()
        .map(|m| (m.property.id.clone(), m.score))
        .collect();
    assert_eq!(a, b);

    assert_eq!(funnel(store.leads()), funnel(store.leads()));
    assert_eq!(dashboard(store.leads(), store.tasks(), NOW), dashboard(store.leads(), store.tasks(), NOW));
}

fn arb_status() -> impl Strategy<Value = LeadStatus> {
    prop_oneof![
        Just(LeadStatus::New),
        Just(LeadStatus::Contacted),
        Just(LeadStatus::SiteVisit),
        Just(LeadStatus::Negotiation),
        Just(LeadStatus::Closed),
        Just(LeadStatus::Lost),
        "[A-Za-z ]{0,12}".prop_map(|s| LeadStatus::parse(&s)),
    ]
}

fn arb_lead() -> impl Strategy<Value = Lead> {
    (
        arb_status(),
        -1.0e9..1.0e9f64,
        prop_oneof![Just(None), (0i64..3_000_000_000_000i64).prop_map(Some)],
        "[a-z]{0,10}",
    )
        .prop_map(|(status, budget, lead_date, location)| Lead {
            status,
            budget,
            lead_date,
            location,
            ..Lead::default()
        })
}

fn arb_property() -> impl Strategy<Value = Property> {
    ("[a-z]{0,10}", 0.0..1.0e9f64).prop_map(|(location, price)| Property {
        location,
        price,
        ..Property::default()
    })
}

proptest! {
    #[test]
    fn lead_score_is_always_in_range(
        lead in arb_lead(),
        properties in prop::collection::vec(arb_property(), 0..8),
        now in 0i64..3_000_000_000_000i64,
    ) {
        let score = score_lead(&lead, &properties, now);
        prop_assert!(score <= 100);
    }

    #[test]
    fn matches_are_positive_and_descending(
        lead in arb_lead(),
        properties in prop::collection::vec(arb_property(), 0..16),
    ) {
        let ranked = match_properties(&lead, &properties);
        prop_assert!(ranked.iter().all(|m| m.score > 0));
        prop_assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn due_classification_is_total(
        due in 0i64..4_000_000_000_000i64,
        today_offset in 0u32..20_000,
    ) {
        let today = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
            + chrono::Days::new(today_offset as u64);
        let task = Task {
            due_date: Some(due),
            ..Task::default()
        };
        // every dated task lands in exactly one window
        prop_assert!(acres_engine::task_due_window(&task, today).is_some());
    }

    #[test]
    fn recency_never_rewards_stale_leads(age_days in 30i64..10_000) {
        let fresh = Lead {
            lead_date: Some(NOW - MS_PER_DAY),
            ..Lead::default()
        };
        let stale = Lead {
            lead_date: Some(NOW - age_days * MS_PER_DAY),
            ..Lead::default()
        };
        prop_assert!(score_lead(&stale, &[], NOW) <= score_lead(&fresh, &[], NOW));
    }
}
