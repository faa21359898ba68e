//! Derived KPIs over the current collections.
//!
//! Everything here is recomputed on demand from the store contents; nothing
//! is cached across mutations. Functions that depend on the calendar take
//! "today" or "now" as an explicit parameter.

use crate::entity::{Lead, LeadStatus, Task, TaskStatus};
use crate::{Timestamp, MS_PER_DAY};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Default budget above which an uncontacted lead triggers an outreach alert.
pub const HIGH_VALUE_THRESHOLD: f64 = 1_000_000.0;

/// Presentation tier for the funnel completion bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunnelTier {
    /// Below 30% completion.
    Low,
    /// 30% to below 70%.
    Mid,
    /// 70% and above.
    High,
}

impl FunnelTier {
    pub fn from_pct(pct: u8) -> Self {
        match pct {
            0..=29 => FunnelTier::Low,
            30..=69 => FunnelTier::Mid,
            _ => FunnelTier::High,
        }
    }
}

/// Lead counts per funnel stage plus the completion summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelReport {
    pub new: usize,
    pub contacted: usize,
    pub site_visit: usize,
    pub negotiation: usize,
    pub closed: usize,
    /// All leads, including Lost and nonstandard statuses.
    pub total: usize,
    /// closed / total, rounded; 0 when there are no leads.
    pub completion_pct: u8,
    pub tier: FunnelTier,
}

/// Count leads per funnel stage.
pub fn funnel(leads: &[Lead]) -> FunnelReport {
    let mut report = FunnelReport {
        new: 0,
        contacted: 0,
        site_visit: 0,
        negotiation: 0,
        closed: 0,
        total: leads.len(),
        completion_pct: 0,
        tier: FunnelTier::Low,
    };

    for lead in leads {
        match lead.status {
            LeadStatus::New => report.new += 1,
            LeadStatus::Contacted => report.contacted += 1,
            LeadStatus::SiteVisit => report.site_visit += 1,
            LeadStatus::Negotiation => report.negotiation += 1,
            LeadStatus::Closed => report.closed += 1,
            LeadStatus::Lost | LeadStatus::Other(_) => {}
        }
    }

    if report.total > 0 {
        report.completion_pct =
            ((report.closed as f64 / report.total as f64) * 100.0).round() as u8;
    }
    report.tier = FunnelTier::from_pct(report.completion_pct);
    report
}

/// One agent's closed-deal count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRank {
    pub agent: String,
    pub closed: usize,
}

/// Closed-deal leaderboard.
///
/// Every agent seen in the collection appears, including those with zero
/// closed deals; leads without an agent land in the "Unassigned" bucket.
/// Sorted descending by count; equal counts keep first-seen agent order.
pub fn leaderboard(leads: &[Lead]) -> Vec<AgentRank> {
    let mut ranks: Vec<AgentRank> = Vec::new();

    for lead in leads {
        let agent = if lead.agent.is_empty() {
            "Unassigned"
        } else {
            lead.agent.as_str()
        };
        let closed = usize::from(lead.status == LeadStatus::Closed);
        match ranks.iter_mut().find(|r| r.agent == agent) {
            Some(rank) => rank.closed += closed,
            None => ranks.push(AgentRank {
                agent: agent.to_string(),
                closed,
            }),
        }
    }

    ranks.sort_by(|a, b| b.closed.cmp(&a.closed));
    ranks
}

/// Distance of a task's due date from today, midnight-normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueWindow {
    /// Due before today.
    Overdue,
    /// Due exactly today.
    Today,
    /// Due within the next 1-3 days.
    Soon,
    /// Due more than 3 days out.
    Later,
}

/// Classify a due timestamp against today. Only the date part counts: a task
/// due later today is still "today", never "soon". A timestamp outside the
/// representable date range cannot be placed in any window and yields `None`.
pub fn classify_due(due: Timestamp, today: NaiveDate) -> Option<DueWindow> {
    let due_date = DateTime::<Utc>::from_timestamp_millis(due)?.date_naive();
    let diff = (due_date - today).num_days();
    Some(if diff < 0 {
        DueWindow::Overdue
    } else if diff == 0 {
        DueWindow::Today
    } else if diff <= 3 {
        DueWindow::Soon
    } else {
        DueWindow::Later
    })
}

/// Due window of a task, or `None` when the task has no classifiable due
/// date. Such tasks are excluded from every bucket.
pub fn task_due_window(task: &Task, today: NaiveDate) -> Option<DueWindow> {
    task.due_date.and_then(|due| classify_due(due, today))
}

/// Open-task counts per due window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueBuckets {
    pub overdue: usize,
    pub today: usize,
    pub soon: usize,
    pub later: usize,
}

/// Bucket all open tasks by due window. Non-open tasks and tasks without a
/// due date are skipped.
pub fn due_buckets(tasks: &[Task], today: NaiveDate) -> DueBuckets {
    let mut buckets = DueBuckets::default();
    for task in tasks.iter().filter(|t| t.status == TaskStatus::Open) {
        match task_due_window(task, today) {
            Some(DueWindow::Overdue) => buckets.overdue += 1,
            Some(DueWindow::Today) => buckets.today += 1,
            Some(DueWindow::Soon) => buckets.soon += 1,
            Some(DueWindow::Later) => buckets.later += 1,
            None => {}
        }
    }
    buckets
}

/// Open tasks in one due window, ordered by due date ascending.
pub fn tasks_in_window<'a>(
    tasks: &'a [Task],
    window: DueWindow,
    today: NaiveDate,
) -> Vec<&'a Task> {
    let mut selected: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Open && task_due_window(t, today) == Some(window))
        .collect();
    selected.sort_by_key(|t| t.due_date);
    selected
}

/// Leads worth an outreach nudge: big budget, never contacted, not already
/// marked hot. Matching is substring-based on the status and priority labels,
/// so nonstandard spellings like "Recontact" still count as contacted.
pub fn high_value_uncontacted(leads: &[Lead], threshold: f64) -> Vec<&Lead> {
    leads
        .iter()
        .filter(|lead| {
            lead.budget >= threshold
                && !lead.status.as_str().to_lowercase().contains("contact")
                && !lead
                    .priority
                    .as_ref()
                    .map_or(String::new(), |p| p.as_str().to_lowercase())
                    .contains("hot")
        })
        .collect()
}

/// Headline numbers for the dashboard KPI strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub total_leads: usize,
    /// Leads in Site Visit or Negotiation.
    pub hot_leads: usize,
    /// Hot leads whose lead date falls in the current calendar week
    /// (Sunday-based).
    pub hot_this_week: usize,
    pub open_tasks: usize,
    pub closed_leads: usize,
}

fn is_this_week(ts: Timestamp, now: Timestamp) -> bool {
    let (Some(date), Some(today)) = (
        DateTime::<Utc>::from_timestamp_millis(ts).map(|d| d.date_naive()),
        DateTime::<Utc>::from_timestamp_millis(now).map(|d| d.date_naive()),
    ) else {
        return false;
    };
    let week_start = today - chrono::Days::new(today.weekday().num_days_from_sunday() as u64);
    let week_end = week_start + chrono::Days::new(6);
    date >= week_start && date <= week_end
}

/// Compute the dashboard KPI strip from the current collections.
pub fn dashboard(leads: &[Lead], tasks: &[Task], now: Timestamp) -> DashboardKpis {
    let hot = |l: &&Lead| matches!(l.status, LeadStatus::SiteVisit | LeadStatus::Negotiation);
    DashboardKpis {
        total_leads: leads.len(),
        hot_leads: leads.iter().filter(hot).count(),
        hot_this_week: leads
            .iter()
            .filter(hot)
            .filter(|l| l.lead_date.is_some_and(|d| is_this_week(d, now)))
            .count(),
        open_tasks: tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Open)
            .count(),
        closed_leads: leads
            .iter()
            .filter(|l| l.status == LeadStatus::Closed)
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{LeadId, Priority, TaskId};

    fn lead(agent: &str, status: &str) -> Lead {
        Lead {
            id: LeadId::new(format!("{agent}-{status}")),
            agent: agent.to_string(),
            status: LeadStatus::parse(status),
            ..Lead::default()
        }
    }

    fn open_task(id: &str, due: Option<Timestamp>) -> Task {
        Task {
            id: TaskId::new(id),
            due_date: due,
            status: TaskStatus::Open,
            ..Task::default()
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn due_on(date: NaiveDate) -> Timestamp {
        date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
    }

    #[test]
    fn funnel_counts_and_pct() {
        let leads = vec![
            lead("a", "New"),
            lead("a", "Contacted"),
            lead("b", "Closed"),
            lead("b", "Lost"),
        ];
        let report = funnel(&leads);
        assert_eq!(report.new, 1);
        assert_eq!(report.contacted, 1);
        assert_eq!(report.closed, 1);
        assert_eq!(report.total, 4);
        assert_eq!(report.completion_pct, 25);
        assert_eq!(report.tier, FunnelTier::Low);
    }

    #[test]
    fn funnel_empty_is_zero_pct() {
        let report = funnel(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.completion_pct, 0);
        assert_eq!(report.tier, FunnelTier::Low);
    }

    #[test]
    fn funnel_tiers() {
        assert_eq!(FunnelTier::from_pct(0), FunnelTier::Low);
        assert_eq!(FunnelTier::from_pct(29), FunnelTier::Low);
        assert_eq!(FunnelTier::from_pct(30), FunnelTier::Mid);
        assert_eq!(FunnelTier::from_pct(69), FunnelTier::Mid);
        assert_eq!(FunnelTier::from_pct(70), FunnelTier::High);
        assert_eq!(FunnelTier::from_pct(100), FunnelTier::High);
    }

    #[test]
    fn leaderboard_counts_only_closed() {
        let leads = vec![
            lead("A", "Closed"),
            lead("A", "New"),
            lead("B", "Closed"),
        ];
        let ranks = leaderboard(&leads);
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks[0], AgentRank { agent: "A".to_string(), closed: 1 });
        assert_eq!(ranks[1], AgentRank { agent: "B".to_string(), closed: 1 });
    }

    #[test]
    fn leaderboard_unassigned_bucket_and_zero_counts() {
        let leads = vec![lead("", "New"), lead("C", "Closed")];
        let ranks = leaderboard(&leads);
        assert_eq!(ranks[0].agent, "C");
        assert_eq!(ranks[0].closed, 1);
        assert_eq!(ranks[1].agent, "Unassigned");
        assert_eq!(ranks[1].closed, 0);
    }

    #[test]
    fn leaderboard_ties_keep_first_seen_order() {
        let leads = vec![
            lead("Zoya", "Closed"),
            lead("Amit", "Closed"),
        ];
        let ranks = leaderboard(&leads);
        assert_eq!(ranks[0].agent, "Zoya");
        assert_eq!(ranks[1].agent, "Amit");
    }

    #[test]
    fn due_window_boundaries() {
        let t = today();
        assert_eq!(
            classify_due(due_on(t - chrono::Days::new(1)), t),
            Some(DueWindow::Overdue)
        );
        assert_eq!(classify_due(due_on(t), t), Some(DueWindow::Today));
        assert_eq!(
            classify_due(due_on(t + chrono::Days::new(2)), t),
            Some(DueWindow::Soon)
        );
        assert_eq!(
            classify_due(due_on(t + chrono::Days::new(3)), t),
            Some(DueWindow::Soon)
        );
        assert_eq!(
            classify_due(due_on(t + chrono::Days::new(4)), t),
            Some(DueWindow::Later)
        );
        assert_eq!(
            classify_due(due_on(t + chrono::Days::new(10)), t),
            Some(DueWindow::Later)
        );
    }

    #[test]
    fn due_today_with_time_of_day_is_still_today() {
        let t = today();
        let late_today = t.and_hms_opt(18, 30, 0).unwrap().and_utc().timestamp_millis();
        assert_eq!(classify_due(late_today, t), Some(DueWindow::Today));
    }

    #[test]
    fn out_of_range_due_date_is_excluded() {
        let t = today();
        assert_eq!(classify_due(Timestamp::MAX, t), None);

        let tasks = vec![open_task("absurd", Some(Timestamp::MAX))];
        assert_eq!(task_due_window(&tasks[0], t), None);
        assert_eq!(due_buckets(&tasks, t), DueBuckets::default());
        assert!(tasks_in_window(&tasks, DueWindow::Later, t).is_empty());
    }

    #[test]
    fn tasks_without_due_date_are_excluded() {
        let t = today();
        let tasks = vec![
            open_task("dated", Some(due_on(t))),
            open_task("undated", None),
        ];
        let buckets = due_buckets(&tasks, t);
        assert_eq!(buckets.today, 1);
        assert_eq!(
            buckets.overdue + buckets.today + buckets.soon + buckets.later,
            1
        );
        assert_eq!(task_due_window(&tasks[1], t), None);
    }

    #[test]
    fn due_buckets_count_open_tasks_only() {
        let t = today();
        let mut done = open_task("done", Some(due_on(t)));
        done.status = TaskStatus::Done;
        let tasks = vec![open_task("open", Some(due_on(t))), done];

        let buckets = due_buckets(&tasks, t);
        assert_eq!(buckets.today, 1);
    }

    #[test]
    fn tasks_in_window_sorted_by_due() {
        let t = today();
        let tasks = vec![
            open_task("b", Some(due_on(t + chrono::Days::new(3)))),
            open_task("a", Some(due_on(t + chrono::Days::new(1)))),
        ];
        let soon = tasks_in_window(&tasks, DueWindow::Soon, t);
        let ids: Vec<_> = soon.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn high_value_alert_filters() {
        let mut rich_new = lead("a", "New");
        rich_new.budget = 2_000_000.0;

        let mut rich_contacted = lead("a", "Contacted");
        rich_contacted.budget = 2_000_000.0;

        let mut rich_hot = lead("a", "New");
        rich_hot.budget = 2_000_000.0;
        rich_hot.priority = Some(Priority::Hot);

        let mut poor_new = lead("a", "New");
        poor_new.budget = 100_000.0;

        let leads = vec![rich_new.clone(), rich_contacted, rich_hot, poor_new];
        let flagged = high_value_uncontacted(&leads, HIGH_VALUE_THRESHOLD);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].id, rich_new.id);
    }

    #[test]
    fn dashboard_counts() {
        let now = due_on(today());
        let mut hot_recent = lead("a", "Site Visit");
        hot_recent.lead_date = Some(now - MS_PER_DAY);
        let mut hot_old = lead("a", "Negotiation");
        hot_old.lead_date = Some(now - 60 * MS_PER_DAY);

        let leads = vec![hot_recent, hot_old, lead("b", "Closed"), lead("c", "New")];
        let tasks = vec![open_task("t1", None)];

        let kpis = dashboard(&leads, &tasks, now);
        assert_eq!(kpis.total_leads, 4);
        assert_eq!(kpis.hot_leads, 2);
        assert_eq!(kpis.closed_leads, 1);
        assert_eq!(kpis.open_tasks, 1);
        // only the one-day-old lead falls in the current week
        assert_eq!(kpis.hot_this_week, 1);
    }
}
