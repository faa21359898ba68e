//! Lead/property matching and lead hotness scoring.
//!
//! Both functions are pure: they never mutate their inputs and take the
//! current time as an explicit parameter, so the same inputs always produce
//! the same outputs.

use crate::entity::{Lead, LeadStatus, Property};
use crate::{Timestamp, MS_PER_DAY};

/// Points for a property type equal to the lead's desired type.
pub const TYPE_MATCH_POINTS: u32 = 40;
/// Points for the lead's location appearing inside the property's location.
pub const LOCATION_MATCH_POINTS: u32 = 30;
/// Points for a price within the lead's budget tolerance.
pub const BUDGET_MATCH_POINTS: u32 = 30;
/// Prices up to 10% over budget still count as affordable.
pub const BUDGET_TOLERANCE: f64 = 1.1;

/// One property scored against a lead.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMatch<'a> {
    pub property: &'a Property,
    pub score: u32,
}

/// True when both budget and price are set and the price fits the budget
/// with the 10% overshoot tolerance.
fn within_budget(budget: f64, price: f64) -> bool {
    budget > 0.0 && price > 0.0 && price <= budget * BUDGET_TOLERANCE
}

/// Score one property against one lead.
///
/// Additive over three terms: desired type (case-insensitive equality),
/// location (the lead's location as a substring of the property's), and
/// budget fit. A missing budget or price contributes nothing.
pub fn match_score(lead: &Lead, property: &Property) -> u32 {
    let mut score = 0;

    if !property.kind.is_unspecified()
        && !lead.property_type.is_unspecified()
        && property
            .kind
            .as_str()
            .eq_ignore_ascii_case(lead.property_type.as_str())
    {
        score += TYPE_MATCH_POINTS;
    }

    if !property.location.is_empty()
        && !lead.location.is_empty()
        && property
            .location
            .to_lowercase()
            .contains(&lead.location.to_lowercase())
    {
        score += LOCATION_MATCH_POINTS;
    }

    if within_budget(lead.budget, property.price) {
        score += BUDGET_MATCH_POINTS;
    }

    score
}

/// Rank all properties a lead might want, best first.
///
/// Properties scoring 0 are excluded. The sort is stable: equal scores keep
/// the order of the input collection, which keeps results deterministic
/// across re-renders.
pub fn match_properties<'a>(lead: &Lead, properties: &'a [Property]) -> Vec<PropertyMatch<'a>> {
    let mut matches: Vec<PropertyMatch<'a>> = properties
        .iter()
        .map(|property| PropertyMatch {
            property,
            score: match_score(lead, property),
        })
        .filter(|m| m.score > 0)
        .collect();

    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}

/// Estimate lead quality as an integer in `[0, 100]`.
///
/// Additive terms:
/// - +30 for an actively-worked status (Contacted, Site Visit, Negotiation)
/// - +50 for Closed (checked independently of the above; the branches are
///   mutually exclusive in practice, not by construction)
/// - up to +40 from budget fit: 10 per property priced within tolerance
/// - +15 for leads under 7 days old, +7 under 30 days; a missing lead date
///   counts as created now
pub fn score_lead(lead: &Lead, properties: &[Property], now: Timestamp) -> u8 {
    let mut score: u32 = 0;

    if matches!(
        lead.status,
        LeadStatus::Contacted | LeadStatus::SiteVisit | LeadStatus::Negotiation
    ) {
        score += 30;
    }
    if lead.status == LeadStatus::Closed {
        score += 50;
    }

    let affordable = properties
        .iter()
        .filter(|p| within_budget(lead.budget, p.price))
        .count() as u32;
    score += (affordable * 10).min(40);

    let lead_date = lead.lead_date.unwrap_or(now);
    let days_old = ((now - lead_date) / MS_PER_DAY).max(0);
    if days_old < 7 {
        score += 15;
    } else if days_old < 30 {
        score += 7;
    }

    score.min(100) as u8
}
