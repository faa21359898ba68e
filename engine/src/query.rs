//! Filtering and sorting over the entity collections.
//!
//! Free-text search builds one lower-cased haystack per record from a fixed
//! field set and tests substring containment. Field filters are independent
//! predicates ANDed with the text filter; every filter is optional and an
//! absent filter always matches.

use crate::entity::{Lead, LeadSource, LeadStatus, ListingMode, Property, PropertyKind, Task, TaskStatus};
use crate::store::EntityStore;
use std::cmp::Ordering;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A field value coerced for comparison.
///
/// Known numeric keys coerce both sides to numbers (missing → 0), keys
/// containing `date` or `due` coerce to epoch milliseconds (unparsable → 0),
/// and everything else compares as a lower-cased string.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Number(f64),
    Time(i64),
    Text(String),
}

impl SortValue {
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Time(a), SortValue::Time(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            // Mixed variants only happen for unknown keys; treat as equal so
            // the stable sort leaves the order untouched.
            _ => Ordering::Equal,
        }
    }
}

/// Entities that expose their fields for key-driven sorting.
pub trait SortSource {
    /// The comparable value for a field key, case-insensitive. Unknown keys
    /// yield an empty text value so sorting by them is a stable no-op.
    fn sort_value(&self, key: &str) -> SortValue;
}

fn norm_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Keys naming a date compare as timestamps even when the entity carries no
/// such field; the missing value coerces to epoch 0 like any other.
fn is_date_key(normalized: &str) -> bool {
    normalized.contains("date") || normalized.contains("due")
}

fn text(s: &str) -> SortValue {
    SortValue::Text(s.to_lowercase())
}

fn time(ts: Option<i64>) -> SortValue {
    SortValue::Time(ts.unwrap_or(0))
}

impl SortSource for Lead {
    fn sort_value(&self, key: &str) -> SortValue {
        match norm_key(key).as_str() {
            "budget" => SortValue::Number(self.budget),
            "leadscore" => SortValue::Number(self.lead_score as f64),
            "leaddate" => time(self.lead_date),
            "nextfollowupdate" => time(self.next_followup_date),
            "name" => text(&self.name),
            "phone" => text(&self.phone),
            "email" => text(&self.email),
            "city" => text(&self.city),
            "location" => text(&self.location),
            "propertytype" => text(self.property_type.as_str()),
            "purpose" => text(&self.purpose),
            "source" => text(self.source.as_str()),
            "status" => text(self.status.as_str()),
            "priority" => text(self.priority.as_ref().map_or("", |p| p.as_str())),
            "agent" => text(&self.agent),
            "financingtype" => text(&self.financing_type),
            "buyingwindow" => text(&self.buying_window),
            "occupation" => text(&self.occupation),
            other if is_date_key(other) => SortValue::Time(0),
            _ => text(""),
        }
    }
}

impl SortSource for Property {
    fn sort_value(&self, key: &str) -> SortValue {
        match norm_key(key).as_str() {
            "price" => SortValue::Number(self.price),
            "size" => SortValue::Number(self.size),
            "bedrooms" => SortValue::Number(self.bedrooms as f64),
            "bathrooms" => SortValue::Number(self.bathrooms as f64),
            "age" => SortValue::Number(self.age as f64),
            "listeddate" => time(self.listed_date),
            "title" => text(&self.title),
            "fulladdress" => text(&self.full_address),
            "location" => text(&self.location),
            "city" => text(&self.city),
            "type" | "kind" => text(self.kind.as_str()),
            "mode" => text(self.mode.as_str()),
            "furnishing" => text(&self.furnishing),
            "facing" => text(&self.facing),
            "availability" => text(self.availability.as_str()),
            "agent" => text(&self.agent),
            "owner" => text(&self.owner),
            other if is_date_key(other) => SortValue::Time(0),
            _ => text(""),
        }
    }
}

impl SortSource for Task {
    fn sort_value(&self, key: &str) -> SortValue {
        match norm_key(key).as_str() {
            "duedate" | "due" => time(self.due_date),
            "type" | "kind" => text(&self.kind),
            "status" => text(self.status.as_str()),
            "priority" => text(self.priority.as_ref().map_or("", |p| p.as_str())),
            "assignedto" => text(&self.assigned_to),
            "createdby" => text(&self.created_by),
            "category" => text(&self.category),
            "outcome" => text(&self.outcome),
            "nextaction" => text(&self.next_action),
            "notes" => text(&self.notes),
            other if is_date_key(other) => SortValue::Time(0),
            _ => text(""),
        }
    }
}

/// Sort records in place by a field key. The underlying sort is stable, so
/// records comparing equal keep their relative order.
pub fn sort_by_field<T: SortSource>(items: &mut [T], key: &str, order: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = a.sort_value(key).compare(&b.sort_value(key));
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

/// Same as [`sort_by_field`] but over borrowed records.
pub fn sort_refs_by_field<T: SortSource>(items: &mut [&T], key: &str, order: SortOrder) {
    items.sort_by(|a, b| {
        let ordering = a.sort_value(key).compare(&b.sort_value(key));
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

/// Free-text haystack for a lead: contact, location, budget, funnel and
/// assignment fields, plus the title of the linked property when it resolves.
pub fn lead_haystack(lead: &Lead, linked_property_title: Option<&str>) -> String {
    [
        lead.name.as_str(),
        lead.phone.as_str(),
        lead.email.as_str(),
        lead.location.as_str(),
        lead.city.as_str(),
        lead.property_type.as_str(),
        &lead.budget.to_string(),
        lead.purpose.as_str(),
        lead.source.as_str(),
        lead.remark.as_str(),
        lead.status.as_str(),
        lead.agent.as_str(),
        lead.priority.as_ref().map_or("", |p| p.as_str()),
        lead.financing_type.as_str(),
        lead.buying_window.as_str(),
        lead.occupation.as_str(),
        linked_property_title.unwrap_or(""),
    ]
    .join(" ")
    .to_lowercase()
}

/// Free-text haystack for a property: title, address, categorization and
/// headline numbers.
pub fn property_haystack(property: &Property) -> String {
    [
        property.title.as_str(),
        property.full_address.as_str(),
        property.location.as_str(),
        property.city.as_str(),
        property.kind.as_str(),
        property.mode.as_str(),
        &property.size.to_string(),
        &property.price.to_string(),
        &property.bedrooms.to_string(),
        &property.bathrooms.to_string(),
        property.owner.as_str(),
        property.remark.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Free-text haystack for a task: notes, assignment, outcome fields and the
/// raw lead/property identifiers.
pub fn task_haystack(task: &Task) -> String {
    [
        task.notes.as_str(),
        task.assigned_to.as_str(),
        task.created_by.as_str(),
        task.category.as_str(),
        task.outcome.as_str(),
        task.next_action.as_str(),
        task.lead_id.as_str(),
        task.property_id.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

fn matches_text(haystack: &str, query: &Option<String>) -> bool {
    match query {
        Some(q) if !q.is_empty() => haystack.contains(&q.to_lowercase()),
        _ => true,
    }
}

/// Filters over the lead collection. All criteria are optional and ANDed.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub text: Option<String>,
    pub status: Option<LeadStatus>,
    pub source: Option<LeadSource>,
    pub min_budget: Option<f64>,
    pub location: Option<String>,
}

impl LeadFilter {
    /// Test one lead. The store is consulted to resolve the linked property
    /// title into the free-text haystack.
    pub fn matches(&self, lead: &Lead, store: &EntityStore) -> bool {
        let title = store
            .property(&lead.property_id)
            .map(|p| p.title.as_str());

        matches_text(&lead_haystack(lead, title), &self.text)
            && self.status.as_ref().is_none_or(|s| &lead.status == s)
            && self.source.as_ref().is_none_or(|s| &lead.source == s)
            && self.min_budget.is_none_or(|min| lead.budget >= min)
            && self.location.as_ref().is_none_or(|loc| {
                lead.location.to_lowercase().contains(&loc.to_lowercase())
            })
    }

    /// Apply to the whole collection, preserving order.
    pub fn apply<'a>(&self, store: &'a EntityStore) -> Vec<&'a Lead> {
        store
            .leads()
            .iter()
            .filter(|lead| self.matches(lead, store))
            .collect()
    }
}

/// Filters over the property collection.
#[derive(Debug, Clone, Default)]
pub struct PropertyFilter {
    pub text: Option<String>,
    pub kind: Option<PropertyKind>,
    pub mode: Option<ListingMode>,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        matches_text(&property_haystack(property), &self.text)
            && self.kind.as_ref().is_none_or(|k| &property.kind == k)
            && self.mode.as_ref().is_none_or(|m| &property.mode == m)
    }

    pub fn apply<'a>(&self, store: &'a EntityStore) -> Vec<&'a Property> {
        store
            .properties()
            .iter()
            .filter(|p| self.matches(p))
            .collect()
    }
}

/// Filters over the task collection.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub text: Option<String>,
    pub status: Option<TaskStatus>,
    pub kind: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        matches_text(&task_haystack(task), &self.text)
            && self.status.as_ref().is_none_or(|s| &task.status == s)
            && self
                .kind
                .as_ref()
                .is_none_or(|k| task.kind.eq_ignore_ascii_case(k))
    }

    pub fn apply<'a>(&self, store: &'a EntityStore) -> Vec<&'a Task> {
        store.tasks().iter().filter(|t| self.matches(t)).collect()
    }
}
