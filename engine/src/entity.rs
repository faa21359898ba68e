//! Entity types for the CRM collections.
//!
//! All relationships between entities are weak: a record holds the string
//! identifier of the record it points at, and lookups through the
//! [`EntityStore`](crate::EntityStore) return `Option`. A dangling reference
//! resolves to `None`, never an error.

use crate::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier assigned by the remote store.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// An empty identifier means "no reference".
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`Lead`], assigned by the remote store on creation.
    LeadId
);
entity_id!(
    /// Identifier of a [`Property`].
    PropertyId
);
entity_id!(
    /// Identifier of a [`Task`].
    TaskId
);
entity_id!(
    /// Identifier of a [`Buyer`].
    BuyerId
);
entity_id!(
    /// Identifier of a [`Seller`].
    SellerId
);

/// Implements string round-tripping for an enum with an `Other` catch-all:
/// serde goes through `String`, parsing is case-insensitive, and unknown
/// spellings survive unchanged in `Other`.
macro_rules! impl_string_enum {
    ($ty:ident) => {
        impl From<String> for $ty {
            fn from(s: String) -> Self {
                Self::parse(&s)
            }
        }

        impl From<$ty> for String {
            fn from(v: $ty) -> String {
                v.as_str().to_string()
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Position of a lead in the sales funnel.
///
/// Transitions are not enforced: the remote store accepts any value after any
/// other, and this crate preserves that permissive model. The canonical funnel
/// order is New → Contacted → SiteVisit → Negotiation → Closed, with Lost as
/// a terminal side exit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    SiteVisit,
    Negotiation,
    Closed,
    Lost,
    /// Any spelling the canonical set does not cover.
    Other(String),
}

impl LeadStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" | "new" => LeadStatus::New,
            "contacted" => LeadStatus::Contacted,
            "site visit" | "sitevisit" => LeadStatus::SiteVisit,
            "negotiation" => LeadStatus::Negotiation,
            "closed" => LeadStatus::Closed,
            "lost" => LeadStatus::Lost,
            _ => LeadStatus::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::SiteVisit => "Site Visit",
            LeadStatus::Negotiation => "Negotiation",
            LeadStatus::Closed => "Closed",
            LeadStatus::Lost => "Lost",
            LeadStatus::Other(s) => s,
        }
    }

    /// Closed and Lost leads leave the active funnel.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeadStatus::Closed | LeadStatus::Lost)
    }
}

impl_string_enum!(LeadStatus);

/// Acquisition channel of a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LeadSource {
    Website,
    Facebook,
    Referral,
    WhatsApp,
    #[default]
    Unknown,
    Other(String),
}

impl LeadSource {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "website" => LeadSource::Website,
            "facebook" => LeadSource::Facebook,
            "referral" => LeadSource::Referral,
            "whatsapp" => LeadSource::WhatsApp,
            "" => LeadSource::Unknown,
            _ => LeadSource::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LeadSource::Website => "Website",
            LeadSource::Facebook => "Facebook",
            LeadSource::Referral => "Referral",
            LeadSource::WhatsApp => "WhatsApp",
            LeadSource::Unknown => "",
            LeadSource::Other(s) => s,
        }
    }
}

impl_string_enum!(LeadSource);

/// Manually assigned urgency of a lead or task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Hot,
    Warm,
    Cold,
    Other(String),
}

impl Priority {
    /// Parse a priority; empty input means "not set".
    pub fn parse(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(match trimmed.to_lowercase().as_str() {
            "hot" => Priority::Hot,
            "warm" => Priority::Warm,
            "cold" => Priority::Cold,
            _ => Priority::Other(trimmed.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Priority::Hot => "Hot",
            Priority::Warm => "Warm",
            Priority::Cold => "Cold",
            Priority::Other(s) => s,
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        Priority::parse(&s).unwrap_or(Priority::Other(String::new()))
    }
}

impl From<Priority> for String {
    fn from(v: Priority) -> String {
        v.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a property listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyKind {
    Flat,
    Villa,
    Office,
    Shop,
    Plot,
    #[default]
    Unspecified,
    Other(String),
}

impl PropertyKind {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "flat" => PropertyKind::Flat,
            "villa" => PropertyKind::Villa,
            "office" => PropertyKind::Office,
            "shop" => PropertyKind::Shop,
            "plot" => PropertyKind::Plot,
            "" => PropertyKind::Unspecified,
            _ => PropertyKind::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PropertyKind::Flat => "Flat",
            PropertyKind::Villa => "Villa",
            PropertyKind::Office => "Office",
            PropertyKind::Shop => "Shop",
            PropertyKind::Plot => "Plot",
            PropertyKind::Unspecified => "",
            PropertyKind::Other(s) => s,
        }
    }

    pub fn is_unspecified(&self) -> bool {
        self.as_str().is_empty()
    }
}

impl_string_enum!(PropertyKind);

/// Whether a property is offered for sale or rent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ListingMode {
    Sale,
    Rent,
    #[default]
    Unspecified,
    Other(String),
}

impl ListingMode {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sale" => ListingMode::Sale,
            "rent" => ListingMode::Rent,
            "" => ListingMode::Unspecified,
            _ => ListingMode::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ListingMode::Sale => "Sale",
            ListingMode::Rent => "Rent",
            ListingMode::Unspecified => "",
            ListingMode::Other(s) => s,
        }
    }
}

impl_string_enum!(ListingMode);

/// Market availability of a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Availability {
    #[default]
    Available,
    Sold,
    Rented,
    Other(String),
}

impl Availability {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" | "available" => Availability::Available,
            "sold" => Availability::Sold,
            "rented" => Availability::Rented,
            _ => Availability::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Availability::Available => "Available",
            Availability::Sold => "Sold",
            Availability::Rented => "Rented",
            Availability::Other(s) => s,
        }
    }
}

impl_string_enum!(Availability);

/// Lifecycle state of a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    #[default]
    Open,
    Done,
    Rescheduled,
    Closed,
    Other(String),
}

impl TaskStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" | "open" => TaskStatus::Open,
            "done" => TaskStatus::Done,
            "rescheduled" => TaskStatus::Rescheduled,
            "closed" => TaskStatus::Closed,
            _ => TaskStatus::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Open => "Open",
            TaskStatus::Done => "Done",
            TaskStatus::Rescheduled => "Rescheduled",
            TaskStatus::Closed => "Closed",
            TaskStatus::Other(s) => s,
        }
    }
}

impl_string_enum!(TaskStatus);

/// One interaction recorded against a lead.
///
/// Follow-ups form an append-only log, most recent first. The log travels with
/// the lead record and is persisted as a whole on every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    /// Date as entered, `YYYY-MM-DD`.
    #[serde(default)]
    pub date: String,
    /// Outcome label, e.g. "Interested", "No Answer", "Planned".
    #[serde(default)]
    pub outcome: String,
    #[serde(default)]
    pub note: String,
}

/// A prospective buyer or renter moving through the sales funnel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
    pub location: String,
    /// Desired property category.
    pub property_type: PropertyKind,
    /// Numeric budget; 0 means not provided.
    pub budget: f64,
    pub purpose: String,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub priority: Option<Priority>,
    pub agent: String,
    pub financing_type: String,
    pub buying_window: String,
    pub occupation: String,
    /// Weak reference to a linked property; may be empty or dangling.
    pub property_id: PropertyId,
    /// Interaction log, most recent first.
    pub follow_ups: Vec<FollowUp>,
    /// When the lead was created (epoch milliseconds).
    pub lead_date: Option<Timestamp>,
    pub next_followup_date: Option<Timestamp>,
    /// Derived hotness score, persisted alongside the record.
    pub lead_score: u8,
    pub remark: String,
}

/// A real-estate listing, for sale or rent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    pub full_address: String,
    pub location: String,
    pub city: String,
    pub kind: PropertyKind,
    pub mode: ListingMode,
    /// Size in square feet; 0 means not provided.
    pub size: f64,
    /// Asking price; 0 means not provided.
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub furnishing: String,
    pub amenities: String,
    pub facing: String,
    pub construction_status: String,
    /// Age of the building in years.
    pub age: u32,
    pub availability: Availability,
    pub agent: String,
    pub owner: String,
    /// Weak reference to the listing seller.
    pub seller_id: SellerId,
    pub listed_date: Option<Timestamp>,
    pub media_urls: Vec<String>,
    pub remark: String,
}

/// A follow-up action tied to a lead and/or property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub due_date: Option<Timestamp>,
    /// Free-form task category: Call, Meeting, Site Visit, Note, ...
    pub kind: String,
    pub status: TaskStatus,
    pub priority: Option<Priority>,
    pub lead_id: LeadId,
    pub property_id: PropertyId,
    pub assigned_to: String,
    pub created_by: String,
    pub category: String,
    pub outcome: String,
    pub next_action: String,
    pub notes: String,
}

/// Minimal contact record for a buyer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    pub id: BuyerId,
    pub name: String,
    pub phone: String,
    pub email: String,
}

/// Minimal contact record for a seller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
    pub phone: String,
    pub email: String,
}
