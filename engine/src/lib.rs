//! # Acres Engine
//!
//! The deterministic core of the Acres real-estate CRM.
//!
//! This crate holds the logic that is worth testing in isolation: lead and
//! property matching, lead hotness scoring, the filter/sort query layer, and
//! the derived-KPI aggregation, along with the entity model and the
//! normalization of remote rows into it. The network gateway and application
//! state live in the companion `acres-client` crate.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine has no knowledge of the network or the wall clock;
//!   "now" and "today" are always explicit parameters
//! - **Deterministic**: same inputs always produce same outputs, including
//!   tie-breaks (equal scores keep collection order)
//! - **Tolerant ingestion**: remote rows are normalized once, with defaults
//!   for missing or malformed fields; downstream code only sees the canonical
//!   schema
//!
//! ## Core Concepts
//!
//! ### Entities
//!
//! [`Lead`], [`Property`], [`Task`], [`Buyer`] and [`Seller`] are mutable
//! records keyed by opaque identifiers assigned by the remote store. All
//! cross-entity references are weak: lookups through the [`EntityStore`]
//! return `Option`, and a dangling reference is simply `None`.
//!
//! ### Matching and scoring
//!
//! [`match_properties`] ranks every property against one lead (+40 type, +30
//! location, +30 budget fit) and drops non-matches. [`score_lead`] estimates
//! lead quality in `[0, 100]` from status, budget fit, and recency.
//!
//! ### Snapshot model
//!
//! The store is one snapshot replaced wholesale after every successful remote
//! load; derived results are never cached across mutations.
//!
//! ## Quick Start
//!
//! ```rust
//! use acres_engine::{match_properties, Lead, LeadId, Property, PropertyId, PropertyKind};
//!
//! let lead = Lead {
//!     id: LeadId::new("lead-1"),
//!     property_type: PropertyKind::Flat,
//!     location: "Andheri".to_string(),
//!     budget: 5_000_000.0,
//!     ..Lead::default()
//! };
//!
//! let properties = vec![Property {
//!     id: PropertyId::new("prop-1"),
//!     kind: PropertyKind::Flat,
//!     location: "Andheri West".to_string(),
//!     price: 5_200_000.0,
//!     ..Property::default()
//! }];
//!
//! let ranked = match_properties(&lead, &properties);
//! assert_eq!(ranked[0].score, 100);
//! ```

pub mod entity;
pub mod error;
pub mod kpi;
pub mod matching;
pub mod normalize;
pub mod query;
pub mod store;
pub mod validate;

// Re-export main types at crate root
pub use entity::{
    Availability, Buyer, BuyerId, FollowUp, Lead, LeadId, LeadSource, LeadStatus, ListingMode,
    Priority, Property, PropertyId, PropertyKind, Seller, SellerId, Task, TaskId, TaskStatus,
};
pub use error::{Error, Result};
pub use kpi::{
    dashboard, due_buckets, funnel, high_value_uncontacted, leaderboard, task_due_window,
    tasks_in_window, AgentRank, DashboardKpis, DueBuckets, DueWindow, FunnelReport, FunnelTier,
    HIGH_VALUE_THRESHOLD,
};
pub use matching::{
    match_properties, match_score, score_lead, PropertyMatch, BUDGET_MATCH_POINTS,
    BUDGET_TOLERANCE, LOCATION_MATCH_POINTS, TYPE_MATCH_POINTS,
};
pub use query::{
    lead_haystack, property_haystack, sort_by_field, sort_refs_by_field, task_haystack,
    LeadFilter, PropertyFilter, SortOrder, SortSource, SortValue, TaskFilter,
};
pub use store::{ConfigEntry, EntityStore, Snapshot, StoreCounts};
pub use validate::{validate_lead, validate_property, validate_task};

/// Epoch milliseconds.
pub type Timestamp = i64;

/// Milliseconds in one day.
pub const MS_PER_DAY: Timestamp = 86_400_000;
