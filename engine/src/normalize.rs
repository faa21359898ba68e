//! Ingestion-time normalization of remote rows.
//!
//! The remote store returns flat JSON objects whose field names drifted over
//! time (`DueDate` vs `Due` vs `dueDate`), with every value either a string or
//! a number. This module maps all accepted spellings onto the canonical entity
//! structs in one pass, so downstream code never touches raw rows.
//!
//! Normalization is total: missing or malformed fields fall back to defaults
//! and never produce an error. The reverse direction (`*_to_row`) emits the
//! canonical sheet column names for full-record add/update calls.

use crate::entity::{
    Availability, Buyer, BuyerId, FollowUp, Lead, LeadId, LeadSource, LeadStatus, ListingMode,
    Priority, Property, PropertyId, PropertyKind, Seller, SellerId, Task, TaskId, TaskStatus,
};
use crate::store::ConfigEntry;
use crate::Timestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Map, Value};

/// Sheet column holding the serialized follow-up log.
pub const FOLLOWUPS_COLUMN: &str = "Followups (JSON)";

type Row = Map<String, Value>;

/// First non-empty string value among the accepted key spellings.
fn str_field(row: &Row, keys: &[&str]) -> String {
    for key in keys {
        match row.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => return s.trim().to_string(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    String::new()
}

/// Numeric value among the accepted key spellings; anything unparsable is 0.
fn num_field(row: &Row, keys: &[&str]) -> f64 {
    for key in keys {
        match row.get(*key) {
            Some(Value::Number(n)) => return n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => {
                if let Ok(n) = s.trim().parse::<f64>() {
                    return n;
                }
            }
            _ => {}
        }
    }
    0.0
}

fn date_field(row: &Row, keys: &[&str]) -> Option<Timestamp> {
    let raw = str_field(row, keys);
    parse_date(&raw)
}

/// Parse a date string in any of the formats the remote store has been seen
/// to emit. Returns epoch milliseconds, or `None` when unparsable.
pub fn parse_date(s: &str) -> Option<Timestamp> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for format in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
        }
    }
    None
}

/// Format a timestamp back into a sheet-friendly string. Midnight values are
/// written as bare dates, matching how they were entered.
pub fn format_date(ts: Timestamp) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts) {
        Some(dt) if dt.time() == chrono::NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => String::new(),
    }
}

fn as_row(value: &Value) -> Row {
    value.as_object().cloned().unwrap_or_default()
}

fn parse_followups(raw: &str) -> Vec<FollowUp> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    // Invalid JSON in the log column degrades to an empty log.
    serde_json::from_str(raw).unwrap_or_default()
}

pub fn lead_from_row(value: &Value) -> Lead {
    let row = as_row(value);
    Lead {
        id: LeadId::new(str_field(&row, &["ID", "Id", "id"])),
        name: str_field(&row, &["Name", "name"]),
        phone: str_field(&row, &["Phone", "phone"]),
        email: str_field(&row, &["Email", "email"]),
        city: str_field(&row, &["City", "city"]),
        location: str_field(&row, &["Location", "location"]),
        property_type: PropertyKind::parse(&str_field(
            &row,
            &["PropertyType", "propertyType", "Type"],
        )),
        budget: num_field(&row, &["Budget", "budget"]),
        purpose: str_field(&row, &["Purpose", "purpose"]),
        source: LeadSource::parse(&str_field(&row, &["Source", "source"])),
        status: LeadStatus::parse(&str_field(&row, &["Status", "status"])),
        priority: Priority::parse(&str_field(&row, &["Priority", "priority"])),
        agent: str_field(&row, &["Agent", "agent", "AssignedAgent"]),
        financing_type: str_field(&row, &["FinancingType", "financingType"]),
        buying_window: str_field(&row, &["BuyingWindow", "buyingWindow"]),
        occupation: str_field(&row, &["Occupation", "occupation"]),
        property_id: PropertyId::new(str_field(&row, &["PropertyID", "PropertyId", "propertyId"])),
        follow_ups: parse_followups(&str_field(
            &row,
            &[FOLLOWUPS_COLUMN, "Followups", "followups"],
        )),
        lead_date: date_field(&row, &["LeadDate", "leadDate", "Date"]),
        next_followup_date: date_field(&row, &["NextFollowupDate", "nextFollowupDate"]),
        lead_score: num_field(&row, &["LeadScore", "leadScore"]).clamp(0.0, 100.0) as u8,
        remark: str_field(&row, &["Remark", "remark"]),
    }
}

pub fn property_from_row(value: &Value) -> Property {
    let row = as_row(value);
    Property {
        id: PropertyId::new(str_field(&row, &["ID", "Id", "id"])),
        title: str_field(&row, &["Title", "title"]),
        full_address: str_field(&row, &["FullAddress", "fullAddress", "Address"]),
        location: str_field(&row, &["Location", "location"]),
        city: str_field(&row, &["City", "city"]),
        kind: PropertyKind::parse(&str_field(&row, &["Type", "type", "PropertyType"])),
        mode: ListingMode::parse(&str_field(&row, &["Mode", "mode"])),
        size: num_field(&row, &["Size", "size"]),
        price: num_field(&row, &["Price", "price"]),
        bedrooms: num_field(&row, &["Bedrooms", "bedrooms"]).max(0.0) as u32,
        bathrooms: num_field(&row, &["Bathrooms", "bathrooms"]).max(0.0) as u32,
        furnishing: str_field(&row, &["Furnishing", "furnishing"]),
        amenities: str_field(&row, &["Amenities", "amenities"]),
        facing: str_field(&row, &["Facing", "facing"]),
        construction_status: str_field(&row, &["ConstructionStatus", "constructionStatus"]),
        age: num_field(&row, &["Age", "age"]).max(0.0) as u32,
        availability: Availability::parse(&str_field(&row, &["Availability", "availability"])),
        agent: str_field(&row, &["Agent", "agent"]),
        owner: str_field(&row, &["Owner", "owner"]),
        seller_id: SellerId::new(str_field(&row, &["Seller", "SellerID", "sellerId"])),
        listed_date: date_field(&row, &["ListedDate", "listedDate", "Listed"]),
        media_urls: str_field(&row, &["MediaURLs", "MediaUrls", "mediaUrls"])
            .split([',', ' '])
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        remark: str_field(&row, &["Remark", "remark"]),
    }
}

pub fn task_from_row(value: &Value) -> Task {
    let row = as_row(value);
    Task {
        id: TaskId::new(str_field(&row, &["ID", "Id", "id"])),
        due_date: date_field(&row, &["DueDate", "Due", "dueDate"]),
        kind: str_field(&row, &["Type", "TaskType", "type"]),
        status: TaskStatus::parse(&str_field(&row, &["Status", "TaskStatus", "task_status"])),
        priority: Priority::parse(&str_field(&row, &["Priority", "priority"])),
        lead_id: LeadId::new(str_field(&row, &["LeadID", "LeadId", "leadId"])),
        property_id: PropertyId::new(str_field(&row, &["PropertyID", "PropertyId", "propertyId"])),
        assigned_to: str_field(&row, &["AssignedTo", "assignedTo"]),
        created_by: str_field(&row, &["CreatedBy", "createdBy"]),
        category: str_field(&row, &["Category", "category"]),
        outcome: str_field(&row, &["Outcome", "outcome"]),
        next_action: str_field(&row, &["NextAction", "nextAction"]),
        notes: str_field(&row, &["Notes", "notes"]),
    }
}

pub fn buyer_from_row(value: &Value) -> Buyer {
    let row = as_row(value);
    Buyer {
        id: BuyerId::new(str_field(&row, &["ID", "Id", "id"])),
        name: str_field(&row, &["Name", "name"]),
        phone: str_field(&row, &["Phone", "phone"]),
        email: str_field(&row, &["Email", "email"]),
    }
}

pub fn seller_from_row(value: &Value) -> Seller {
    let row = as_row(value);
    Seller {
        id: SellerId::new(str_field(&row, &["ID", "Id", "id"])),
        name: str_field(&row, &["Name", "name"]),
        phone: str_field(&row, &["Phone", "phone"]),
        email: str_field(&row, &["Email", "email"]),
    }
}

pub fn config_from_row(value: &Value) -> ConfigEntry {
    let row = as_row(value);
    ConfigEntry {
        key: str_field(&row, &["Key", "key", "Name"]),
        value: str_field(&row, &["Value", "value"]),
    }
}

fn opt_date(ts: Option<Timestamp>) -> Value {
    match ts {
        Some(ts) => Value::String(format_date(ts)),
        None => Value::String(String::new()),
    }
}

/// Serialize a lead back into the sheet row shape for add/update calls.
/// Mutations are full-record replaces, so every column is always emitted.
pub fn lead_to_row(lead: &Lead) -> Value {
    let followups = serde_json::to_string(&lead.follow_ups).unwrap_or_else(|_| "[]".to_string());
    json!({
        "ID": lead.id.as_str(),
        "Name": lead.name,
        "Phone": lead.phone,
        "Email": lead.email,
        "City": lead.city,
        "Location": lead.location,
        "PropertyType": lead.property_type.as_str(),
        "Budget": lead.budget,
        "Purpose": lead.purpose,
        "Source": lead.source.as_str(),
        "Status": lead.status.as_str(),
        "Priority": lead.priority.as_ref().map(Priority::as_str).unwrap_or(""),
        "Agent": lead.agent,
        "FinancingType": lead.financing_type,
        "BuyingWindow": lead.buying_window,
        "Occupation": lead.occupation,
        "PropertyID": lead.property_id.as_str(),
        FOLLOWUPS_COLUMN: followups,
        "LeadDate": opt_date(lead.lead_date),
        "NextFollowupDate": opt_date(lead.next_followup_date),
        "LeadScore": lead.lead_score,
        "Remark": lead.remark,
    })
}

pub fn property_to_row(property: &Property) -> Value {
    json!({
        "ID": property.id.as_str(),
        "Title": property.title,
        "FullAddress": property.full_address,
        "Location": property.location,
        "City": property.city,
        "Type": property.kind.as_str(),
        "Mode": property.mode.as_str(),
        "Size": property.size,
        "Price": property.price,
        "Bedrooms": property.bedrooms,
        "Bathrooms": property.bathrooms,
        "Furnishing": property.furnishing,
        "Amenities": property.amenities,
        "Facing": property.facing,
        "ConstructionStatus": property.construction_status,
        "Age": property.age,
        "Availability": property.availability.as_str(),
        "Agent": property.agent,
        "Owner": property.owner,
        "Seller": property.seller_id.as_str(),
        "ListedDate": opt_date(property.listed_date),
        "MediaURLs": property.media_urls.join(","),
        "Remark": property.remark,
    })
}

pub fn task_to_row(task: &Task) -> Value {
    json!({
        "ID": task.id.as_str(),
        "DueDate": opt_date(task.due_date),
        "Type": task.kind,
        "Status": task.status.as_str(),
        "Priority": task.priority.as_ref().map(Priority::as_str).unwrap_or(""),
        "LeadID": task.lead_id.as_str(),
        "PropertyID": task.property_id.as_str(),
        "AssignedTo": task.assigned_to,
        "CreatedBy": task.created_by,
        "Category": task.category,
        "Outcome": task.outcome,
        "NextAction": task.next_action,
        "Notes": task.notes,
    })
}

pub fn buyer_to_row(buyer: &Buyer) -> Value {
    json!({
        "ID": buyer.id.as_str(),
        "Name": buyer.name,
        "Phone": buyer.phone,
        "Email": buyer.email,
    })
}

pub fn seller_to_row(seller: &Seller) -> Value {
    json!({
        "ID": seller.id.as_str(),
        "Name": seller.name,
        "Phone": seller.phone,
        "Email": seller.email,
    })
}
