//! Client-side pre-submit validation.
//!
//! Violations block submission and are surfaced against the offending field;
//! an invalid record is never sent to the remote store. These checks mirror
//! the form rules of the dashboard: required name, digits-only phone, a basic
//! email shape, and numeric non-negative amounts.

use crate::entity::{Lead, Property, Task};
use crate::error::{Error, Result};

/// Phone numbers are 7 to 15 digits once separators are stripped.
fn check_phone(field: &str, phone: &str) -> Result<()> {
    if phone.is_empty() {
        return Ok(());
    }
    let digits: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '+' | '(' | ')'))
        .collect();
    if digits.len() < 7 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(field, "must be 7-15 digits"));
    }
    Ok(())
}

/// Minimal email shape: something@something.something.
fn check_email(field: &str, email: &str) -> Result<()> {
    if email.is_empty() {
        return Ok(());
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(Error::validation(field, "missing @"));
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(Error::validation(field, "not a valid address"));
    }
    let (host, tld) = domain.rsplit_once('.').unwrap_or(("", ""));
    if host.is_empty() || tld.is_empty() {
        return Err(Error::validation(field, "not a valid address"));
    }
    Ok(())
}

fn check_amount(field: &str, amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::validation(field, "must be a non-negative number"));
    }
    Ok(())
}

/// Validate a lead before add/update.
pub fn validate_lead(lead: &Lead) -> Result<()> {
    if lead.name.trim().is_empty() {
        return Err(Error::validation("name", "this field is required"));
    }
    check_phone("phone", &lead.phone)?;
    check_email("email", &lead.email)?;
    check_amount("budget", lead.budget)?;
    Ok(())
}

/// Validate a property before add/update.
pub fn validate_property(property: &Property) -> Result<()> {
    if property.title.trim().is_empty() {
        return Err(Error::validation("title", "this field is required"));
    }
    check_amount("price", property.price)?;
    check_amount("size", property.size)?;
    Ok(())
}

/// Validate a task before add/update. A task needs a due date to be
/// schedulable at all.
pub fn validate_task(task: &Task) -> Result<()> {
    if task.due_date.is_none() {
        return Err(Error::validation("dueDate", "this field is required"));
    }
    Ok(())
}
