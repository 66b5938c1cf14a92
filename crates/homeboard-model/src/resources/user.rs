//! Marketplace user accounts.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{merge, non_empty};
use crate::access::{FieldAccess, Fields};

/// What a user does on the marketplace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Agent,
    Mover,
    #[default]
    Customer,
}

impl UserRole {
    pub const LABELS: &'static [&'static str] = &["Admin", "Agent", "Mover", "Customer"];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::Agent => "Agent",
            UserRole::Mover => "Mover",
            UserRole::Customer => "Customer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ADMIN" => Ok(UserRole::Admin),
            "AGENT" => Ok(UserRole::Agent),
            "MOVER" => Ok(UserRole::Mover),
            "CUSTOMER" => Ok(UserRole::Customer),
            _ => Err(format!("Unknown user role: {s}")),
        }
    }
}

/// Account state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserStatus {
    #[default]
    Active,
    Pending,
    Suspended,
}

impl UserStatus {
    pub const LABELS: &'static [&'static str] = &["Active", "Pending", "Suspended"];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Pending => "Pending",
            UserStatus::Suspended => "Suspended",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVE" => Ok(UserStatus::Active),
            "PENDING" => Ok(UserStatus::Pending),
            "SUSPENDED" => Ok(UserStatus::Suspended),
            _ => Err(format!("Unknown user status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub city: String,
    /// Moving or agency company, if any.
    pub company: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl Fields for User {
    const RESOURCE: &'static str = "user";
    const COLLECTION_KEY: &'static str = "users";
    const DRAFT_KEY: &'static str = "userDraft";

    type Patch = UserPatch;

    fn apply_patch(&mut self, patch: &UserPatch) {
        merge(&mut self.name, patch.name.as_ref());
        merge(&mut self.email, patch.email.as_ref());
        merge(&mut self.phone, patch.phone.as_ref());
        merge(&mut self.role, patch.role.as_ref());
        merge(&mut self.status, patch.status.as_ref());
        merge(&mut self.city, patch.city.as_ref());
        merge(&mut self.company, patch.company.as_ref());
    }
}

// Users carry no date of their own; the query engine falls back to the
// record's creation day (the join date).
impl FieldAccess for User {
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "company"];
    const CATEGORY_FIELDS: &'static [&'static str] = &["role", "status", "city"];

    fn category_values(field: &str) -> Option<&'static [&'static str]> {
        match field {
            "role" => Some(UserRole::LABELS),
            "status" => Some(UserStatus::LABELS),
            _ => None,
        }
    }

    fn text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "name" => non_empty(&self.name),
            "email" => non_empty(&self.email),
            "phone" => non_empty(&self.phone),
            "role" => Some(Cow::Borrowed(self.role.as_str())),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "city" => non_empty(&self.city),
            "company" => non_empty(&self.company),
            _ => None,
        }
    }
}
