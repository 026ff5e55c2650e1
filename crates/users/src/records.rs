//! Typed views over user directory rows.
//!
//! The store itself only deals in `Row`s. These records give helpers and
//! consumers named fields, converting at the boundary: `TryFrom<&Row>` fails
//! with `InvalidRecord` when a column is missing or has the wrong type, and
//! `From<&User> for Row` produces a row that passes the table schema.

use serde::{Deserialize, Serialize};
use tabulon_core::{Error, Result, Row};
use time::format_description::{self, well_known::Rfc3339};
use time::{OffsetDateTime, UtcOffset};

use crate::schema::{USERS, USER_PREFERENCES};

fn string(table: &str, row: &Row, column: &str) -> Result<String> {
    row.get_str(column)
        .map(str::to_string)
        .ok_or_else(|| Error::invalid_record(format!("{}.{} is not a string", table, column)))
}

fn number(table: &str, row: &Row, column: &str) -> Result<f64> {
    row.get_f64(column)
        .ok_or_else(|| Error::invalid_record(format!("{}.{} is not a number", table, column)))
}

fn boolean(table: &str, row: &Row, column: &str) -> Result<bool> {
    row.get_bool(column)
        .ok_or_else(|| Error::invalid_record(format!("{}.{} is not a boolean", table, column)))
}

/// Parses an RFC 3339 timestamp column.
fn timestamp(column: &str, value: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| Error::invalid_record(format!("{}.{}: {}", USERS, column, e)))
}

/// UTC stamp with millisecond precision, e.g. `2024-01-15T09:30:05.123Z`.
const STAMP_FORMAT: &str =
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z";

/// Returns the current time as an RFC 3339 UTC string, truncated to
/// milliseconds.
pub fn now_rfc3339() -> Result<String> {
    format_stamp(OffsetDateTime::now_utc())
}

fn format_stamp(at: OffsetDateTime) -> Result<String> {
    let format = format_description::parse(STAMP_FORMAT)
        .map_err(|e| Error::invalid_record(format!("timestamp format: {}", e)))?;
    at.to_offset(UtcOffset::UTC)
        .format(&format)
        .map_err(|e| Error::invalid_record(format!("timestamp: {}", e)))
}

/// A user profile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: f64,
    pub avatar: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
    pub last_login_at: String,
    pub bio: String,
    pub location: String,
    pub website: String,
}

impl User {
    /// Parses `createdAt`.
    pub fn created_at(&self) -> Result<OffsetDateTime> {
        timestamp("createdAt", &self.created_at)
    }

    /// Parses `lastLoginAt`.
    pub fn last_login_at(&self) -> Result<OffsetDateTime> {
        timestamp("lastLoginAt", &self.last_login_at)
    }

    /// Returns true for the `admin` role.
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl TryFrom<&Row> for User {
    type Error = Error;

    fn try_from(row: &Row) -> Result<Self> {
        Ok(Self {
            id: string(USERS, row, "id")?,
            name: string(USERS, row, "name")?,
            email: string(USERS, row, "email")?,
            age: number(USERS, row, "age")?,
            avatar: string(USERS, row, "avatar")?,
            role: string(USERS, row, "role")?,
            is_active: boolean(USERS, row, "isActive")?,
            created_at: string(USERS, row, "createdAt")?,
            last_login_at: string(USERS, row, "lastLoginAt")?,
            bio: string(USERS, row, "bio")?,
            location: string(USERS, row, "location")?,
            website: string(USERS, row, "website")?,
        })
    }
}

impl From<&User> for Row {
    fn from(user: &User) -> Self {
        Row::new()
            .with("id", user.id.as_str())
            .with("name", user.name.as_str())
            .with("email", user.email.as_str())
            .with("age", user.age)
            .with("avatar", user.avatar.as_str())
            .with("role", user.role.as_str())
            .with("isActive", user.is_active)
            .with("createdAt", user.created_at.as_str())
            .with("lastLoginAt", user.last_login_at.as_str())
            .with("bio", user.bio.as_str())
            .with("location", user.location.as_str())
            .with("website", user.website.as_str())
    }
}

/// Preferences of one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreference {
    pub user_id: String,
    pub theme: String,
    pub language: String,
    pub notifications: bool,
    pub email_updates: bool,
}

impl TryFrom<&Row> for UserPreference {
    type Error = Error;

    fn try_from(row: &Row) -> Result<Self> {
        Ok(Self {
            user_id: string(USER_PREFERENCES, row, "userId")?,
            theme: string(USER_PREFERENCES, row, "theme")?,
            language: string(USER_PREFERENCES, row, "language")?,
            notifications: boolean(USER_PREFERENCES, row, "notifications")?,
            email_updates: boolean(USER_PREFERENCES, row, "emailUpdates")?,
        })
    }
}

impl From<&UserPreference> for Row {
    fn from(pref: &UserPreference) -> Self {
        Row::new()
            .with("userId", pref.user_id.as_str())
            .with("theme", pref.theme.as_str())
            .with("language", pref.language.as_str())
            .with("notifications", pref.notifications)
            .with("emailUpdates", pref.email_updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::mock_tables;

    #[test]
    fn test_user_from_seed_row() {
        let tables = mock_tables();
        let user = User::try_from(&tables[USERS]["user-1"]).unwrap();
        assert_eq!(user.name, "田中太郎");
        assert_eq!(user.age, 28.0);
        assert!(user.is_admin());
        assert!(user.is_active);
        assert_eq!(user.created_at().unwrap().year(), 2023);
    }

    #[test]
    fn test_user_row_conversion_is_lossless() {
        let tables = mock_tables();
        let row = &tables[USERS]["user-2"];
        let user = User::try_from(row).unwrap();
        assert_eq!(&Row::from(&user), row);
    }

    #[test]
    fn test_user_from_incomplete_row() {
        let row = Row::new().with("id", "u1").with("name", "A");
        let err = User::try_from(&row).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord { .. }));
    }

    #[test]
    fn test_user_from_wrong_type() {
        let tables = mock_tables();
        let mut row = tables[USERS]["user-1"].clone();
        row.set("age", "twenty");
        assert!(User::try_from(&row).is_err());
    }

    #[test]
    fn test_preference_conversion() {
        let tables = mock_tables();
        let row = &tables[USER_PREFERENCES]["pref-1"];
        let pref = UserPreference::try_from(row).unwrap();
        assert_eq!(pref.theme, "dark");
        assert!(pref.email_updates);
        assert_eq!(&Row::from(&pref), row);
    }

    #[test]
    fn test_now_rfc3339_parses() {
        let stamp = now_rfc3339().unwrap();
        assert!(OffsetDateTime::parse(&stamp, &Rfc3339).is_ok());
        assert_eq!(stamp.len(), "2024-01-15T09:30:05.123Z".len());
    }

    #[test]
    fn test_stamp_truncates_to_millis() {
        let at = OffsetDateTime::parse("2024-01-15T09:30:05.123456789Z", &Rfc3339).unwrap();
        assert_eq!(format_stamp(at).unwrap(), "2024-01-15T09:30:05.123Z");

        let whole = OffsetDateTime::parse("2024-01-15T09:30:05Z", &Rfc3339).unwrap();
        assert_eq!(format_stamp(whole).unwrap(), "2024-01-15T09:30:05.000Z");
    }

    #[test]
    fn test_user_serde_field_names() {
        let tables = mock_tables();
        let user = User::try_from(&tables[USERS]["user-3"]).unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["isActive"], serde_json::Value::Bool(false));
        assert_eq!(json["lastLoginAt"], "2023-12-15T11:20:00Z");
    }
}
