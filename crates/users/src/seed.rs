//! Mock data the directory starts with.

use std::collections::BTreeMap;

use tabulon_core::{Row, TableData, Value};

use crate::schema::{APP_VERSION, CURRENT_USER_ID, IS_LOGGED_IN, USERS, USER_PREFERENCES};

#[allow(clippy::too_many_arguments)]
fn user(
    id: &str,
    name: &str,
    email: &str,
    age: u32,
    avatar: &str,
    role: &str,
    is_active: bool,
    created_at: &str,
    last_login_at: &str,
    bio: &str,
    location: &str,
    website: &str,
) -> (String, Row) {
    let row = Row::new()
        .with("id", id)
        .with("name", name)
        .with("email", email)
        .with("age", age)
        .with("avatar", avatar)
        .with("role", role)
        .with("isActive", is_active)
        .with("createdAt", created_at)
        .with("lastLoginAt", last_login_at)
        .with("bio", bio)
        .with("location", location)
        .with("website", website);
    (id.to_string(), row)
}

fn preference(
    id: &str,
    user_id: &str,
    theme: &str,
    language: &str,
    notifications: bool,
    email_updates: bool,
) -> (String, Row) {
    let row = Row::new()
        .with("userId", user_id)
        .with("theme", theme)
        .with("language", language)
        .with("notifications", notifications)
        .with("emailUpdates", email_updates);
    (id.to_string(), row)
}

/// Returns the three mock users and their preference rows.
pub fn mock_tables() -> BTreeMap<String, TableData> {
    let users: TableData = [
        user(
            "user-1",
            "田中太郎",
            "tanaka@example.com",
            28,
            "https://via.placeholder.com/150/0000FF/808080?text=T",
            "admin",
            true,
            "2023-01-15T09:00:00Z",
            "2024-01-20T14:30:00Z",
            "フロントエンド開発者として5年の経験があります。",
            "東京都",
            "https://tanaka-dev.com",
        ),
        user(
            "user-2",
            "佐藤花子",
            "sato@example.com",
            32,
            "https://via.placeholder.com/150/FF0000/FFFFFF?text=S",
            "user",
            true,
            "2023-03-22T10:15:00Z",
            "2024-01-19T16:45:00Z",
            "デザイナーとしてUI/UXに情熱を注いでいます。",
            "大阪府",
            "https://sato-design.jp",
        ),
        user(
            "user-3",
            "鈴木一郎",
            "suzuki@example.com",
            25,
            "https://via.placeholder.com/150/00FF00/000000?text=S",
            "user",
            false,
            "2023-06-10T08:30:00Z",
            "2023-12-15T11:20:00Z",
            "バックエンド開発に興味があります。",
            "福岡県",
            "",
        ),
    ]
    .into_iter()
    .collect();

    let preferences: TableData = [
        preference("pref-1", "user-1", "dark", "ja", true, true),
        preference("pref-2", "user-2", "light", "ja", true, false),
        preference("pref-3", "user-3", "light", "en", false, false),
    ]
    .into_iter()
    .collect();

    let mut tables = BTreeMap::new();
    tables.insert(USERS.to_string(), users);
    tables.insert(USER_PREFERENCES.to_string(), preferences);
    tables
}

/// Returns the mock standalone values.
pub fn mock_values() -> BTreeMap<String, Value> {
    let mut values = BTreeMap::new();
    values.insert(CURRENT_USER_ID.to_string(), Value::from("user-1"));
    values.insert(IS_LOGGED_IN.to_string(), Value::Boolean(true));
    values.insert(APP_VERSION.to_string(), Value::from("1.0.0"));
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables_schema;

    #[test]
    fn test_mock_tables_conform() {
        let schema = tables_schema().unwrap();
        for (table, rows) in mock_tables() {
            let table_schema = schema.get(&table).unwrap();
            for row in rows.values() {
                assert_eq!(&table_schema.conform_row(row).unwrap(), row);
            }
        }
    }

    #[test]
    fn test_mock_users() {
        let tables = mock_tables();
        let users = &tables[USERS];
        assert_eq!(users.len(), 3);
        assert_eq!(users["user-1"].get_str("role"), Some("admin"));
        assert_eq!(users["user-3"].get_bool("isActive"), Some(false));
        assert_eq!(tables[USER_PREFERENCES]["pref-3"].get_str("language"), Some("en"));
    }
}
