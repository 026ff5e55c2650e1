//! Schema of the user directory.

use tabulon_core::schema::{TableSchema, TableSchemaBuilder, TablesSchema, ValuesSchema, ValuesSchemaBuilder};
use tabulon_core::{CellType, Result};

/// Table of user profiles.
pub const USERS: &str = "users";
/// Table of per-user preferences, keyed by its own ids.
pub const USER_PREFERENCES: &str = "userPreferences";

/// Value naming the signed-in user.
pub const CURRENT_USER_ID: &str = "currentUserId";
/// Value holding the login flag.
pub const IS_LOGGED_IN: &str = "isLoggedIn";
/// Value holding the application version.
pub const APP_VERSION: &str = "appVersion";

/// Version reported when none has been stored.
pub const DEFAULT_APP_VERSION: &str = "1.0.0";

/// Builds the `users` table schema.
///
/// `id`, `name`, `email`, `createdAt` and `lastLoginAt` are required; every
/// other column has a default.
pub fn users_schema() -> Result<TableSchema> {
    TableSchemaBuilder::new(USERS)?
        .add_column("id", CellType::String)?
        .add_column("name", CellType::String)?
        .add_column("email", CellType::String)?
        .add_column_with_default("age", CellType::Number, 0)?
        .add_column_with_default("avatar", CellType::String, "")?
        .add_column_with_default("role", CellType::String, "user")?
        .add_column_with_default("isActive", CellType::Boolean, true)?
        .add_column("createdAt", CellType::String)?
        .add_column("lastLoginAt", CellType::String)?
        .add_column_with_default("bio", CellType::String, "")?
        .add_column_with_default("location", CellType::String, "")?
        .add_column_with_default("website", CellType::String, "")?
        .build()
}

/// Builds the `userPreferences` table schema.
pub fn user_preferences_schema() -> Result<TableSchema> {
    TableSchemaBuilder::new(USER_PREFERENCES)?
        .add_column("userId", CellType::String)?
        .add_column_with_default("theme", CellType::String, "light")?
        .add_column_with_default("language", CellType::String, "ja")?
        .add_column_with_default("notifications", CellType::Boolean, true)?
        .add_column_with_default("emailUpdates", CellType::Boolean, false)?
        .build()
}

/// Builds the schema of both tables.
pub fn tables_schema() -> Result<TablesSchema> {
    TablesSchema::new()
        .with_table(users_schema()?)?
        .with_table(user_preferences_schema()?)
}

/// Builds the schema of the standalone values.
pub fn values_schema() -> Result<ValuesSchema> {
    Ok(ValuesSchemaBuilder::new()
        .add_value(CURRENT_USER_ID, CellType::String)?
        .add_value_with_default(IS_LOGGED_IN, CellType::Boolean, false)?
        .add_value_with_default(APP_VERSION, CellType::String, DEFAULT_APP_VERSION)?
        .build())
}
