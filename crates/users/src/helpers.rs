//! Named operations over the user directory.

use std::rc::Rc;

use tabulon_core::{Result, Row, RowId, TableData, Value};
use tabulon_store::{Store, StoreConfig};
use tracing::debug;

use crate::records::{now_rfc3339, User, UserPreference};
use crate::schema::{
    tables_schema, values_schema, APP_VERSION, CURRENT_USER_ID, DEFAULT_APP_VERSION,
    IS_LOGGED_IN, USERS, USER_PREFERENCES,
};
use crate::seed::{mock_tables, mock_values};

/// Prefix of generated user ids.
pub const USER_ID_PREFIX: &str = "user-";

/// User directory operations backed by a shared [`Store`].
///
/// # Example
///
/// ```
/// use tabulon_core::Row;
/// use tabulon_users::UserStore;
///
/// let users = UserStore::initialize().unwrap();
/// assert_eq!(users.get_active_users().unwrap().len(), 2);
///
/// let id = users
///     .add_user(Row::new().with("name", "New").with("email", "new@example.com"))
///     .unwrap();
/// assert!(users.get_user(&id).unwrap().is_some());
///
/// users.delete_user("user-1").unwrap();
/// assert!(users.get_user_preferences("user-1").unwrap().is_none());
/// ```
#[derive(Clone)]
pub struct UserStore {
    store: Rc<Store>,
}

impl UserStore {
    /// Wraps an existing store. The store must carry the user schema.
    pub fn new(store: Rc<Store>) -> Self {
        Self { store }
    }

    /// Creates a store bound to the user schema and seeded with mock data.
    pub fn initialize() -> Result<Self> {
        Self::initialize_with(StoreConfig::new().row_id_start(1))
    }

    /// Like [`initialize`](Self::initialize), with a custom configuration.
    pub fn initialize_with(config: StoreConfig) -> Result<Self> {
        let store = Store::with_config(config);
        store.set_tables_schema(tables_schema()?)?;
        store.set_values_schema(values_schema()?)?;
        store.set_tables(mock_tables())?;
        store.set_values(mock_values())?;
        debug!(
            users = store.row_count(USERS)?,
            preferences = store.row_count(USER_PREFERENCES)?,
            "seeded user store"
        );
        Ok(Self::new(Rc::new(store)))
    }

    /// Returns the underlying store, for listeners and raw access.
    pub fn store(&self) -> &Rc<Store> {
        &self.store
    }

    /// Returns every user row.
    pub fn get_all_users(&self) -> Result<TableData> {
        self.store.get_table(USERS)
    }

    /// Returns one user row, or `None` if absent.
    pub fn get_user(&self, user_id: &str) -> Result<Option<Row>> {
        self.store.get_row(USERS, user_id)
    }

    /// Returns the users whose `isActive` is true.
    pub fn get_active_users(&self) -> Result<TableData> {
        let mut users = self.get_all_users()?;
        users.retain(|_, row| row.get_bool("isActive") == Some(true));
        Ok(users)
    }

    /// Returns the first preference row, in row id order, for a user.
    pub fn get_user_preferences(&self, user_id: &str) -> Result<Option<Row>> {
        Ok(self
            .store
            .get_table(USER_PREFERENCES)?
            .into_values()
            .find(|row| row.get_str("userId") == Some(user_id)))
    }

    /// Adds a user under a freshly generated id and returns the id.
    ///
    /// `id`, `createdAt` and `lastLoginAt` are stamped over whatever the
    /// caller supplied. `name` and `email` are required.
    pub fn add_user(&self, mut user: Row) -> Result<RowId> {
        let user_id = self.store.generate_row_id(USERS, USER_ID_PREFIX)?;
        let now = now_rfc3339()?;
        user.set("id", user_id.as_str());
        user.set("createdAt", now.as_str());
        user.set("lastLoginAt", now);
        self.store.set_row(USERS, &user_id, user)?;
        debug!(user_id = %user_id, "added user");
        Ok(user_id)
    }

    /// Merges `updates` into an existing user.
    pub fn update_user(&self, user_id: &str, updates: Row) -> Result<()> {
        self.store.set_partial_row(USERS, user_id, updates)
    }

    /// Deletes a user and every preference row that refers to it.
    ///
    /// Runs as one transaction, so each table's listeners fire once.
    pub fn delete_user(&self, user_id: &str) -> Result<()> {
        self.store.transaction(|store| {
            store.del_row(USERS, user_id)?;
            let orphans: Vec<RowId> = store
                .get_table(USER_PREFERENCES)?
                .into_iter()
                .filter(|(_, row)| row.get_str("userId") == Some(user_id))
                .map(|(pref_id, _)| pref_id)
                .collect();
            for pref_id in &orphans {
                store.del_row(USER_PREFERENCES, pref_id)?;
            }
            debug!(user_id, preferences = orphans.len(), "deleted user");
            Ok(())
        })
    }

    /// Returns the signed-in user id, if set.
    pub fn get_current_user_id(&self) -> Result<Option<String>> {
        Ok(self
            .store
            .get_value(CURRENT_USER_ID)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    /// Sets the signed-in user id.
    pub fn set_current_user_id(&self, user_id: &str) -> Result<()> {
        self.store.set_value(CURRENT_USER_ID, user_id)
    }

    /// Returns the login flag; false unless set.
    pub fn get_is_logged_in(&self) -> Result<bool> {
        Ok(self
            .store
            .get_value(IS_LOGGED_IN)?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }

    /// Sets the login flag.
    pub fn set_is_logged_in(&self, is_logged_in: bool) -> Result<()> {
        self.store.set_value(IS_LOGGED_IN, Value::Boolean(is_logged_in))
    }

    /// Returns the application version.
    pub fn get_app_version(&self) -> Result<String> {
        Ok(self
            .store
            .get_value(APP_VERSION)?
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| DEFAULT_APP_VERSION.to_string()))
    }

    /// Returns every user as a typed record.
    pub fn users(&self) -> Result<Vec<User>> {
        self.get_all_users()?.values().map(User::try_from).collect()
    }

    /// Returns every active user as a typed record.
    pub fn active_users(&self) -> Result<Vec<User>> {
        self.get_active_users()?.values().map(User::try_from).collect()
    }

    /// Returns a user's preferences as a typed record.
    pub fn preferences(&self, user_id: &str) -> Result<Option<UserPreference>> {
        self.get_user_preferences(user_id)?
            .as_ref()
            .map(UserPreference::try_from)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tabulon_core::Error;

    #[test]
    fn test_initialize_seeds() {
        let users = UserStore::initialize().unwrap();
        assert_eq!(users.get_all_users().unwrap().len(), 3);
        assert_eq!(users.get_current_user_id().unwrap(), Some("user-1".to_string()));
        assert!(users.get_is_logged_in().unwrap());
        assert_eq!(users.get_app_version().unwrap(), "1.0.0");
    }

    #[test]
    fn test_get_active_users() {
        let users = UserStore::initialize().unwrap();
        let active: Vec<RowId> = users.get_active_users().unwrap().into_keys().collect();
        assert_eq!(active, vec!["user-1".to_string(), "user-2".to_string()]);
    }

    #[test]
    fn test_get_user_preferences() {
        let users = UserStore::initialize().unwrap();
        let pref = users.get_user_preferences("user-2").unwrap().unwrap();
        assert_eq!(pref.get_str("theme"), Some("light"));
        assert_eq!(users.get_user_preferences("user-9").unwrap(), None);
    }

    #[test]
    fn test_add_user_stamps_and_defaults() {
        let users = UserStore::initialize().unwrap();
        let id = users
            .add_user(
                Row::new()
                    .with("id", "ignored")
                    .with("name", "山田")
                    .with("email", "yamada@example.com"),
            )
            .unwrap();
        assert_eq!(id, "user-4");

        let user = User::try_from(&users.get_user(&id).unwrap().unwrap()).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, "user");
        assert!(user.is_active);
        assert_eq!(user.created_at, user.last_login_at);
        assert!(user.created_at().is_ok());
    }

    #[test]
    fn test_add_user_requires_name_and_email() {
        let users = UserStore::initialize().unwrap();
        let err = users.add_user(Row::new().with("name", "No Email")).unwrap_err();
        assert_eq!(err, Error::missing_column(USERS, "email"));
        assert_eq!(users.get_all_users().unwrap().len(), 3);
    }

    #[test]
    fn test_update_user() {
        let users = UserStore::initialize().unwrap();
        users
            .update_user("user-2", Row::new().with("location", "京都府"))
            .unwrap();
        let row = users.get_user("user-2").unwrap().unwrap();
        assert_eq!(row.get_str("location"), Some("京都府"));
        assert_eq!(row.get_str("name"), Some("佐藤花子"));

        assert!(users
            .update_user("user-2", Row::new().with("age", "old"))
            .is_err());
    }

    #[test]
    fn test_delete_user_cascades() {
        let users = UserStore::initialize().unwrap();
        let fired = Rc::new(Cell::new(0));
        let fired_clone = fired.clone();
        users
            .store()
            .add_table_listener(USER_PREFERENCES, move |_| fired_clone.set(fired_clone.get() + 1))
            .unwrap();

        users.delete_user("user-3").unwrap();
        assert!(users.get_user("user-3").unwrap().is_none());
        assert!(users.get_user_preferences("user-3").unwrap().is_none());
        assert_eq!(users.store().row_count(USER_PREFERENCES).unwrap(), 2);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_login_state() {
        let users = UserStore::initialize().unwrap();
        users.set_is_logged_in(false).unwrap();
        users.set_current_user_id("user-2").unwrap();
        assert!(!users.get_is_logged_in().unwrap());
        assert_eq!(users.get_current_user_id().unwrap(), Some("user-2".to_string()));

        users.store().del_value(APP_VERSION).unwrap();
        assert_eq!(users.get_app_version().unwrap(), DEFAULT_APP_VERSION);
    }

    #[test]
    fn test_typed_listings() {
        let users = UserStore::initialize().unwrap();
        assert_eq!(users.users().unwrap().len(), 3);
        let active = users.active_users().unwrap();
        assert!(active.iter().all(|u| u.is_active));
        assert_eq!(users.preferences("user-1").unwrap().unwrap().theme, "dark");
    }
}
