//! User repository.

use book_bazaar_core::{Email, OrderStatus, Role};
use chrono::Utc;
use rust_decimal::Decimal;

use crate::models::{Address, NewUser, OrderItem, OrderSnapshot, User};

use super::{RepositoryError, Store};

/// Repository for user accounts, keyed by email.
pub struct UserRepository<'a> {
    store: &'a Store,
}

impl<'a> UserRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Conflict`] if the email is already taken.
    pub async fn create(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.store.users.write().await;
        if users.contains_key(&new_user.email) {
            return Err(RepositoryError::Conflict);
        }
        let user = User {
            email: new_user.email.clone(),
            name: new_user.name,
            password_hash: new_user.password_hash,
            role: new_user.role,
            addresses: Vec::new(),
            orders: Vec::new(),
            created_at: Utc::now(),
        };
        users.insert(new_user.email, user.clone());
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &Email) -> Option<User> {
        self.store.users.read().await.get(email).cloned()
    }

    /// Fetch a user or fail.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no account has this email.
    pub async fn get(&self, email: &Email) -> Result<User, RepositoryError> {
        self.find_by_email(email)
            .await
            .ok_or(RepositoryError::NotFound)
    }

    /// All accounts, ordered by email.
    pub async fn list(&self) -> Vec<User> {
        self.store.users.read().await.values().cloned().collect()
    }

    /// Accounts with a given role, ordered by email.
    pub async fn list_by_role(&self, role: Role) -> Vec<User> {
        self.store
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect()
    }

    /// Update the display name.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no account has this email.
    pub async fn update_name(&self, email: &Email, name: String) -> Result<(), RepositoryError> {
        let mut users = self.store.users.write().await;
        let user = users.get_mut(email).ok_or(RepositoryError::NotFound)?;
        user.name = name;
        Ok(())
    }

    /// Append a shipping address.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no account has this email.
    pub async fn add_address(
        &self,
        email: &Email,
        address: Address,
    ) -> Result<(), RepositoryError> {
        let mut users = self.store.users.write().await;
        let user = users.get_mut(email).ok_or(RepositoryError::NotFound)?;
        user.addresses.push(address);
        Ok(())
    }

    /// Remove the address at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the account or index is
    /// missing.
    pub async fn remove_address(&self, email: &Email, index: usize) -> Result<(), RepositoryError> {
        let mut users = self.store.users.write().await;
        let user = users.get_mut(email).ok_or(RepositoryError::NotFound)?;
        if index >= user.addresses.len() {
            return Err(RepositoryError::NotFound);
        }
        user.addresses.remove(index);
        Ok(())
    }

    /// Prepend a buyer-side order snapshot (newest first).
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no account has this email.
    pub async fn push_order_snapshot(
        &self,
        email: &Email,
        snapshot: OrderSnapshot,
    ) -> Result<(), RepositoryError> {
        let mut users = self.store.users.write().await;
        let user = users.get_mut(email).ok_or(RepositoryError::NotFound)?;
        user.orders.insert(0, snapshot);
        Ok(())
    }

    /// Write a status change through to the buyer's snapshot part that
    /// matches `order_record_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the buyer or the matching
    /// snapshot part is missing.
    pub async fn sync_snapshot_status(
        &self,
        buyer_email: &Email,
        order_record_id: &str,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        let mut users = self.store.users.write().await;
        let user = users
            .get_mut(buyer_email)
            .ok_or(RepositoryError::NotFound)?;
        let part = user
            .orders
            .iter_mut()
            .flat_map(|o| o.parts.iter_mut())
            .find(|p| p.order_record_id.as_str() == order_record_id)
            .ok_or(RepositoryError::NotFound)?;
        part.status = status;
        Ok(())
    }

    /// Write an item-level change through to the buyer's snapshot part that
    /// matches `order_record_id`, replacing its items and total.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the buyer or the matching
    /// snapshot part is missing.
    pub async fn sync_snapshot_items(
        &self,
        buyer_email: &Email,
        order_record_id: &str,
        items: Vec<OrderItem>,
        total: Decimal,
    ) -> Result<(), RepositoryError> {
        let mut users = self.store.users.write().await;
        let user = users
            .get_mut(buyer_email)
            .ok_or(RepositoryError::NotFound)?;
        let part = user
            .orders
            .iter_mut()
            .flat_map(|o| o.parts.iter_mut())
            .find(|p| p.order_record_id.as_str() == order_record_id)
            .ok_or(RepositoryError::NotFound)?;
        part.items = items;
        part.total = total;
        Ok(())
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no account has this email.
    pub async fn delete(&self, email: &Email) -> Result<(), RepositoryError> {
        self.store
            .users
            .write()
            .await
            .remove(email)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    pub async fn count(&self) -> usize {
        self.store.users.read().await.len()
    }
}
