//! Wishlist repository for database operations.

use sqlx::PgPool;

use orchard_core::{ProductId, UserId, WishlistEntryId};

use super::RepositoryError;
use super::cart::product_columns_qualified;
use super::products::ProductRow;
use crate::models::WishlistItem;

/// Internal row type for wishlist queries, joined with product columns.
#[derive(Debug, sqlx::FromRow)]
struct WishlistRow {
    entry_id: i32,
    #[sqlx(flatten)]
    product: ProductRow,
}

impl From<WishlistRow> for WishlistItem {
    fn from(row: WishlistRow) -> Self {
        Self {
            id: WishlistEntryId::new(row.entry_id),
            product: row.product.into(),
        }
    }
}

/// Repository for wishlist database operations.
pub struct WishlistRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WishlistRepository<'a> {
    /// Create a new wishlist repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's wishlist, joined with product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<WishlistItem>, RepositoryError> {
        let columns = product_columns_qualified();
        let rows = sqlx::query_as::<_, WishlistRow>(&format!(
            "SELECT w.id AS entry_id, {columns} \
             FROM wishlist w \
             JOIN products p ON p.id = w.product_id \
             WHERE w.user_id = $1 \
             ORDER BY w.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add a product to a user's wishlist. Adding a product that is already
    /// wishlisted is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(&self, user_id: UserId, product_id: ProductId) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO wishlist (user_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, product_id) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Remove a wishlist entry owned by the given user.
    ///
    /// Returns `true` if an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove(
        &self,
        entry_id: WishlistEntryId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM wishlist WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
