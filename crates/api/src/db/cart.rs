//! Cart repository for database operations.
//!
//! Cart rows are unique per (user, product); adding an already-carted
//! product replaces the stored quantity rather than stacking a second row.

use sqlx::PgPool;

use orchard_core::{CartEntryId, ProductId, UserId};

use super::RepositoryError;
use super::products::{PRODUCT_COLUMNS, ProductRow};
use crate::models::CartItem;

/// Internal row type for cart queries, joined with product columns.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    entry_id: i32,
    quantity: i32,
    #[sqlx(flatten)]
    product: ProductRow,
}

impl From<CartRow> for CartItem {
    fn from(row: CartRow) -> Self {
        Self {
            id: CartEntryId::new(row.entry_id),
            quantity: row.quantity,
            product: row.product.into(),
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's cart, joined with product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let columns = product_columns_qualified();
        let rows = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT c.id AS entry_id, c.quantity, {columns} \
             FROM cart c \
             JOIN products p ON p.id = c.product_id \
             WHERE c.user_id = $1 \
             ORDER BY c.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add a product to a user's cart, or update its quantity if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn upsert(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartEntryId, RepositoryError> {
        let (id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO cart (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = EXCLUDED.quantity
            RETURNING id
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(CartEntryId::new(id))
    }

    /// Remove a cart entry owned by the given user.
    ///
    /// Returns `true` if an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove(
        &self,
        entry_id: CartEntryId,
        user_id: UserId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// `PRODUCT_COLUMNS` with each column qualified by the `p` table alias.
pub(crate) fn product_columns_qualified() -> String {
    PRODUCT_COLUMNS
        .split(", ")
        .map(|col| format!("p.{}", col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_columns_qualified() {
        let columns = product_columns_qualified();
        assert!(columns.starts_with("p.id, p.name"));
        assert!(columns.ends_with("p.created_at"));
        assert!(!columns.contains("p.p."));
    }
}
