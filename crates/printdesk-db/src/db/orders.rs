use chrono::{Datelike, Utc};
use printdesk_core::models::{Order, OrderStatus};
use printdesk_core::AppError;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Bounded retry for order-number generation. The unique constraint on
/// `order_number` is the actual correctness guarantee; generation from the
/// persisted maximum is best-effort and can lose a race.
const ORDER_NUMBER_MAX_ATTEMPTS: u32 = 3;

const ORDER_COLUMNS: &str = "id, order_number, owner_id, description, status, \
     received_at, reviewed_at, ready_at, sent_to_printer_at, completed_at, \
     created_at, updated_at";

/// Repository for customer print orders
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new order with a freshly generated order number.
    ///
    /// Two concurrent creations can derive the same number; the unique
    /// constraint rejects the loser, which re-derives and retries up to
    /// `ORDER_NUMBER_MAX_ATTEMPTS` times.
    pub async fn create(&self, owner_id: Uuid, description: &str) -> Result<Order, AppError> {
        for attempt in 1..=ORDER_NUMBER_MAX_ATTEMPTS {
            let order_number = self.next_order_number().await?;

            let result = sqlx::query_as::<_, Order>(&format!(
                r#"
                INSERT INTO orders (order_number, owner_id, description, status)
                VALUES ($1, $2, $3, 'received')
                RETURNING {}
                "#,
                ORDER_COLUMNS
            ))
            .bind(&order_number)
            .bind(owner_id)
            .bind(description)
            .fetch_one(&self.pool)
            .await;

            match result {
                Ok(order) => {
                    tracing::info!(
                        order_id = %order.id,
                        order_number = %order.order_number,
                        "Order created"
                    );
                    return Ok(order);
                }
                Err(sqlx::Error::Database(db_err))
                    if db_err.is_unique_violation()
                        && db_err.constraint() == Some("orders_order_number_key") =>
                {
                    tracing::warn!(
                        order_number = %order_number,
                        attempt = attempt,
                        "Order number collision, retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal(format!(
            "Failed to allocate a unique order number after {} attempts",
            ORDER_NUMBER_MAX_ATTEMPTS
        )))
    }

    /// Next order number for the current year, from the persisted maximum.
    async fn next_order_number(&self) -> Result<String, AppError> {
        let year = Utc::now().year();
        let prefix = format!("ORD-{}-", year);

        let latest: Option<String> = sqlx::query(
            r#"
            SELECT order_number FROM orders
            WHERE order_number LIKE $1
            ORDER BY order_number DESC
            LIMIT 1
            "#,
        )
        .bind(format!("{}%", prefix))
        .fetch_optional(&self.pool)
        .await?
        .map(|row| row.get("order_number"));

        let seq = next_sequence(latest.as_deref(), &prefix);
        Ok(format_order_number(year, seq))
    }

    /// Get an order by ID
    pub async fn get(&self, order_id: Uuid) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {} FROM orders WHERE id = $1",
            ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// List orders, newest first. `owner_id = None` lists every order
    /// (staff view); `status` optionally filters.
    pub async fn list(
        &self,
        owner_id: Option<Uuid>,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {} FROM orders
            WHERE ($1::uuid IS NULL OR owner_id = $1)
              AND ($2::order_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
            ORDER_COLUMNS
        ))
        .bind(owner_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Advance an order to a later status, stamping the matching timestamp
    /// column. Transition validity is checked by the caller against the
    /// loaded order.
    pub async fn update_status(
        &self,
        order_id: Uuid,
        status: OrderStatus,
    ) -> Result<Order, AppError> {
        let timestamp_column = match status {
            OrderStatus::Received => "received_at",
            OrderStatus::Reviewing => "reviewed_at",
            OrderStatus::ReadyForPrint => "ready_at",
            OrderStatus::SentToPrinter => "sent_to_printer_at",
            OrderStatus::Completed => "completed_at",
        };

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET status = $2, {} = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            timestamp_column, ORDER_COLUMNS
        ))
        .bind(order_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }
}

/// Format an order number: `ORD-{year}-{seq:04}`.
fn format_order_number(year: i32, seq: u32) -> String {
    format!("ORD-{}-{:04}", year, seq)
}

/// Compute the next sequence from the highest persisted number for the
/// year's prefix. Unparseable or absent values restart at 1.
fn next_sequence(latest: Option<&str>, prefix: &str) -> u32 {
    latest
        .and_then(|number| number.strip_prefix(prefix))
        .and_then(|tail| tail.parse::<u32>().ok())
        .map(|seq| seq + 1)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_order_number_pads_to_four_digits() {
        assert_eq!(format_order_number(2026, 1), "ORD-2026-0001");
        assert_eq!(format_order_number(2026, 42), "ORD-2026-0042");
        assert_eq!(format_order_number(2026, 12345), "ORD-2026-12345");
    }

    #[test]
    fn test_next_sequence_from_latest() {
        assert_eq!(next_sequence(Some("ORD-2026-0007"), "ORD-2026-"), 8);
        assert_eq!(next_sequence(Some("ORD-2026-0999"), "ORD-2026-"), 1000);
    }

    #[test]
    fn test_next_sequence_starts_at_one() {
        // No orders yet this year: the prefix change resets the sequence.
        assert_eq!(next_sequence(None, "ORD-2026-"), 1);
    }

    #[test]
    fn test_next_sequence_ignores_garbage() {
        assert_eq!(next_sequence(Some("ORD-2026-xyz"), "ORD-2026-"), 1);
        assert_eq!(next_sequence(Some("ORD-2025-0009"), "ORD-2026-"), 1);
    }
}
