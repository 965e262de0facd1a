use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Order lifecycle. Strictly forward: an order never moves back to an
/// earlier status. Independent of the upload status of its files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Received,
    Reviewing,
    ReadyForPrint,
    SentToPrinter,
    Completed,
}

impl OrderStatus {
    fn position(self) -> u8 {
        match self {
            OrderStatus::Received => 0,
            OrderStatus::Reviewing => 1,
            OrderStatus::ReadyForPrint => 2,
            OrderStatus::SentToPrinter => 3,
            OrderStatus::Completed => 4,
        }
    }

    /// Whether a transition from `self` to `next` is permitted.
    /// Forward moves only; skipping intermediate stages is allowed.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        next.position() > self.position()
    }

    /// Whether new customer uploads are accepted at this stage.
    pub fn accepts_uploads(self) -> bool {
        self == OrderStatus::Received
    }
}

/// A customer print order.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    pub id: Uuid,
    /// Human-readable identifier, `ORD-{year}-{seq:04}`, unique.
    pub order_number: String,
    pub owner_id: Uuid,
    pub description: String,
    pub status: OrderStatus,
    pub received_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub ready_at: Option<DateTime<Utc>>,
    pub sent_to_printer_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new order
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "Description must be between 1 and 5000 characters"
    ))]
    pub description: String,
}

/// Request to advance an order to a later status (staff only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions_forward_only() {
        assert!(OrderStatus::Received.can_transition_to(OrderStatus::Reviewing));
        assert!(OrderStatus::Received.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Reviewing.can_transition_to(OrderStatus::ReadyForPrint));
        assert!(!OrderStatus::Reviewing.can_transition_to(OrderStatus::Received));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::SentToPrinter));
        assert!(!OrderStatus::Received.can_transition_to(OrderStatus::Received));
    }

    #[test]
    fn test_only_received_accepts_uploads() {
        assert!(OrderStatus::Received.accepts_uploads());
        assert!(!OrderStatus::Reviewing.accepts_uploads());
        assert!(!OrderStatus::Completed.accepts_uploads());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&OrderStatus::ReadyForPrint).unwrap();
        assert_eq!(json, "\"READY_FOR_PRINT\"");
        let parsed: OrderStatus = serde_json::from_str("\"SENT_TO_PRINTER\"").unwrap();
        assert_eq!(parsed, OrderStatus::SentToPrinter);
    }
}
