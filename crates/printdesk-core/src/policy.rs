//! Access policy guard
//!
//! Pure decision functions: no side effects, no I/O. Every boundary
//! operation asks this module before touching storage or the database.
//!
//! Rules:
//! - order read: owner or staff
//! - order status change: staff only
//! - customer-file reserve: owner only
//! - customer-file confirm/download: owner or staff
//! - processed-file reserve/confirm/download: staff only, including against
//!   the customer's own order

use crate::models::{FileKind, Order, Principal};

/// Whether the principal may view an order and its visible files.
pub fn can_read_order(principal: &Principal, order: &Order) -> bool {
    principal.is_staff() || principal.id == order.owner_id
}

/// Whether the principal may advance an order's status.
pub fn can_update_order_status(principal: &Principal) -> bool {
    principal.is_staff()
}

/// Whether the principal may reserve an upload slot of the given kind.
pub fn can_reserve_file(principal: &Principal, order: &Order, kind: FileKind) -> bool {
    match kind {
        FileKind::Customer => principal.id == order.owner_id,
        FileKind::Processed => principal.is_staff(),
    }
}

/// Whether the principal may confirm an upload of the given kind.
pub fn can_confirm_file(principal: &Principal, order: &Order, kind: FileKind) -> bool {
    match kind {
        FileKind::Customer => principal.id == order.owner_id || principal.is_staff(),
        FileKind::Processed => principal.is_staff(),
    }
}

/// Whether the principal may obtain download links for files of the given kind.
pub fn can_download_files(principal: &Principal, order: &Order, kind: FileKind) -> bool {
    match kind {
        FileKind::Customer => principal.id == order.owner_id || principal.is_staff(),
        FileKind::Processed => principal.is_staff(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderStatus, Role};
    use chrono::Utc;
    use uuid::Uuid;

    fn order_owned_by(owner_id: Uuid) -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            order_number: "ORD-2026-0001".to_string(),
            owner_id,
            description: "two hinged brackets".to_string(),
            status: OrderStatus::Received,
            received_at: now,
            reviewed_at: None,
            ready_at: None,
            sent_to_printer_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn customer() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            role: Role::Customer,
        }
    }

    fn staff() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            role: Role::Staff,
        }
    }

    #[test]
    fn test_order_read() {
        let owner = customer();
        let order = order_owned_by(owner.id);
        assert!(can_read_order(&owner, &order));
        assert!(can_read_order(&staff(), &order));
        assert!(!can_read_order(&customer(), &order));
    }

    #[test]
    fn test_status_change_is_staff_only() {
        let owner = customer();
        assert!(!can_update_order_status(&owner));
        assert!(can_update_order_status(&staff()));
    }

    #[test]
    fn test_customer_file_reserve_is_owner_only() {
        let owner = customer();
        let order = order_owned_by(owner.id);
        assert!(can_reserve_file(&owner, &order, FileKind::Customer));
        // Staff do not upload on the customer's behalf.
        assert!(!can_reserve_file(&staff(), &order, FileKind::Customer));
        assert!(!can_reserve_file(&customer(), &order, FileKind::Customer));
    }

    #[test]
    fn test_processed_file_operations_are_staff_only() {
        let owner = customer();
        let order = order_owned_by(owner.id);
        // Even the order's owner is denied processed-file access.
        assert!(!can_reserve_file(&owner, &order, FileKind::Processed));
        assert!(!can_confirm_file(&owner, &order, FileKind::Processed));
        assert!(!can_download_files(&owner, &order, FileKind::Processed));
        assert!(can_reserve_file(&staff(), &order, FileKind::Processed));
        assert!(can_confirm_file(&staff(), &order, FileKind::Processed));
        assert!(can_download_files(&staff(), &order, FileKind::Processed));
    }

    #[test]
    fn test_customer_file_confirm_allows_owner_or_staff() {
        let owner = customer();
        let order = order_owned_by(owner.id);
        assert!(can_confirm_file(&owner, &order, FileKind::Customer));
        assert!(can_confirm_file(&staff(), &order, FileKind::Customer));
        assert!(!can_confirm_file(&customer(), &order, FileKind::Customer));
    }

    #[test]
    fn test_customer_file_download_allows_owner_or_staff() {
        let owner = customer();
        let order = order_owned_by(owner.id);
        assert!(can_download_files(&owner, &order, FileKind::Customer));
        assert!(can_download_files(&staff(), &order, FileKind::Customer));
        assert!(!can_download_files(&customer(), &order, FileKind::Customer));
    }
}
