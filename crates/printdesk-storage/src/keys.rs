//! Storage key derivation.
//!
//! Key format: `{uploads|processed}/{principal_id}/{millis}-{filename}`.

use printdesk_core::models::FileKind;
use uuid::Uuid;

/// Derive the object-store key for a new upload reservation.
///
/// Deterministic given identical inputs plus the millisecond timestamp, so
/// repeated uploads of the same filename do not collide. The timestamp is a
/// best-effort uniqueness guarantee; the database unique constraint on the
/// key is the backstop.
pub fn derive_key(principal_id: Uuid, file_name: &str, kind: FileKind) -> String {
    let prefix = match kind {
        FileKind::Customer => "uploads",
        FileKind::Processed => "processed",
    };
    let millis = chrono::Utc::now().timestamp_millis();
    format!(
        "{}/{}/{}-{}",
        prefix,
        principal_id,
        millis,
        sanitize_file_name(file_name)
    )
}

/// Replace every character outside `[A-Za-z0-9.-]` with `_` so the
/// untrusted client filename is safe to embed in a key.
fn sanitize_file_name(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_safe_characters() {
        assert_eq!(sanitize_file_name("model-v2.stl"), "model-v2.stl");
        assert_eq!(sanitize_file_name("My File (1).stl"), "My_File__1_.stl");
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_file_name("däta.stl"), "d_ta.stl");
    }

    #[test]
    fn test_key_is_namespaced_by_kind() {
        let principal = Uuid::new_v4();
        let customer_key = derive_key(principal, "model.stl", FileKind::Customer);
        let processed_key = derive_key(principal, "model.stl", FileKind::Processed);
        assert!(customer_key.starts_with(&format!("uploads/{}/", principal)));
        assert!(processed_key.starts_with(&format!("processed/{}/", principal)));
    }

    #[test]
    fn test_different_file_names_produce_different_keys() {
        let principal = Uuid::new_v4();
        let a = derive_key(principal, "a.stl", FileKind::Customer);
        let b = derive_key(principal, "b.stl", FileKind::Customer);
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_inputs_at_different_instants_produce_different_keys() {
        let principal = Uuid::new_v4();
        let first = derive_key(principal, "model.stl", FileKind::Customer);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = derive_key(principal, "model.stl", FileKind::Customer);
        assert_ne!(first, second);
    }
}
