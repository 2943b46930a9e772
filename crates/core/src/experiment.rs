//! Deterministic A/B group assignment.

use crate::types::AbGroup;

/// Maps a session ID to an experiment group.
///
/// The mapping is stable across process restarts and across hosts: the hash
/// is a plain polynomial fold (`h = h * 31 + byte`) over the UTF-8 bytes of
/// the session ID with wrapping `u64` arithmetic, so no process-seeded
/// hasher state is involved. Bucket 0 maps to `control`, bucket 1 to
/// `variant`.
///
/// Callers must special-case the empty session ID; this function is only
/// defined over non-empty strings (it still returns a group for `""`, but
/// the fallback policy at call sites takes precedence).
pub fn assign(session_id: &str) -> AbGroup {
    let hash = session_id
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
    if hash % 2 == 0 {
        AbGroup::Control
    } else {
        AbGroup::Variant
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_is_deterministic() {
        for session in ["abc123", "session-xyz", "こんにちは", "a"] {
            let first = assign(session);
            for _ in 0..100 {
                assert_eq!(assign(session), first, "group flipped for {session}");
            }
        }
    }

    #[test]
    fn test_known_bucket_values() {
        // h("a") = 97 → odd → variant; h("b") = 98 → even → control.
        assert_eq!(assign("a"), AbGroup::Variant);
        assert_eq!(assign("b"), AbGroup::Control);
    }

    #[test]
    fn test_both_groups_are_reachable() {
        let groups: std::collections::HashSet<_> =
            (0..64).map(|i| assign(&format!("session-{i}"))).collect();
        assert_eq!(groups.len(), 2);
    }
}
