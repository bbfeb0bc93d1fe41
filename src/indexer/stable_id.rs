use blake3::Hasher;

/// Number of distinct numeric suffixes a node id can take.
pub const NODE_ID_SPACE: u64 = 10_000;

/// Compute the display id of a method node.
///
/// The id is derived only from the enclosing type name and the member name,
/// so it survives line moves, reformatting and process restarts:
///
/// `FN:` + (first 8 bytes of `blake3("{type}.{member}")` as little-endian
/// `u64`) mod 10000.
///
/// Overloads share an id. Distinct members can collide; the id space is
/// deliberately small so that ids stay short in the compiled context.
pub fn method_node_id(type_name: &str, member_name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(type_name.as_bytes());
    hasher.update(b".");
    hasher.update(member_name.as_bytes());
    let hash = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&hash.as_bytes()[..8]);
    format!("FN:{}", u64::from_le_bytes(head) % NODE_ID_SPACE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_deterministic() {
        let id1 = method_node_id("OrderService", "PlaceOrder");
        let id2 = method_node_id("OrderService", "PlaceOrder");
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_node_id_format() {
        let id = method_node_id("OrderService", "PlaceOrder");
        let suffix = id.strip_prefix("FN:").expect("FN prefix");
        let value: u64 = suffix.parse().expect("numeric suffix");
        assert!(value < NODE_ID_SPACE);
    }

    #[test]
    fn test_node_id_depends_on_type_and_member() {
        let base = method_node_id("OrderService", "PlaceOrder");
        assert_ne!(base, method_node_id("OrderRepository", "PlaceOrder"));
        assert_ne!(base, method_node_id("OrderService", "CancelOrder"));
    }

    #[test]
    fn test_separator_is_part_of_key() {
        // "A.BC" and "AB.C" hash different inputs.
        assert_ne!(method_node_id("A", "BC"), method_node_id("AB", "C"));
    }
}
