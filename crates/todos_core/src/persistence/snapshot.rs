//! JSON snapshot codec.
//!
//! Wire shape: `[{"id": <number>, "text": <string>}, ...]` in list order.

use super::{SnapshotError, SnapshotResult};
use crate::model::item::Item;

/// Serializes the full list as compact JSON.
pub fn encode_snapshot(items: &[Item]) -> SnapshotResult<String> {
    serde_json::to_string(items).map_err(SnapshotError::Encode)
}

/// Parses a stored snapshot. Unknown record fields are ignored.
pub fn decode_snapshot(raw: &str) -> SnapshotResult<Vec<Item>> {
    serde_json::from_str(raw).map_err(SnapshotError::Decode)
}

#[cfg(test)]
mod tests {
    use super::{decode_snapshot, encode_snapshot};
    use crate::model::item::Item;
    use crate::persistence::SnapshotError;

    #[test]
    fn encodes_compact_array_of_id_text_records() {
        let json = encode_snapshot(&[Item::new(1_700_000_000_000, "buy milk")]).unwrap();
        assert_eq!(json, r#"[{"id":1700000000000,"text":"buy milk"}]"#);
    }

    #[test]
    fn decode_ignores_unknown_fields() {
        let items = decode_snapshot(r#"[{"id":3,"text":"x","done":true}]"#).unwrap();
        assert_eq!(items, vec![Item::new(3, "x")]);
    }

    #[test]
    fn decode_rejects_non_array_payload() {
        let err = decode_snapshot(r#"{"id":3}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
    }
}
