//! Loading signatures and inventories from JSON.
//!
//! These helpers sit at the boundary: the matching core never touches the
//! filesystem. Loading does not validate signatures. The engine decides
//! whether an invalid signature is fatal (the query) or skipped (a
//! candidate).

use super::{InventoryCandidate, Signature};
use crate::error::{ErrorContext, KeyMatchError, Result};
use std::path::Path;

/// Parse a signature from a JSON string.
pub fn parse_signature_str(content: &str) -> Result<Signature> {
    serde_json::from_str::<Signature>(content).context("signature JSON")
}

/// Parse an inventory (a JSON array of `{id, signature}` objects).
pub fn parse_inventory_str(content: &str) -> Result<Vec<InventoryCandidate>> {
    serde_json::from_str::<Vec<InventoryCandidate>>(content).context("inventory JSON")
}

/// Load a signature from a JSON file.
pub fn load_signature(path: &Path) -> Result<Signature> {
    let content = read_file(path)?;
    parse_signature_str(&content).with_context(|| path.display().to_string())
}

/// Load an inventory from a JSON file.
pub fn load_inventory(path: &Path) -> Result<Vec<InventoryCandidate>> {
    let content = read_file(path)?;
    parse_inventory_str(&content).with_context(|| path.display().to_string())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| KeyMatchError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttributeValue;

    #[test]
    fn test_parse_inventory() {
        let json = r#"[
            {"id": "front-door", "signature": {"attributes": {"stamped_code": {"categorical": "KW1"}}}},
            {"id": "garage", "signature": {"attributes": {"stamped_code": {"categorical": "SC4"}}}}
        ]"#;
        let inventory = parse_inventory_str(json).unwrap();
        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory[1].id, "garage");
        assert_eq!(
            inventory[0].signature.attribute("stamped_code"),
            Some(&AttributeValue::label("KW1"))
        );
    }

    #[test]
    fn test_parse_error_has_context() {
        let err = parse_signature_str("{\"attributes\": 3}").unwrap_err();
        match err {
            KeyMatchError::Parse { context, .. } => {
                assert!(context.starts_with("signature JSON"), "{context}");
            }
            other => panic!("Expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_signature(Path::new("/nonexistent/keymatch/query.json")).unwrap_err();
        assert!(matches!(err, KeyMatchError::Io { path: Some(_), .. }));
    }
}
