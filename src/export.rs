// Author: Dustin Pilgrim
// License: MIT

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::LtxError;

/// Current snapshot schema version.
///
/// Bumped on any change to the serialized shape of [`Document`]; readers
/// reject every other version, so stale cache entries invalidate instead of
/// misloading.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    document: &'a Document,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    document: Document,
}

/// Serialize a document to a versioned JSON snapshot.
///
/// The snapshot carries the whole section graph, inter-section parent
/// links included, so a deserialized document answers every query exactly
/// like the original.
pub fn to_json(document: &Document) -> Result<String, LtxError> {
    let snapshot = SnapshotRef {
        version: SNAPSHOT_VERSION,
        document,
    };

    serde_json::to_string_pretty(&snapshot).map_err(|e| LtxError::Snapshot {
        message: format!("Failed to serialize document: {}", e),
        hint: None,
        code: Some(501),
    })
}

/// Deserialize a snapshot produced by [`to_json`], rejecting corrupt input
/// and schema version mismatches.
pub fn from_json(text: &str) -> Result<Document, LtxError> {
    let snapshot: Snapshot = serde_json::from_str(text).map_err(|e| LtxError::Snapshot {
        message: format!("Failed to read snapshot: {}", e),
        hint: Some("The snapshot may be corrupt".into()),
        code: Some(501),
    })?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(LtxError::Snapshot {
            message: format!(
                "Snapshot schema version {} does not match expected {}",
                snapshot.version, SNAPSHOT_VERSION
            ),
            hint: Some("Re-parse the source file to refresh the snapshot".into()),
            code: Some(502),
        });
    }

    Ok(snapshot.document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;

    const SAMPLE: &str = "\
[base]\n\
hp = 100\n\
drops = a, b\n\
[elite]:base\n\
hp = 250\n";

    #[test]
    fn test_round_trip_preserves_queries() {
        let doc = Document::from_str(SAMPLE).expect("Failed to parse sample");
        let json = to_json(&doc).expect("Failed to serialize");
        let restored = from_json(&json).expect("Failed to deserialize");

        let names: Vec<&str> = doc.section_names().collect();
        assert_eq!(names, restored.section_names().collect::<Vec<&str>>());

        for name in names {
            let before = doc.section(name).unwrap();
            let after = restored.section(name).unwrap();

            assert_eq!(before.get_all(&doc), after.get_all(&restored));
            for key in ["hp", "drops", "nonexistent"] {
                assert_eq!(before.get(&doc, key), after.get(&restored, key));
                assert_eq!(before.has(&doc, key), after.has(&restored, key));
            }
        }
    }

    #[test]
    fn test_round_trip_keeps_parent_links() {
        let doc = Document::from_str(SAMPLE).unwrap();
        let restored = from_json(&to_json(&doc).unwrap()).unwrap();

        let elite = restored.section("elite").unwrap();
        assert_eq!(elite.parent_names(&restored), vec!["base"]);
        assert_eq!(elite.get(&restored, "drops"), Value::List(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn test_version_mismatch_is_rejected() {
        let doc = Document::from_str(SAMPLE).unwrap();
        let json = to_json(&doc).unwrap();
        let stale = json.replace(
            &format!("\"version\": {}", SNAPSHOT_VERSION),
            &format!("\"version\": {}", SNAPSHOT_VERSION + 1),
        );

        match from_json(&stale) {
            Err(LtxError::Snapshot { code: Some(502), .. }) => {}
            other => panic!("Expected version mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_snapshot_is_rejected() {
        assert!(matches!(
            from_json("{ not json"),
            Err(LtxError::Snapshot { code: Some(501), .. })
        ));
    }
}
