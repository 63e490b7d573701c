use thiserror::Error;

use crate::model::Capture;

#[derive(Debug, Error)]
pub enum DevtoolsParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("export has no profiler roots (dataForRoots is empty)")]
    MissingRoot,
}

/// Parse a React DevTools profiler export.
///
/// Only the shape is checked here: an export must carry at least one root.
/// Optional timeline data is left as-is for the aggregator to default.
pub fn parse_devtools_export(data: &[u8]) -> Result<Capture, DevtoolsParseError> {
    let capture: Capture = serde_json::from_slice(data)?;
    if capture.data_for_roots.is_empty() {
        return Err(DevtoolsParseError::MissingRoot);
    }
    Ok(capture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_export() {
        let json = r#"{
            "version": 5,
            "dataForRoots": [{
                "displayName": "App",
                "rootID": 1,
                "snapshots": [
                    [1, {"id": 1, "children": [2], "displayName": "App", "type": 5}],
                    [2, {"id": 2, "children": [], "displayName": "Button"}]
                ],
                "commitData": [{
                    "duration": 5.0,
                    "effectDuration": null,
                    "timestamp": 100.0,
                    "fiberActualDurations": [[1, 5.0]],
                    "changeDescriptions": [[2, {"isFirstMount": true}]]
                }]
            }]
        }"#;

        let capture = parse_devtools_export(json.as_bytes()).unwrap();
        let root = capture.root().unwrap();
        assert_eq!(root.snapshots.len(), 2);
        assert_eq!(root.commit_data.len(), 1);
        assert_eq!(root.commit_data[0].effect_duration, None);
        assert!(capture.timeline().is_none());
    }

    #[test]
    fn parse_timeline_data() {
        let json = r#"{
            "dataForRoots": [{"snapshots": [], "commitData": []}],
            "timelineData": [{
                "duration": 42.5,
                "componentMeasures": [
                    {"componentName": "List", "duration": 1.5, "timestamp": 3.0, "type": "render", "warning": null}
                ],
                "schedulingEvents": [
                    {"componentName": "List", "type": "schedule-state-update", "timestamp": 2.0, "lanes": [4]}
                ]
            }]
        }"#;

        let capture = parse_devtools_export(json.as_bytes()).unwrap();
        let timeline = capture.timeline().unwrap();
        assert_eq!(timeline.duration, Some(42.5));
        assert_eq!(timeline.component_measures.as_ref().map(Vec::len), Some(1));
        let events = timeline.scheduling_events.as_deref().unwrap_or_default();
        assert_eq!(events[0].component_name.as_deref(), Some("List"));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_devtools_export(b"{ not json").unwrap_err();
        assert!(matches!(err, DevtoolsParseError::Json(_)));
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn rejects_empty_roots() {
        let err = parse_devtools_export(br#"{"dataForRoots": []}"#).unwrap_err();
        assert!(matches!(err, DevtoolsParseError::MissingRoot));
    }

    #[test]
    fn rejects_missing_roots_field() {
        let err = parse_devtools_export(br#"{"version": 5}"#).unwrap_err();
        assert!(matches!(err, DevtoolsParseError::Json(_)));
    }
}
