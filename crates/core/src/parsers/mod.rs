pub mod devtools;

use crate::model::Capture;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("react devtools: {0}")]
    Devtools(#[from] devtools::DevtoolsParseError),
    #[error("unable to detect format: expected a React DevTools profiler export")]
    UnknownFormat,
}

/// Detect and parse a profiler capture.
///
/// Any JSON object that carries `dataForRoots` is treated as a React
/// DevTools export; other JSON objects are rejected up front so the user
/// gets a clearer message than a missing-field error. Malformed JSON is
/// reported by the DevTools parser itself.
pub fn parse_capture(data: &[u8]) -> Result<Capture, ParseError> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data)
        && value
            .as_object()
            .is_some_and(|obj| !obj.contains_key("dataForRoots"))
    {
        return Err(ParseError::UnknownFormat);
    }
    Ok(devtools::parse_devtools_export(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_devtools_export() {
        let capture = parse_capture(br#"{"dataForRoots": [{"snapshots": []}]}"#).unwrap();
        assert_eq!(capture.data_for_roots.len(), 1);
    }

    #[test]
    fn rejects_other_json_objects() {
        let err = parse_capture(br#"{"traceEvents": []}"#).unwrap_err();
        assert!(matches!(err, ParseError::UnknownFormat));
    }

    #[test]
    fn malformed_json_is_a_devtools_error() {
        let err = parse_capture(b"[1, 2").unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }
}
