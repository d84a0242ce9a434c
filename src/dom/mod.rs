//! Selector sets and element handles
//!
//! The two value types a caller works with:
//! - [`Selector`]: an ordered, possibly-empty group of matched elements and
//!   every chainable jQuery-equivalent operation on it
//! - [`ElementHandle`]: exactly one matched element and its single-element
//!   operations

pub mod handle;
pub mod selector;

pub use handle::ElementHandle;
pub use selector::Selector;

use crate::error::Result;
use crate::script::ScriptResult;

/// Render a scalar script result the way the browser would stringify it:
/// strings pass through, null becomes empty, everything else via JSON.
pub(crate) fn scalar_to_string(result: ScriptResult) -> Result<String> {
    match result {
        ScriptResult::Scalar(serde_json::Value::String(s)) => Ok(s),
        ScriptResult::Scalar(serde_json::Value::Null) => Ok(String::new()),
        ScriptResult::Scalar(value) => Ok(value.to_string()),
        other => Err(crate::error::JQueryError::UnexpectedResult(format!(
            "expected scalar, got {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_to_string() {
        assert_eq!(
            scalar_to_string(ScriptResult::scalar("text")).unwrap(),
            "text"
        );
        assert_eq!(
            scalar_to_string(ScriptResult::Scalar(serde_json::Value::Null)).unwrap(),
            ""
        );
        assert_eq!(scalar_to_string(ScriptResult::scalar(42)).unwrap(), "42");
    }

    #[test]
    fn test_scalar_to_string_rejects_elements() {
        let err = scalar_to_string(ScriptResult::elements(["el-0"])).unwrap_err();
        assert!(matches!(err, crate::JQueryError::UnexpectedResult(_)));
    }
}
