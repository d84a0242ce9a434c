//! In-memory script executor for tests.
//!
//! Responses are scripted per exact script string, and every executed script
//! is recorded, so a test can assert both what a selection operation returned
//! and the precise script text it built. No browser involved.

use crate::error::{JQueryError, Result};
use crate::script::{ElementRef, ScriptExecutor, ScriptResult};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
struct MockState {
    responses: HashMap<String, ScriptResult>,
    default_response: Option<ScriptResult>,
    stale: HashSet<ElementRef>,
    aliases: Vec<(ElementRef, ElementRef)>,
    executed: Vec<String>,
}

/// Scriptable [`ScriptExecutor`] double
#[derive(Default)]
pub struct MockExecutor {
    state: Mutex<MockState>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the result for one exact script string
    pub fn respond(&self, script: impl Into<String>, result: ScriptResult) -> &Self {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(script.into(), result);
        self
    }

    /// Fallback result for any script without a dedicated response
    pub fn respond_default(&self, result: ScriptResult) -> &Self {
        self.state.lock().unwrap().default_response = Some(result);
        self
    }

    /// Mark a reference stale: filtered at construction time, fatal in
    /// equality checks
    pub fn mark_stale(&self, element: ElementRef) -> &Self {
        self.state.lock().unwrap().stale.insert(element);
        self
    }

    /// Declare two distinct references equal under browser-side equality
    /// (two selector expressions resolving to the same live node)
    pub fn alias(&self, a: ElementRef, b: ElementRef) -> &Self {
        self.state.lock().unwrap().aliases.push((a, b));
        self
    }

    /// Every script executed so far, in order
    pub fn executed_scripts(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    /// The most recently executed script, if any
    pub fn last_script(&self) -> Option<String> {
        self.state.lock().unwrap().executed.last().cloned()
    }
}

impl ScriptExecutor for MockExecutor {
    fn execute(&self, script: &str) -> Result<ScriptResult> {
        let mut state = self.state.lock().unwrap();
        state.executed.push(script.to_string());

        if let Some(result) = state.responses.get(script) {
            return Ok(result.clone());
        }
        if let Some(result) = &state.default_response {
            return Ok(result.clone());
        }

        Err(JQueryError::ExecutionFailed(format!(
            "no scripted response for `{}`",
            script
        )))
    }

    fn is_stale(&self, element: &ElementRef) -> bool {
        self.state.lock().unwrap().stale.contains(element)
    }

    fn elements_equal(&self, a: &ElementRef, b: &ElementRef) -> Result<bool> {
        let state = self.state.lock().unwrap();

        if state.stale.contains(a) || state.stale.contains(b) {
            return Err(JQueryError::StaleElement(format!(
                "{} or {} is stale",
                a, b
            )));
        }

        if a == b {
            return Ok(true);
        }

        Ok(state
            .aliases
            .iter()
            .any(|(x, y)| (x == a && y == b) || (x == b && y == a)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_response() {
        let mock = MockExecutor::new();
        mock.respond("return 1 + 1;", ScriptResult::scalar(2));

        let result = mock.execute("return 1 + 1;").unwrap();
        assert_eq!(result, ScriptResult::scalar(2));
        assert_eq!(mock.executed_scripts(), vec!["return 1 + 1;"]);
    }

    #[test]
    fn test_unscripted_response_fails() {
        let mock = MockExecutor::new();
        let err = mock.execute("return jQuery('div');").unwrap_err();
        assert!(matches!(err, JQueryError::ExecutionFailed(_)));
        // The failed call is still recorded
        assert_eq!(mock.executed_scripts().len(), 1);
    }

    #[test]
    fn test_default_response() {
        let mock = MockExecutor::new();
        mock.respond_default(ScriptResult::elements(["el-0"]));

        assert_eq!(
            mock.execute("return anything;").unwrap(),
            ScriptResult::elements(["el-0"])
        );
    }

    #[test]
    fn test_staleness_and_equality() {
        let mock = MockExecutor::new();
        let a = ElementRef::new("el-0");
        let b = ElementRef::new("el-1");

        assert!(!mock.is_stale(&a));
        assert!(!mock.elements_equal(&a, &b).unwrap());
        assert!(mock.elements_equal(&a, &a.clone()).unwrap());

        mock.alias(a.clone(), b.clone());
        assert!(mock.elements_equal(&a, &b).unwrap());
        assert!(mock.elements_equal(&b, &a).unwrap());

        mock.mark_stale(b.clone());
        assert!(mock.is_stale(&b));
        assert!(mock.elements_equal(&a, &b).is_err());
    }
}
