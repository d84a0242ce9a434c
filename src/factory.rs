//! Page-level entry point for initial queries.

use crate::dom::Selector;
use crate::error::Result;
use crate::script::{expr, ScriptExecutor};
use std::sync::Arc;

/// Issues the initial `jQuery(<criteria>)` query against a page and wraps the
/// result in a [`Selector`]. Holds the injected executor so every selection it
/// produces shares the same script-execution sink.
pub struct JQuery {
    executor: Arc<dyn ScriptExecutor>,
}

impl JQuery {
    pub fn new(executor: Arc<dyn ScriptExecutor>) -> Self {
        Self { executor }
    }

    /// Query the page for elements matching `criteria`. The criteria can be
    /// a literal selector (quoted into the script) or an inline script
    /// expression (passed through verbatim).
    pub fn query(&self, criteria: &str) -> Result<Selector> {
        let expression = format!("jQuery({})", expr::quote_arg(criteria));
        let script = format!("return {}", expression);
        log::debug!("executing script: {}", script);

        let result = self.executor.execute(&script)?;
        Selector::from_query(Arc::clone(&self.executor), expression, result)
    }

    /// Alias for [`JQuery::query`]
    pub fn find(&self, criteria: &str) -> Result<Selector> {
        self.query(criteria)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{MockExecutor, ScriptResult};

    #[test]
    fn test_query_builds_quoted_expression() {
        let mock = Arc::new(MockExecutor::new());
        mock.respond(
            "return jQuery('div#jq-primaryNavigation')",
            ScriptResult::indexed_map(["el-0"]),
        );

        let jquery = JQuery::new(mock.clone());
        let sel = jquery.query("div#jq-primaryNavigation").unwrap();

        assert_eq!(sel.expression(), "jQuery('div#jq-primaryNavigation')");
        assert_eq!(sel.len(), 1);
        assert_eq!(
            mock.last_script().unwrap(),
            "return jQuery('div#jq-primaryNavigation')"
        );
    }

    #[test]
    fn test_query_passes_inline_script_through() {
        let mock = Arc::new(MockExecutor::new());
        mock.respond(
            "return jQuery(document.body)",
            ScriptResult::indexed_map(["el-0"]),
        );

        let jquery = JQuery::new(mock.clone());
        let sel = jquery.query("document.body").unwrap();

        assert_eq!(sel.expression(), "jQuery(document.body)");
    }

    #[test]
    fn test_find_is_query_alias() {
        let mock = Arc::new(MockExecutor::new());
        mock.respond(
            "return jQuery('body')",
            ScriptResult::indexed_map(["el-0"]),
        );

        let jquery = JQuery::new(mock.clone());
        assert_eq!(jquery.find("body").unwrap().len(), 1);
    }
}
