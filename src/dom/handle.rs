//! A handle to exactly one matched element.

use crate::dom::scalar_to_string;
use crate::dom::selector::Selector;
use crate::error::Result;
use crate::script::{expr, ElementRef, ScriptExecutor, ScriptResult};
use std::sync::Arc;

/// One matched DOM element: an opaque reference plus the indexed selector
/// expression that produced it.
///
/// The selector string has the form `<parentExpression>[<index>]` and is
/// rewritten whenever the owning [`Selector`]'s expression changes identity.
/// Every single-element operation builds a script scoped to that selector and
/// runs it through the injected executor.
#[derive(Clone)]
pub struct ElementHandle {
    executor: Arc<dyn ScriptExecutor>,
    reference: ElementRef,
    selector: String,
    index: usize,
}

impl std::fmt::Debug for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementHandle")
            .field("reference", &self.reference)
            .field("selector", &self.selector)
            .field("index", &self.index)
            .finish()
    }
}

impl ElementHandle {
    /// Wrap one element reference found at `index` within the result set of
    /// `parent_expression`
    pub fn new(
        executor: Arc<dyn ScriptExecutor>,
        parent_expression: &str,
        index: usize,
        reference: ElementRef,
    ) -> Self {
        Self {
            executor,
            reference,
            selector: format!("{}[{}]", parent_expression, index),
            index,
        }
    }

    pub fn reference(&self) -> &ElementRef {
        &self.reference
    }

    /// The indexed selector expression this handle was derived from
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// This handle's position among its siblings at creation time
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn executor(&self) -> Arc<dyn ScriptExecutor> {
        Arc::clone(&self.executor)
    }

    /// Rewritten by the owning set's selector-overwrite pass; keeps handle
    /// selectors consistent with the set they belong to
    pub(crate) fn set_selector(&mut self, selector: String) {
        self.selector = selector;
    }

    fn exec(&self, script: &str) -> Result<ScriptResult> {
        log::debug!("executing script: {}", script);
        self.executor.execute(script)
    }

    /// Get the combined text contents of this element and its descendants
    pub fn text(&self) -> Result<String> {
        let result = self.exec(&format!("return jQuery({}).text()", self.selector))?;
        scalar_to_string(result)
    }

    /// Set the text content of this element. Returns the handle wrapped in a
    /// one-element [`Selector`] so the chain can continue at set level.
    pub fn set_text(&self, text: &str) -> Result<Selector> {
        self.exec(&format!(
            "return jQuery({}).text({})",
            self.selector,
            expr::quote_arg(text)
        ))?;
        Ok(Selector::from_handle(self.clone()))
    }

    /// Get the value of an attribute of this element
    pub fn attr(&self, attribute_name: &str) -> Result<String> {
        let result = self.exec(&format!(
            "return jQuery({}).attr(\"{}\")",
            self.selector, attribute_name
        ))?;
        scalar_to_string(result)
    }

    /// Set an attribute of this element
    pub fn set_attr(&self, attribute_name: &str, new_value: &str) -> Result<()> {
        self.exec(&format!(
            "return jQuery({}).attr(\"{}\",{})",
            self.selector,
            attribute_name,
            expr::quote_arg(new_value)
        ))?;
        Ok(())
    }

    /// Get the computed value of a style property of this element
    pub fn css(&self, css_property: &str) -> Result<String> {
        let result = self.exec(&format!(
            "return jQuery({}).css(\"{}\")",
            self.selector, css_property
        ))?;
        scalar_to_string(result)
    }

    /// Get this element's tag name, lowercased
    pub fn tag_name(&self) -> Result<String> {
        let result = self.exec(&format!("return {}.tagName.toLowerCase()", self.selector))?;
        scalar_to_string(result)
    }

    /// Whether this handle and `other` resolve to the same live element,
    /// per the browser's own equality semantics. Two different selector
    /// expressions can be equal; selector strings are never compared.
    pub fn equals(&self, other: &ElementHandle) -> Result<bool> {
        self.executor.elements_equal(&self.reference, &other.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::MockExecutor;

    fn handle_with_mock(parent: &str, index: usize, id: &str) -> (Arc<MockExecutor>, ElementHandle) {
        let mock = Arc::new(MockExecutor::new());
        let handle = ElementHandle::new(
            mock.clone(),
            parent,
            index,
            ElementRef::new(id),
        );
        (mock, handle)
    }

    #[test]
    fn test_selector_format() {
        let (_, handle) = handle_with_mock("jQuery('div')", 2, "el-2");

        assert_eq!(handle.selector(), "jQuery('div')[2]");
        assert_eq!(handle.index(), 2);
        assert_eq!(handle.reference(), &ElementRef::new("el-2"));
    }

    #[test]
    fn test_text_script_and_result() {
        let (mock, handle) = handle_with_mock("jQuery('body')", 0, "el-0");
        mock.respond(
            "return jQuery(jQuery('body')[0]).text()",
            ScriptResult::scalar("hello"),
        );

        assert_eq!(handle.text().unwrap(), "hello");
        assert_eq!(
            mock.last_script().unwrap(),
            "return jQuery(jQuery('body')[0]).text()"
        );
    }

    #[test]
    fn test_set_text_quotes_literal_and_returns_selector() {
        let (mock, handle) = handle_with_mock("jQuery('body')", 0, "el-0");
        mock.respond(
            "return jQuery(jQuery('body')[0]).text('testString')",
            ScriptResult::indexed_map(["el-0"]),
        );

        let selection = handle.set_text("testString").unwrap();
        assert_eq!(selection.len(), 1);
        assert_eq!(
            mock.last_script().unwrap(),
            "return jQuery(jQuery('body')[0]).text('testString')"
        );
    }

    #[test]
    fn test_attr_scripts() {
        let (mock, handle) = handle_with_mock("jQuery('a')", 1, "el-1");
        mock.respond(
            "return jQuery(jQuery('a')[1]).attr(\"href\")",
            ScriptResult::scalar("/home"),
        );

        assert_eq!(handle.attr("href").unwrap(), "/home");

        mock.respond(
            "return jQuery(jQuery('a')[1]).attr(\"href\",'/away')",
            ScriptResult::indexed_map(["el-1"]),
        );
        handle.set_attr("href", "/away").unwrap();
        assert_eq!(
            mock.last_script().unwrap(),
            "return jQuery(jQuery('a')[1]).attr(\"href\",'/away')"
        );
    }

    #[test]
    fn test_tag_name_script() {
        let (mock, handle) = handle_with_mock("jQuery('ul')", 0, "el-0");
        mock.respond(
            "return jQuery('ul')[0].tagName.toLowerCase()",
            ScriptResult::scalar("ul"),
        );

        assert_eq!(handle.tag_name().unwrap(), "ul");
    }

    #[test]
    fn test_equality_ignores_selector_strings() {
        let mock = Arc::new(MockExecutor::new());
        // Same underlying node reached through two different expressions
        let a = ElementHandle::new(mock.clone(), "jQuery('div')", 0, ElementRef::new("el-0"));
        let b = ElementHandle::new(mock.clone(), "jQuery('.box')", 3, ElementRef::new("el-9"));
        mock.alias(ElementRef::new("el-0"), ElementRef::new("el-9"));

        assert!(a.equals(&b).unwrap());

        let c = ElementHandle::new(mock.clone(), "jQuery('div')", 1, ElementRef::new("el-1"));
        assert!(!a.equals(&c).unwrap());
    }

    #[test]
    fn test_missing_attribute_reads_empty() {
        let (mock, handle) = handle_with_mock("jQuery('p')", 0, "el-0");
        mock.respond(
            "return jQuery(jQuery('p')[0]).attr(\"class\")",
            ScriptResult::Scalar(serde_json::Value::Null),
        );

        assert_eq!(handle.attr("class").unwrap(), "");
    }
}
