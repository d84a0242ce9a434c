//! The chainable selector set.

use crate::dom::handle::ElementHandle;
use crate::dom::scalar_to_string;
use crate::error::{JQueryError, Result};
use crate::script::{expr, ElementRef, ScriptExecutor, ScriptResult};
use std::sync::Arc;

/// An ordered, possibly-empty group of matched elements sharing an
/// accumulated selector expression.
///
/// Every operation builds a script from the current expression plus an
/// operation-specific suffix, runs it through the injected executor, and
/// converts the result back into a scalar, a fresh `Selector`, or a
/// replacement handle collection. One operation, one blocking round trip.
pub struct Selector {
    executor: Arc<dyn ScriptExecutor>,
    expression: String,
    handles: Vec<ElementHandle>,
    cursor: usize,
}

impl std::fmt::Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selector")
            .field("expression", &self.expression)
            .field("handles", &self.handles)
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl Selector {
    /// Build a selection from a selector expression plus the element
    /// references the initial query produced. References that are already
    /// stale are silently skipped; the count shrinks accordingly.
    pub fn new(
        executor: Arc<dyn ScriptExecutor>,
        expression: impl Into<String>,
        references: Vec<ElementRef>,
    ) -> Self {
        let expression = expression.into();
        let handles = Self::build_handles(&executor, &expression, references);
        Self {
            executor,
            expression,
            handles,
            cursor: 0,
        }
    }

    /// Build a selection directly from a script result produced by
    /// evaluating `expression`
    pub fn from_query(
        executor: Arc<dyn ScriptExecutor>,
        expression: impl Into<String>,
        result: ScriptResult,
    ) -> Result<Self> {
        let references = Self::result_to_references(result)?;
        Ok(Self::new(executor, expression, references))
    }

    /// Wrap a single pre-existing handle into a one-element selection.
    ///
    /// An indexed handle selector (`...[i]`) denotes a raw DOM node, so the
    /// set expression re-wraps it in `jQuery(..)`; anything else is already a
    /// set-level expression and is used as-is.
    pub fn from_handle(handle: ElementHandle) -> Self {
        let expression = if handle.selector().ends_with(']') {
            format!("jQuery({})", handle.selector())
        } else {
            handle.selector().to_string()
        };
        Self {
            executor: handle.executor(),
            expression,
            handles: vec![handle],
            cursor: 0,
        }
    }

    fn build_handles(
        executor: &Arc<dyn ScriptExecutor>,
        expression: &str,
        references: Vec<ElementRef>,
    ) -> Vec<ElementHandle> {
        let mut handles = Vec::with_capacity(references.len());
        for (index, reference) in references.into_iter().enumerate() {
            if executor.is_stale(&reference) {
                log::trace!("dropping stale reference {} at index {}", reference, index);
                continue;
            }
            handles.push(ElementHandle::new(
                Arc::clone(executor),
                expression,
                index,
                reference,
            ));
        }
        handles
    }

    /// Run `return <expression><suffix>` through the executor
    fn exec(&self, suffix: &str) -> Result<ScriptResult> {
        let script = format!("return {}{}", self.expression, suffix);
        log::debug!("executing script: {}", script);
        self.executor.execute(&script)
    }

    /// Normalize an element-bearing result into an ordered reference list.
    /// Accepts the index-keyed map form, the native collection form, and a
    /// single element; a scalar here means the operation built a script the
    /// page answered with the wrong shape.
    fn result_to_references(result: ScriptResult) -> Result<Vec<ElementRef>> {
        match result {
            ScriptResult::Element(reference) => Ok(vec![reference]),
            ScriptResult::Elements(references) => Ok(references),
            ScriptResult::IndexedMap { length, entries } => {
                let mut references = Vec::with_capacity(length);
                for i in 0..length {
                    let key = i.to_string();
                    let reference = entries.get(&key).ok_or_else(|| {
                        JQueryError::UnexpectedResult(format!(
                            "indexed map of length {} missing entry \"{}\"",
                            length, key
                        ))
                    })?;
                    references.push(reference.clone());
                }
                Ok(references)
            }
            ScriptResult::Scalar(value) => Err(JQueryError::UnexpectedResult(format!(
                "expected element collection, got scalar {}",
                value
            ))),
        }
    }

    /// Atomically replace the whole handle collection from a script result,
    /// keeping the current expression
    fn replace_handles(&mut self, result: ScriptResult) -> Result<()> {
        let references = Self::result_to_references(result)?;
        self.handles = Self::build_handles(&self.executor, &self.expression, references);
        Ok(())
    }

    /// Traversal: run the suffix and wrap the result in a NEW selection whose
    /// expression is the old one with the suffix appended
    fn derive(&self, suffix: &str) -> Result<Selector> {
        let result = self.exec(suffix)?;
        let references = Self::result_to_references(result)?;
        Ok(Selector::new(
            Arc::clone(&self.executor),
            format!("{}{}", self.expression, suffix),
            references,
        ))
    }

    /// The accumulated selector expression
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The live members, in the browser's DOM-order result
    pub fn handles(&self) -> &[ElementHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// True iff the selection matched no elements
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Return the handle at the manual-iteration cursor and advance it.
    /// Fails hard past the end; the cursor advances regardless.
    pub fn get(&mut self) -> Result<ElementHandle> {
        let index = self.cursor;
        self.cursor += 1;
        self.handles
            .get(index)
            .cloned()
            .ok_or(JQueryError::IndexOutOfRange {
                index,
                len: self.handles.len(),
            })
    }

    /// Return the handle at `index`, or `None` when out of range.
    ///
    /// Deliberately asymmetric with [`Selector::get`], which fails hard:
    /// both behaviors exist in the contract this implements.
    pub fn get_at(&self, index: usize) -> Option<ElementHandle> {
        self.handles.get(index).cloned()
    }

    /// Stateless, restartable iteration in collection order; does not touch
    /// the manual cursor
    pub fn iter(&self) -> std::slice::Iter<'_, ElementHandle> {
        self.handles.iter()
    }

    // ---- traversals ---------------------------------------------------

    /// Get the parent of each element in the selection
    pub fn parent(&self) -> Result<Selector> {
        self.derive(".parent()")
    }

    /// Get the children of each element in the selection
    pub fn children(&self) -> Result<Selector> {
        self.derive(".children()")
    }

    /// Get the children of each element, filtered by a selector
    pub fn children_filtered(&self, selector: &str) -> Result<Selector> {
        self.derive(&format!(".children({})", expr::quote_arg(selector)))
    }

    /// Get the descendants of each element, filtered by a selector.
    /// Source: <http://api.jquery.com/find/>
    pub fn find(&self, selector: &str) -> Result<Selector> {
        self.derive(&format!(".find({})", expr::quote_arg(selector)))
    }

    /// Get the immediately following sibling of each element
    pub fn next(&self) -> Result<Selector> {
        self.derive(".next()")
    }

    /// Get the immediately following sibling of each element when it matches
    /// the provided selector
    pub fn next_filtered(&self, selector: &str) -> Result<Selector> {
        self.derive(&format!(".next({})", expr::quote_arg(selector)))
    }

    /// Get all following siblings of each element
    pub fn next_all(&self) -> Result<Selector> {
        self.derive(".nextAll()")
    }

    /// Get the immediately preceding sibling of each element
    pub fn prev(&self) -> Result<Selector> {
        self.derive(".prev()")
    }

    /// Get the immediately preceding sibling of each element when it matches
    /// the provided selector
    pub fn prev_filtered(&self, selector: &str) -> Result<Selector> {
        self.derive(&format!(".prev({})", expr::quote_arg(selector)))
    }

    /// Get all preceding siblings of each element
    pub fn prev_all(&self) -> Result<Selector> {
        self.derive(".prevAll()")
    }

    /// Add the previous set of elements on the stack to the current set
    pub fn and_self(&self) -> Result<Selector> {
        self.derive(".andSelf()")
    }

    /// Reduce the selection to its first element by re-querying the browser,
    /// not by slicing the local cache
    pub fn first(&self) -> Result<ElementHandle> {
        let references = Self::result_to_references(self.exec(".first()")?)?;
        let reference = references
            .into_iter()
            .next()
            .ok_or(JQueryError::IndexOutOfRange { index: 0, len: 0 })?;
        Ok(ElementHandle::new(
            Arc::clone(&self.executor),
            &self.expression,
            0,
            reference,
        ))
    }

    /// Reduce the selection to its final element by re-querying the browser.
    /// The handle's index is `len - 1` of the pre-query selection.
    pub fn last(&self) -> Result<ElementHandle> {
        let index = self
            .handles
            .len()
            .checked_sub(1)
            .ok_or(JQueryError::IndexOutOfRange { index: 0, len: 0 })?;
        let references = Self::result_to_references(self.exec(".last()")?)?;
        let reference = references
            .into_iter()
            .next()
            .ok_or(JQueryError::IndexOutOfRange { index: 0, len: 0 })?;
        Ok(ElementHandle::new(
            Arc::clone(&self.executor),
            &self.expression,
            index,
            reference,
        ))
    }

    // ---- identity-changing mutation -----------------------------------

    /// Add elements matched by a selector, element expression, or HTML
    /// fragment to the selection. Appends `.add(...)` to the identity
    /// expression and rewrites every handle's stored selector to match, so
    /// subsequent single-element operations reference the combined set.
    /// Source: <http://api.jquery.com/add/>
    pub fn add(&mut self, selector_elements_html: &str) -> Result<&mut Self> {
        let suffix = format!(".add({})", expr::quote_arg(selector_elements_html));
        self.add_with_suffix(&suffix)
    }

    /// `add` with an explicit context expression at which the selector
    /// begins matching
    pub fn add_with_context(&mut self, selector: &str, context: &str) -> Result<&mut Self> {
        let suffix = format!(".add('{}',{})", selector, context);
        self.add_with_suffix(&suffix)
    }

    fn add_with_suffix(&mut self, suffix: &str) -> Result<&mut Self> {
        let result = self.exec(suffix)?;
        let new_expression = format!("{}{}", self.expression, suffix);
        self.replace_handles(result)?;
        self.overwrite_selectors(new_expression);
        Ok(self)
    }

    /// Rewrite the set's identity expression and every handle's stored
    /// selector (with its `[i]` suffix) to stay consistent with it
    pub fn overwrite_selectors(&mut self, expression: impl Into<String>) {
        self.expression = expression.into();
        for (i, handle) in self.handles.iter_mut().enumerate() {
            handle.set_selector(format!("{}[{}]", self.expression, i));
        }
    }

    // ---- in-place mutation --------------------------------------------

    /// Add the specified class(es), or the result of an inline function, to
    /// each element. Source: <http://api.jquery.com/addClass/>
    pub fn add_class(&mut self, class_name_or_function: &str) -> Result<&mut Self> {
        self.exec(&format!(
            ".addClass({})",
            expr::quote_arg(class_name_or_function)
        ))?;
        Ok(self)
    }

    /// Insert content after each element in the selection.
    /// Source: <http://api.jquery.com/after/>
    pub fn after<S: AsRef<str>>(&mut self, contents: &[S]) -> Result<&mut Self> {
        let result = self.exec(&format!(".after({})", expr::join_args(contents)))?;
        self.replace_handles(result)?;
        Ok(self)
    }

    /// Insert content at the end of each element in the selection.
    /// Source: <http://api.jquery.com/append/>
    pub fn append<S: AsRef<str>>(&mut self, contents: &[S]) -> Result<&mut Self> {
        let result = self.exec(&format!(".append({})", expr::join_args(contents)))?;
        self.replace_handles(result)?;
        Ok(self)
    }

    /// Insert every element in the selection at the end of the target.
    /// Source: <http://api.jquery.com/appendTo/>
    pub fn append_to(&mut self, target: &str) -> Result<&mut Self> {
        self.exec(&format!(".appendTo({})", expr::quote_arg(target)))?;
        Ok(self)
    }

    /// Insert content before each element in the selection.
    /// Source: <http://api.jquery.com/before/>
    pub fn before<S: AsRef<str>>(&mut self, contents: &[S]) -> Result<&mut Self> {
        let result = self.exec(&format!(".before({})", expr::join_args(contents)))?;
        self.replace_handles(result)?;
        Ok(self)
    }

    /// Set an attribute on every element in the selection.
    /// Source: <http://api.jquery.com/attr/#attr2>
    pub fn set_attr(&mut self, attribute_name: &str, new_value: &str) -> Result<&mut Self> {
        self.exec(&format!(
            ".attr(\"{}\",{})",
            attribute_name,
            expr::quote_arg(new_value)
        ))?;
        Ok(self)
    }

    /// Set a CSS property on every element in the selection.
    /// Source: <http://api.jquery.com/css/#css2>
    pub fn set_css(&mut self, css_property: &str, new_value: &str) -> Result<&mut Self> {
        self.exec(&format!(
            ".css(\"{}\",{})",
            css_property,
            expr::quote_arg(new_value)
        ))?;
        Ok(self)
    }

    /// Set the HTML contents of each element in the selection.
    /// Source: <http://api.jquery.com/html/#html2>
    pub fn set_html(&mut self, html_string: &str) -> Result<&mut Self> {
        let result = self.exec(&format!(".html('{}')", html_string))?;
        self.replace_handles(result)?;
        Ok(self)
    }

    /// Set the text content of each element in the selection.
    /// Source: <http://api.jquery.com/text/#text2>
    pub fn set_text(&mut self, text_or_function: &str) -> Result<&mut Self> {
        let result = self.exec(&format!(".text({})", expr::quote_arg(text_or_function)))?;
        self.replace_handles(result)?;
        Ok(self)
    }

    /// Set the value of each element in the selection.
    /// Source: <http://api.jquery.com/val/#val2>
    pub fn set_val(&mut self, value: &str) -> Result<&mut Self> {
        let result = self.exec(&format!(".val('{}')", value))?;
        self.replace_handles(result)?;
        Ok(self)
    }

    /// Trigger the click event on every element in the selection
    pub fn click(&self) -> Result<()> {
        self.exec(".click()")?;
        Ok(())
    }

    /// Remove the selection from the DOM.
    /// Source: <http://api.jquery.com/remove/>
    pub fn remove(&self) -> Result<()> {
        self.exec(".remove()")?;
        Ok(())
    }

    /// Remove the elements of the selection matching a filter selector
    pub fn remove_filtered(&self, selector: &str) -> Result<()> {
        self.exec(&format!(".remove('{}')", selector))?;
        Ok(())
    }

    /// Remove ALL classes from each element in the selection.
    /// Source: <http://api.jquery.com/removeClass/>
    pub fn remove_class(&self) -> Result<()> {
        self.exec(".removeClass()")?;
        Ok(())
    }

    /// Remove one or more space-separated classes from each element
    pub fn remove_class_named(&self, class_name: &str) -> Result<()> {
        self.exec(&format!(".removeClass('{}')", class_name))?;
        Ok(())
    }

    // ---- scalar accessors ---------------------------------------------

    /// Get an attribute of the FIRST element in the selection.
    /// Fails out-of-range on an empty selection.
    /// Source: <http://api.jquery.com/attr/#attr1>
    pub fn attr(&self, attribute_name: &str) -> Result<String> {
        self.handles
            .first()
            .ok_or(JQueryError::IndexOutOfRange { index: 0, len: 0 })?
            .attr(attribute_name)
    }

    /// Get a style property of the FIRST element in the selection.
    /// Source: <http://api.jquery.com/css/#css1>
    pub fn css(&self, css_property: &str) -> Result<String> {
        self.handles
            .first()
            .ok_or(JQueryError::IndexOutOfRange { index: 0, len: 0 })?
            .css(css_property)
    }

    /// Get the HTML contents of the first element in the selection.
    /// Source: <http://api.jquery.com/html/#html1>
    pub fn html(&self) -> Result<String> {
        scalar_to_string(self.exec(".html()")?)
    }

    /// Get the combined text contents of each element in the selection,
    /// including descendants. Source: <http://api.jquery.com/text/#text1>
    pub fn text(&self) -> Result<String> {
        scalar_to_string(self.exec(".text()")?)
    }

    /// Get the current value of the first element in the selection.
    /// Source: <http://api.jquery.com/val/#val1>
    pub fn val(&self) -> Result<String> {
        scalar_to_string(self.exec(".val()")?)
    }

    // ---- predicates and diagnostics -----------------------------------

    /// Whether ANY element's class attribute contains `class_name`. This is
    /// a substring check, not a whitespace-aware token match.
    /// Source: <http://api.jquery.com/hasClass/>
    pub fn has_class(&self, class_name: &str) -> Result<bool> {
        for handle in &self.handles {
            if handle.attr("class")?.contains(class_name) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Positional pairwise equality against another selection. Any unequal
    /// pair, missing comparand position, or failed equality check yields
    /// `false`; this never errors. Reordered-but-equal sets are NOT equal.
    pub fn has_same_elements_of(&self, comparer: &Selector) -> bool {
        for (i, handle) in self.handles.iter().enumerate() {
            let Some(other) = comparer.handles.get(i) else {
                return false;
            };
            match handle.equals(other) {
                Ok(true) => {}
                _ => return false,
            }
        }
        true
    }

    /// Diagnostic dump: one `<tagName>: <text>` line per handle, in order
    pub fn summary(&self) -> Result<String> {
        let mut result = String::new();
        for handle in &self.handles {
            result.push_str(&handle.tag_name()?);
            result.push_str(": ");
            result.push_str(&handle.text()?);
            result.push('\n');
        }
        Ok(result)
    }
}

impl<'a> IntoIterator for &'a Selector {
    type Item = &'a ElementHandle;
    type IntoIter = std::slice::Iter<'a, ElementHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
