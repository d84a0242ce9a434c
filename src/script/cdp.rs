//! Chrome DevTools-backed script executor.
//!
//! DOM nodes cannot cross the CDP JSON boundary directly, so every evaluated
//! expression is wrapped in a marshaling shim that parks matched nodes in a
//! window-scoped registry and returns a JSON envelope describing the result
//! shape. Element references handed back to Rust are keys into that registry;
//! staleness and equality checks resolve through it.

use crate::error::{JQueryError, Result};
use crate::script::{ElementRef, ScriptExecutor, ScriptResult};
use headless_chrome::Tab;
use indexmap::IndexMap;
use serde::Deserialize;
use std::sync::Arc;

/// Name of the page-side registry object holding captured nodes
const REGISTRY: &str = "window.__jqRemote";

/// JSON envelope produced by the marshaling shim
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Envelope {
    Scalar {
        value: serde_json::Value,
    },
    Element {
        id: String,
    },
    List {
        ids: Vec<String>,
    },
    Map {
        length: usize,
        entries: IndexMap<String, String>,
    },
}

/// [`ScriptExecutor`] over a `headless_chrome` tab
pub struct CdpExecutor {
    tab: Arc<Tab>,
}

impl CdpExecutor {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    /// Whether the page has a `jQuery` global to run selector expressions
    /// against. Useful as a precondition check before the first query.
    pub fn has_jquery(&self) -> Result<bool> {
        match self.execute("return typeof window.jQuery === 'function';")? {
            ScriptResult::Scalar(value) => Ok(value.as_bool().unwrap_or(false)),
            other => Err(JQueryError::UnexpectedResult(format!(
                "expected boolean scalar, got {:?}",
                other
            ))),
        }
    }

    /// Wrap a `return <expr>` statement in the marshaling shim
    fn marshal(script: &str) -> String {
        format!(
            r#"(function() {{
    var reg = {registry} = {registry} || {{ seq: 0, refs: {{}} }};
    var keep = function(el) {{
        var id = "el-" + reg.seq++;
        reg.refs[id] = el;
        return id;
    }};
    var value = (function() {{ {script} }})();
    if (value === null || value === undefined) {{
        return JSON.stringify({{ kind: "scalar", value: null }});
    }}
    if (value.nodeType === 1) {{
        return JSON.stringify({{ kind: "element", id: keep(value) }});
    }}
    if (typeof value.jquery === "string") {{
        var entries = {{}};
        for (var i = 0; i < value.length; i++) {{
            entries[String(i)] = keep(value[i]);
        }}
        return JSON.stringify({{ kind: "map", length: value.length, entries: entries }});
    }}
    if (Array.isArray(value) || value instanceof NodeList) {{
        var ids = [];
        for (var j = 0; j < value.length; j++) {{
            ids.push(keep(value[j]));
        }}
        return JSON.stringify({{ kind: "list", ids: ids }});
    }}
    return JSON.stringify({{ kind: "scalar", value: value }});
}})()"#,
            registry = REGISTRY,
            script = script
        )
    }

    fn evaluate_envelope(&self, script: &str) -> Result<Envelope> {
        let wrapped = Self::marshal(script);

        let remote = self
            .tab
            .evaluate(&wrapped, false)
            .map_err(|e| JQueryError::ExecutionFailed(e.to_string()))?;

        let value = remote.value.ok_or_else(|| {
            JQueryError::ExecutionFailed("no value returned from script evaluation".to_string())
        })?;

        // The shim returns a JSON string, not a JSON object
        let json: String = serde_json::from_value(value)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl ScriptExecutor for CdpExecutor {
    fn execute(&self, script: &str) -> Result<ScriptResult> {
        log::debug!("executing script: {}", script);

        let result = match self.evaluate_envelope(script)? {
            Envelope::Scalar { value } => ScriptResult::Scalar(value),
            Envelope::Element { id } => ScriptResult::Element(ElementRef::new(id)),
            Envelope::List { ids } => {
                ScriptResult::Elements(ids.into_iter().map(ElementRef::new).collect())
            }
            Envelope::Map { length, entries } => ScriptResult::IndexedMap {
                length,
                entries: entries
                    .into_iter()
                    .map(|(key, id)| (key, ElementRef::new(id)))
                    .collect(),
            },
        };

        log::trace!("script result: {:?}", result);
        Ok(result)
    }

    fn is_stale(&self, element: &ElementRef) -> bool {
        let script = format!(
            "return !{registry} || !{registry}.refs[\"{id}\"] \
             || !document.contains({registry}.refs[\"{id}\"]);",
            registry = REGISTRY,
            id = element.id()
        );

        match self.execute(&script) {
            Ok(ScriptResult::Scalar(value)) => value.as_bool().unwrap_or(true),
            // A reference we cannot even ask about is as good as gone
            _ => true,
        }
    }

    fn elements_equal(&self, a: &ElementRef, b: &ElementRef) -> Result<bool> {
        let script = format!(
            "return (function() {{ \
                 var reg = {registry} && {registry}.refs; \
                 if (!reg) return null; \
                 var a = reg[\"{a}\"], b = reg[\"{b}\"]; \
                 if (!a || !b) return null; \
                 return a === b; \
             }})();",
            registry = REGISTRY,
            a = a.id(),
            b = b.id()
        );

        match self.execute(&script)? {
            ScriptResult::Scalar(serde_json::Value::Bool(equal)) => Ok(equal),
            ScriptResult::Scalar(serde_json::Value::Null) => Err(JQueryError::StaleElement(
                format!("{} or {} no longer registered", a, b),
            )),
            other => Err(JQueryError::UnexpectedResult(format!(
                "expected boolean scalar from equality check, got {:?}",
                other
            ))),
        }
    }
}
