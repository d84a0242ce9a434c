//! Script execution contract
//!
//! Every operation in this crate boils down to one injected-script round trip:
//! a selector expression is turned into a `return <expr>` script, handed to a
//! [`ScriptExecutor`], and the [`ScriptResult`] is re-hydrated into handles or
//! a scalar. The executor is dependency-injected (`Arc<dyn ScriptExecutor>`)
//! into every selector set and element handle, so tests can run against the
//! in-memory [`mock::MockExecutor`] while production code uses the
//! CDP-backed [`cdp::CdpExecutor`].

pub mod cdp;
pub mod expr;
pub mod mock;

pub use cdp::CdpExecutor;
pub use mock::MockExecutor;

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Opaque reference to one live DOM node.
///
/// Valid only while the node remains in the document; the executor decides
/// what the inner id means (for the CDP executor it is a key into a
/// page-side registry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef(String);

impl ElementRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a browser-side script evaluation can hand back
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptResult {
    /// String / number / boolean / null
    Scalar(serde_json::Value),

    /// One opaque element reference
    Element(ElementRef),

    /// Native ordered collection of element references
    Elements(Vec<ElementRef>),

    /// Array-like mapping keyed by numeric index strings (`"0".."length-1"`)
    /// plus a `length` field, the shape a jQuery object marshals to
    IndexedMap {
        length: usize,
        entries: IndexMap<String, ElementRef>,
    },
}

impl ScriptResult {
    /// Scalar convenience constructor used throughout the tests
    pub fn scalar(value: impl Into<serde_json::Value>) -> Self {
        Self::Scalar(value.into())
    }

    /// Build an `Elements` result from plain string ids
    pub fn elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Elements(ids.into_iter().map(ElementRef::new).collect())
    }

    /// Build an `IndexedMap` result from plain string ids, keyed `"0"..`
    pub fn indexed_map<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: IndexMap<String, ElementRef> = ids
            .into_iter()
            .enumerate()
            .map(|(i, id)| (i.to_string(), ElementRef::new(id)))
            .collect();
        Self::IndexedMap {
            length: entries.len(),
            entries,
        }
    }
}

/// The remote-browser capability that runs injected script and reports back.
///
/// Implementations are expected to be synchronous and blocking: one call, one
/// round trip. Timeouts, retries, and connection-level concerns live behind
/// this trait, not in front of it.
pub trait ScriptExecutor {
    /// Execute a script statement (`return <expression>`) in the live page
    fn execute(&self, script: &str) -> Result<ScriptResult>;

    /// Whether a previously captured reference still points at a node in the
    /// document. Used to filter references at selection-construction time.
    fn is_stale(&self, element: &ElementRef) -> bool;

    /// The browser's own equality semantics on two element references.
    /// Fails with [`crate::JQueryError::StaleElement`] when either side no
    /// longer resolves.
    fn elements_equal(&self, a: &ElementRef, b: &ElementRef) -> Result<bool>;
}
