//! # jquery-remote
//!
//! jQuery-style DOM querying and manipulation for remote-controlled browsers.
//!
//! A [`Selector`] represents zero or more matched DOM elements and exposes
//! chainable, jQuery-compatible operations (traversal, mutation,
//! attribute/text/style access). Each call is translated into a snippet of
//! injected script, executed in the live page by a [`ScriptExecutor`], and
//! the response re-hydrated into a new selection. Selector semantics are
//! delegated to the browser-resident jQuery library; this crate builds the
//! expressions and converts the results.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use headless_chrome::Browser;
//! use jquery_remote::{CdpExecutor, JQuery};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let browser = Browser::default()?;
//! let tab = browser.new_tab()?;
//! tab.navigate_to("https://example.com")?;
//! tab.wait_until_navigated()?;
//!
//! let jquery = JQuery::new(Arc::new(CdpExecutor::new(tab)));
//! let nav = jquery.query("div#jq-primaryNavigation")?;
//! for item in nav.children()?.iter() {
//!     println!("{}", item.text()?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing without a browser
//!
//! The executor is injected at construction, never referenced as a global,
//! so tests can drive the whole API against [`MockExecutor`]:
//!
//! ```rust
//! use jquery_remote::{JQuery, MockExecutor, ScriptResult};
//! use std::sync::Arc;
//!
//! let mock = Arc::new(MockExecutor::new());
//! mock.respond("return jQuery('li')", ScriptResult::indexed_map(["el-0"]));
//!
//! let sel = JQuery::new(mock.clone()).query("li").unwrap();
//! assert_eq!(sel.len(), 1);
//! ```
//!
//! ## Module overview
//!
//! - [`dom`]: the selector set ([`Selector`]) and element handle
//!   ([`ElementHandle`]) value types
//! - [`script`]: the execution-service contract ([`ScriptExecutor`],
//!   [`ScriptResult`]), the CDP-backed executor, argument quoting, and the
//!   mock executor for tests
//! - [`factory`]: the page-level [`JQuery`] entry point
//! - [`error`]: error types and the crate [`Result`] alias

pub mod dom;
pub mod error;
pub mod factory;
pub mod script;

pub use dom::{ElementHandle, Selector};
pub use error::{JQueryError, Result};
pub use factory::JQuery;
pub use script::{CdpExecutor, ElementRef, MockExecutor, ScriptExecutor, ScriptResult};
