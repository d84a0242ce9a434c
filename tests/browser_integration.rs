//! End-to-end tests against a real headless Chrome.
//!
//! The pages are self-contained `data:` URLs carrying a tiny jQuery-subset
//! shim, so the tests need no network access — only a Chrome install.
//! Run with: cargo test -- --ignored

use headless_chrome::Browser;
use jquery_remote::{CdpExecutor, JQuery, Selector};
use std::sync::Arc;

/// Minimal jQuery-compatible shim covering the operations exercised below
const JQUERY_SHIM: &str = r#"<script>
(function() {
  function J(els) {
    this.length = els.length;
    for (var i = 0; i < els.length; i++) this[i] = els[i];
    this.jquery = 'shim';
  }
  J.prototype.text = function(v) {
    if (v === undefined) {
      var out = '';
      for (var i = 0; i < this.length; i++) out += this[i].textContent;
      return out;
    }
    for (var i = 0; i < this.length; i++) this[i].textContent = v;
    return this;
  };
  J.prototype.children = function() {
    var out = [];
    for (var i = 0; i < this.length; i++)
      out = out.concat(Array.prototype.slice.call(this[i].children));
    return new J(out);
  };
  J.prototype.first = function() { return new J(this.length ? [this[0]] : []); };
  J.prototype.last = function() { return new J(this.length ? [this[this.length - 1]] : []); };
  J.prototype.attr = function(n, v) {
    if (v === undefined) return this.length ? this[0].getAttribute(n) : null;
    for (var i = 0; i < this.length; i++) this[i].setAttribute(n, v);
    return this;
  };
  J.prototype.addClass = function(c) {
    for (var i = 0; i < this.length; i++)
      this[i].className += (this[i].className ? ' ' : '') + c;
    return this;
  };
  J.prototype.removeClass = function(c) {
    for (var i = 0; i < this.length; i++) {
      if (c === undefined) { this[i].className = ''; continue; }
      this[i].className = this[i].className.split(' ')
        .filter(function(x) { return x !== c; }).join(' ');
    }
    return this;
  };
  window.jQuery = window.$ = function(arg) {
    if (typeof arg === 'string')
      return new J(Array.prototype.slice.call(document.querySelectorAll(arg)));
    if (arg && arg.nodeType === 1) return new J([arg]);
    if (arg instanceof J) return arg;
    return new J([]);
  };
})();
</script>"#;

fn open_page(body: &str) -> (Browser, JQuery) {
    let _ = env_logger::builder().is_test(true).try_init();

    let browser = Browser::default().expect("Failed to launch browser");
    let tab = browser.new_tab().expect("Failed to create tab");

    let url = format!("data:text/html,<html><head>{}</head><body>{}</body></html>", JQUERY_SHIM, body);
    tab.navigate_to(&url).expect("Failed to navigate");
    tab.wait_until_navigated().expect("Navigation timeout");

    let jquery = JQuery::new(Arc::new(CdpExecutor::new(tab)));
    (browser, jquery)
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_query_and_traversal() {
    let (_browser, jquery) = open_page("<ul id='nav'><li>one</li><li>two</li></ul>");

    let list = jquery.query("ul").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list.text().unwrap(), "onetwo");

    let items = list.children().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items.expression(), "jQuery('ul').children()");
    assert_eq!(items.summary().unwrap(), "li: one\nli: two\n");
}

#[test]
#[ignore]
fn test_set_text_roundtrip() {
    let (_browser, jquery) = open_page("<p id='msg'>old</p>");

    let result = jquery
        .find("p")
        .unwrap()
        .get()
        .unwrap()
        .set_text("testString")
        .unwrap();

    assert_eq!(result.text().unwrap(), "testString");
}

#[test]
#[ignore]
fn test_remove_class_clears_everything() {
    let (_browser, jquery) = open_page("<div class='jq-clearfix randomClass'>x</div>");

    let sel = jquery.find(".jq-clearfix").unwrap();
    assert!(sel.has_class("jq-clearfix").unwrap());
    assert!(sel.has_class("randomClass").unwrap());

    sel.remove_class().unwrap();

    assert!(!sel.has_class("jq-clearfix").unwrap());
    assert!(!sel.has_class("randomClass").unwrap());
}

#[test]
#[ignore]
fn test_children_equal_independent_query() {
    let (_browser, jquery) = open_page("<div id='box'><ul><li>a</li></ul></div>");

    let container = jquery.query("div").unwrap();
    let children = container.children().unwrap();
    let expected = Selector::from_handle(jquery.query("ul").unwrap().first().unwrap());

    assert!(children.has_same_elements_of(&expected));
}

#[test]
#[ignore]
fn test_stale_filtering_after_removal() {
    let (_browser, jquery) = open_page("<span class='gone'>x</span><span>y</span>");

    // Detach the first span, then re-query: the initial selection's
    // references remain usable only where the nodes still exist
    jquery.find(".gone").unwrap().remove().unwrap();

    let spans = jquery.query("span").unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans.text().unwrap(), "y");
}
