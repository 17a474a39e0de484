//! Widget resolver
//!
//! A [`WidgetResolver`] accumulates attribute filters and predicate functions
//! and resolves them against the tree rooted at (or above) its base node.
//! Traversals never mutate the tree.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use probe_platform::{describe_widget, same_widget, PropValue, WidgetRef};
use tracing::trace;

use crate::error::{Direction, ResolveError, Result};

/// A boolean test over a candidate node
pub type Predicate = Arc<dyn Fn(&WidgetRef) -> bool + Send + Sync>;

/// Extra filters supplied to a traversal
///
/// ```ignore
/// let button = resolver.down(Filter::new().attr("name", "ok").pred(|w| w.type_name() == "Button"))?;
/// ```
#[derive(Clone, Default)]
pub struct Filter {
    attrs: IndexMap<String, PropValue>,
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `name` to equal `value`
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Require `predicate` to hold
    pub fn pred<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&WidgetRef) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(predicate));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty() && self.predicates.is_empty()
    }

    fn extend(&mut self, other: Filter) {
        self.attrs.extend(other.attrs);
        self.predicates.extend(other.predicates);
    }

    /// All predicates hold and every attribute is present and equal
    fn check(&self, widget: &WidgetRef) -> bool {
        if !self.predicates.iter().all(|p| p(widget)) {
            return false;
        }
        self.attrs
            .iter()
            .all(|(name, expected)| widget.property(name).as_ref() == Some(expected))
    }

    fn describe_attrs(&self) -> String {
        let pairs: Vec<String> = self
            .attrs
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("attrs", &self.attrs)
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

/// Query over the widget tree bound to a base node
///
/// The tree is assumed to be a DAG; a node that is its own parent is an
/// ascent boundary.
#[derive(Clone)]
pub struct WidgetResolver {
    base: WidgetRef,
    matched: Option<WidgetRef>,
    filter: Filter,
}

impl WidgetResolver {
    pub fn new(base: WidgetRef) -> Self {
        Self {
            base,
            matched: None,
            filter: Filter::default(),
        }
    }

    pub fn base(&self) -> &WidgetRef {
        &self.base
    }

    /// Add an attribute equality filter
    pub fn match_attr(&mut self, name: impl Into<String>, value: impl Into<PropValue>) -> &mut Self {
        self.filter.attrs.insert(name.into(), value.into());
        self
    }

    /// Add several attribute equality filters
    pub fn match_attrs<I, K, V>(&mut self, attrs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PropValue>,
    {
        for (name, value) in attrs {
            self.match_attr(name, value);
        }
        self
    }

    /// Add a predicate filter
    pub fn match_fn<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&WidgetRef) -> bool + Send + Sync + 'static,
    {
        self.filter.predicates.push(Arc::new(predicate));
        self
    }

    /// Add several predicate filters, keeping their order
    pub fn match_funcs<I>(&mut self, predicates: I) -> &mut Self
    where
        I: IntoIterator<Item = Predicate>,
    {
        self.filter.predicates.extend(predicates);
        self
    }

    /// The node the query narrowed to
    ///
    /// Returns the last matched node, else the base node when no filter was
    /// ever applied, else `None`.
    pub fn resolve(&self) -> Option<WidgetRef> {
        if let Some(matched) = &self.matched {
            return Some(matched.clone());
        }
        if self.filter.is_empty() {
            return Some(self.base.clone());
        }
        None
    }

    /// Whether `widget` satisfies the accumulated filters
    pub fn matches(&self, widget: &WidgetRef) -> bool {
        self.filter.check(widget)
    }

    /// Breadth-first search of the base node's subtree, base included
    pub fn down(&mut self, filter: Filter) -> Result<WidgetResolver> {
        self.filter.extend(filter);

        let mut fifo = VecDeque::from([self.base.clone()]);
        while let Some(widget) = fifo.pop_front() {
            if self.filter.check(&widget) {
                return Ok(self.found(widget, Direction::Down));
            }
            fifo.extend(widget.children());
        }
        Err(self.not_found(Direction::Down))
    }

    /// Linear ascent from the base node, base included
    pub fn up(&mut self, filter: Filter) -> Result<WidgetResolver> {
        self.filter.extend(filter);

        let mut current = Some(self.base.clone());
        while let Some(widget) = current {
            if self.filter.check(&widget) {
                return Ok(self.found(widget, Direction::Up));
            }
            current = next_ancestor(&widget);
        }
        Err(self.not_found(Direction::Up))
    }

    /// Nearest match in the whole family
    ///
    /// Searches the base node's subtree, then each ancestor's subtree in
    /// turn, skipping the subtree the search just ascended from.
    pub fn family_up(&mut self, filter: Filter) -> Result<WidgetResolver> {
        self.filter.extend(filter);

        let mut level = Some(self.base.clone());
        let mut searched: Option<WidgetRef> = None;
        while let Some(root) = level {
            let mut fifo = VecDeque::from([root.clone()]);
            while let Some(widget) = fifo.pop_front() {
                if searched.as_ref().is_some_and(|s| same_widget(s, &widget)) {
                    continue;
                }
                if self.filter.check(&widget) {
                    return Ok(self.found(widget, Direction::FamilyUp));
                }
                fifo.extend(widget.children());
            }
            level = next_ancestor(&root);
            searched = Some(root);
        }
        Err(self.not_found(Direction::FamilyUp))
    }

    fn found(&mut self, widget: WidgetRef, direction: Direction) -> WidgetResolver {
        trace!(widget = %describe_widget(&widget), %direction, "resolved widget");
        self.matched = Some(widget.clone());
        WidgetResolver::new(widget)
    }

    fn not_found(&self, direction: Direction) -> ResolveError {
        ResolveError::NotFound {
            attrs: self.filter.describe_attrs(),
            predicates: self.filter.predicates.len(),
            base: describe_widget(&self.base),
            direction,
        }
    }
}

impl fmt::Debug for WidgetResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetResolver")
            .field("base", &describe_widget(&self.base))
            .field("matched", &self.matched.as_ref().map(describe_widget))
            .field("filter", &self.filter)
            .finish()
    }
}

/// The parent of `widget`, or `None` at a self-parenting boundary
fn next_ancestor(widget: &WidgetRef) -> Option<WidgetRef> {
    let parent = widget.parent()?;
    if same_widget(&parent, widget) {
        None
    } else {
        Some(parent)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use probe_platform::{Toolkit, Widget};
    use probe_platform_headless::{HeadlessToolkit, HeadlessWidget};

    use super::*;

    struct Tree {
        _toolkit: Arc<HeadlessToolkit>,
        layout: Arc<HeadlessWidget>,
        panel_a: Arc<HeadlessWidget>,
        label_a: Arc<HeadlessWidget>,
        button_a: Arc<HeadlessWidget>,
        button_b: Arc<HeadlessWidget>,
    }

    //  surface root
    //  └ layout
    //    ├ panel_a
    //    │ ├ label_a   name="start"
    //    │ └ button_a  name="ok" tag="a"
    //    └ panel_b
    //      └ button_b  name="ok" tag="b"
    fn tree() -> Tree {
        let toolkit = HeadlessToolkit::new();
        let label_a = HeadlessWidget::new("Label").with_prop("name", "start");
        let button_a = HeadlessWidget::new("Button")
            .with_prop("name", "ok")
            .with_prop("tag", "a");
        let button_b = HeadlessWidget::new("Button")
            .with_prop("name", "ok")
            .with_prop("tag", "b");
        let panel_a = HeadlessWidget::new("Box")
            .with_child(label_a.clone())
            .with_child(button_a.clone());
        let panel_b = HeadlessWidget::new("Box").with_child(button_b.clone());
        let layout = HeadlessWidget::new("Layout")
            .with_child(panel_a.clone())
            .with_child(panel_b);
        toolkit.window().attach(layout.clone());
        Tree {
            _toolkit: toolkit,
            layout,
            panel_a,
            label_a,
            button_a,
            button_b,
        }
    }

    fn is(a: &WidgetRef, b: &Arc<HeadlessWidget>) -> bool {
        same_widget(a, &b.as_widget())
    }

    #[test]
    fn test_resolve_without_filters_is_base() {
        let tree = tree();
        let resolver = WidgetResolver::new(tree.layout.as_widget());
        assert!(is(&resolver.resolve().unwrap(), &tree.layout));

        let mut filtered = resolver.clone();
        filtered.match_attr("name", "ok");
        assert!(filtered.resolve().is_none());
    }

    #[test]
    fn test_down_is_breadth_first() {
        let tree = tree();
        let mut resolver = WidgetResolver::new(tree.layout.as_widget());
        let found = resolver.down(Filter::new().attr("name", "ok")).unwrap();
        assert!(is(&found.resolve().unwrap(), &tree.button_a));
        assert!(is(&resolver.resolve().unwrap(), &tree.button_a));
    }

    #[test]
    fn test_down_includes_base() {
        let tree = tree();
        let mut resolver = WidgetResolver::new(tree.button_b.as_widget());
        let found = resolver.down(Filter::new().attr("tag", "b")).unwrap();
        assert!(is(&found.resolve().unwrap(), &tree.button_b));
    }

    #[test]
    fn test_chained_down_then_up() {
        let tree = tree();
        let mut resolver = WidgetResolver::new(tree.layout.as_widget());
        let mut button = resolver
            .down(Filter::new().attr("tag", "b"))
            .unwrap();
        let layout = button
            .up(Filter::new().pred(|w| w.type_name() == "Layout"))
            .unwrap();
        assert!(is(&layout.resolve().unwrap(), &tree.layout));
    }

    #[test]
    fn test_filters_accumulate_across_calls() {
        let tree = tree();
        let mut resolver = WidgetResolver::new(tree.layout.as_widget());
        resolver.match_attr("name", "ok");
        resolver.match_fn(|w| w.property("tag") == Some(PropValue::from("b")));
        let found = resolver.down(Filter::new()).unwrap();
        assert!(is(&found.resolve().unwrap(), &tree.button_b));
        assert!(resolver.matches(&tree.button_b.as_widget()));
        assert!(!resolver.matches(&tree.button_a.as_widget()));
    }

    #[test]
    fn test_missing_attribute_is_non_match() {
        let tree = tree();
        let mut resolver = WidgetResolver::new(tree.layout.as_widget());
        let err = resolver
            .down(Filter::new().attr("no_such_attr", 1))
            .unwrap_err();
        match err {
            ResolveError::NotFound {
                predicates,
                direction,
                ref attrs,
                ..
            } => {
                assert_eq!(predicates, 0);
                assert_eq!(direction, Direction::Down);
                assert!(attrs.contains("no_such_attr=1"));
            }
        }
        assert!(err.to_string().contains("down"));
    }

    #[test]
    fn test_up_stops_at_self_parenting_root() {
        let tree = tree();
        let mut resolver = WidgetResolver::new(tree.label_a.as_widget());
        let err = resolver.up(Filter::new().attr("name", "ok")).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::NotFound {
                direction: Direction::Up,
                ..
            }
        ));

        let mut resolver = WidgetResolver::new(tree.label_a.as_widget());
        let panel = resolver
            .up(Filter::new().pred(|w| w.type_name() == "Box"))
            .unwrap();
        assert!(is(&panel.resolve().unwrap(), &tree.panel_a));
    }

    #[test]
    fn test_up_stops_at_detached_top() {
        let top = HeadlessWidget::new("Box");
        let leaf = HeadlessWidget::new("Label");
        top.add_child(leaf.clone());
        let mut resolver = WidgetResolver::new(leaf.as_widget());
        assert!(resolver.up(Filter::new().attr("name", "x")).is_err());
        let mut resolver = WidgetResolver::new(leaf.as_widget());
        let found = resolver
            .up(Filter::new().pred(|w| w.type_name() == "Box"))
            .unwrap();
        assert!(is(&found.resolve().unwrap(), &top));
    }

    #[test]
    fn test_family_up_prefers_nearest_relative() {
        let tree = tree();
        let mut resolver = WidgetResolver::new(tree.label_a.as_widget());
        let found = resolver.family_up(Filter::new().attr("name", "ok")).unwrap();
        assert!(is(&found.resolve().unwrap(), &tree.button_a));

        let mut resolver = WidgetResolver::new(tree.label_a.as_widget());
        let found = resolver.family_up(Filter::new().attr("tag", "b")).unwrap();
        assert!(is(&found.resolve().unwrap(), &tree.button_b));
    }

    #[test]
    fn test_family_up_matches_base_first() {
        let tree = tree();
        let mut resolver = WidgetResolver::new(tree.label_a.as_widget());
        let found = resolver
            .family_up(Filter::new().attr("name", "start"))
            .unwrap();
        assert!(is(&found.resolve().unwrap(), &tree.label_a));

        let mut resolver = WidgetResolver::new(tree.panel_a.as_widget());
        let found = resolver
            .family_up(Filter::new().pred(|w| w.type_name() == "Box"))
            .unwrap();
        assert!(is(&found.resolve().unwrap(), &tree.panel_a));
    }

    #[test]
    fn test_family_up_skips_searched_subtree() {
        let tree = tree();
        let visits = Arc::new(AtomicUsize::new(0));
        let counter = visits.clone();
        let label = tree.label_a.as_widget();
        let mut resolver = WidgetResolver::new(label.clone());
        let err = resolver
            .family_up(Filter::new().pred(move |w| {
                if same_widget(w, &label) {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
                false
            }))
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::NotFound {
                direction: Direction::FamilyUp,
                predicates: 1,
                ..
            }
        ));
        assert_eq!(visits.load(Ordering::SeqCst), 1);
    }
}
