//! Notification routing tree
//!
//! A [`Route`] owns its children inline, so the structure is a tree by
//! construction. Traversal helpers walk it depth-first, root first.

use serde::{Deserialize, Serialize};

use super::matcher::Matcher;

/// A node in the notification routing tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Receiver name; empty for pure grouping nodes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub receiver: String,

    /// Label conditions that must all hold for an alert to enter this route
    #[serde(default, alias = "object_matchers", skip_serializing_if = "Vec::is_empty")]
    pub matchers: Vec<Matcher>,

    /// Keep evaluating sibling routes after this one matched
    #[serde(default, rename = "continue")]
    pub continue_matching: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub group_by: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_wait: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<String>,

    /// Names of mute time intervals applied to this route
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mute_time_intervals: Vec<String>,

    /// Child routes, evaluated in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<Route>,
}

impl Route {
    /// Create a route pointing at a receiver
    pub fn new(receiver: impl Into<String>) -> Self {
        Self {
            receiver: receiver.into(),
            ..Default::default()
        }
    }

    /// Add a matcher
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Set the continue flag
    pub fn with_continue(mut self, continue_matching: bool) -> Self {
        self.continue_matching = continue_matching;
        self
    }

    /// Reference a mute time interval by name
    pub fn with_mute_time_interval(mut self, name: impl Into<String>) -> Self {
        self.mute_time_intervals.push(name.into());
        self
    }

    /// Append a child route
    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Depth-first, root-first iterator over this route and all descendants
    pub fn iter(&self) -> RouteIter<'_> {
        RouteIter { stack: vec![self] }
    }

    /// Whether this route itself (not its children) references `name`
    pub fn references_mute_interval(&self, name: &str) -> bool {
        self.mute_time_intervals.iter().any(|n| n == name)
    }

    /// Whether any route in this subtree references `name`.
    ///
    /// Stops at the first hit; each node is visited at most once.
    pub fn is_mute_interval_in_use(&self, name: &str) -> bool {
        self.iter().any(|route| route.references_mute_interval(name))
    }
}

/// Pre-order iterator produced by [`Route::iter`]
pub struct RouteIter<'a> {
    stack: Vec<&'a Route>,
}

impl<'a> Iterator for RouteIter<'a> {
    type Item = &'a Route;

    fn next(&mut self) -> Option<Self::Item> {
        let route = self.stack.pop()?;
        // Reverse so the first child is popped next
        self.stack.extend(route.routes.iter().rev());
        Some(route)
    }
}

impl<'a> IntoIterator for &'a Route {
    type Item = &'a Route;
    type IntoIter = RouteIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Route {
        Route::new("root")
            .with_route(
                Route::new("a")
                    .with_route(Route::new("a1"))
                    .with_route(Route::new("a2").with_mute_time_interval("weekends")),
            )
            .with_route(Route::new("b").with_route(Route::new("b1")))
    }

    #[test]
    fn test_iter_is_depth_first_root_first() {
        let tree = sample_tree();
        let order: Vec<&str> = tree.iter().map(|r| r.receiver.as_str()).collect();
        assert_eq!(order, vec!["root", "a", "a1", "a2", "b", "b1"]);
    }

    #[test]
    fn test_mute_interval_in_use_at_depth() {
        let tree = sample_tree();
        assert!(tree.is_mute_interval_in_use("weekends"));
        assert!(!tree.is_mute_interval_in_use("holidays"));
        assert!(!tree.references_mute_interval("weekends"));
    }

    #[test]
    fn test_mute_interval_in_use_on_root() {
        let tree = Route::new("root").with_mute_time_interval("maintenance");
        assert!(tree.is_mute_interval_in_use("maintenance"));
    }

    #[test]
    fn test_deserialize_route_from_yaml() {
        let yaml = r#"
receiver: default
group_by: [grafana_folder, alertname]
routes:
  - receiver: pager
    object_matchers:
      - [severity, "=", critical]
    continue: true
    mute_time_intervals: [nights]
"#;
        let route: Route = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(route.receiver, "default");
        assert_eq!(route.group_by, vec!["grafana_folder", "alertname"]);
        assert_eq!(route.routes.len(), 1);

        let child = &route.routes[0];
        assert!(child.continue_matching);
        assert_eq!(child.matchers, vec![Matcher::equal("severity", "critical")]);
        assert!(route.is_mute_interval_in_use("nights"));
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let json = serde_json::to_value(Route::new("only-receiver")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"receiver": "only-receiver", "continue": false})
        );
    }
}
