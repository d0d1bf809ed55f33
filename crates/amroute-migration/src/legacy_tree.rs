//! In-memory routing tree used while migrating legacy channels

use std::collections::{HashMap, HashSet};

use amroute_core::definitions::{ManagedReceiver, Matcher, Receiver, Route, RoutingConfig};
use amroute_core::labels::{
    ALERT_NAME_LABEL, DEFAULT_RECEIVER_NAME, FOLDER_TITLE_LABEL, MIGRATED_CONTACT_LABEL_PREFIX,
    USE_LEGACY_CHANNELS_LABEL,
};
use tracing::debug;

/// Builder for migrated routing configurations.
///
/// Holds the root route separately from the rest of the configuration so
/// the root always exists while the tree is being edited. The legacy
/// subtree is tracked by its position among the root's children and the
/// lookup indexes store positions instead of references into the tree.
#[derive(Debug, Clone)]
pub struct LegacyRouteTree {
    /// Everything except the root route
    config: RoutingConfig,
    root: Route,
    /// Position of the legacy subtree in `root.routes`
    legacy_index: usize,
    /// Receiver name -> position in the legacy subtree's children
    receiver_routes: HashMap<String, usize>,
    /// Integration UID -> (receiver position, integration position)
    uid_receivers: HashMap<String, (usize, usize)>,
    receiver_names: HashSet<String>,
}

impl LegacyRouteTree {
    /// Start from a fresh default configuration
    pub fn new() -> Self {
        Self::from_config(None)
    }

    /// Start from an existing configuration, repairing missing structure.
    ///
    /// - no configuration: default receiver, root route and legacy subtree
    /// - no root route: a default root route is synthesized
    /// - no legacy subtree: one is inserted as the root's first child
    pub fn from_config(config: Option<RoutingConfig>) -> Self {
        let mut config = config.unwrap_or_else(|| {
            debug!("No existing routing configuration, creating base configuration");
            base_config()
        });

        let mut root = config.route.take().unwrap_or_else(|| {
            debug!("Routing configuration has no root route, creating default root route");
            default_root_route()
        });

        let legacy_index = match root.routes.iter().position(is_legacy_subtree) {
            Some(idx) => idx,
            None => {
                debug!("Inserting legacy subtree as first child of the root route");
                root.routes.insert(0, legacy_subtree());
                0
            }
        };

        let receiver_routes = root.routes[legacy_index]
            .routes
            .iter()
            .enumerate()
            .map(|(idx, route)| (route.receiver.clone(), idx))
            .collect();

        let mut uid_receivers = HashMap::new();
        for (receiver_idx, receiver) in config.receivers.iter().enumerate() {
            for (integration_idx, integration) in receiver.integrations.iter().enumerate() {
                uid_receivers.insert(integration.uid.clone(), (receiver_idx, integration_idx));
            }
        }

        let receiver_names = config.receivers.iter().map(|r| r.name.clone()).collect();

        Self {
            config,
            root,
            legacy_index,
            receiver_routes,
            uid_receivers,
            receiver_names,
        }
    }

    /// Append a route under the legacy subtree. `None` is ignored.
    pub fn add_route(&mut self, route: Option<Route>) {
        let Some(route) = route else {
            return;
        };

        let legacy = &mut self.root.routes[self.legacy_index];
        self.receiver_routes
            .insert(route.receiver.clone(), legacy.routes.len());
        legacy.routes.push(route);
    }

    /// Wrap an integration in a new receiver and register its UID.
    ///
    /// The receiver is named after the integration, suffixed `-2`, `-3`, ...
    /// if that name is already taken. `None` is ignored.
    pub fn add_receiver(&mut self, integration: Option<ManagedReceiver>) -> Option<&Receiver> {
        let integration = integration?;

        let name = self.unique_receiver_name(&integration.name);
        let receiver_idx = self.config.receivers.len();
        self.uid_receivers
            .insert(integration.uid.clone(), (receiver_idx, 0));
        self.receiver_names.insert(name.clone());
        self.config.receivers.push(Receiver {
            name,
            integrations: vec![integration],
        });
        self.config.receivers.last()
    }

    /// Route already attached under the legacy subtree for a receiver name
    pub fn legacy_route_for(&self, receiver_name: &str) -> Option<&Route> {
        let idx = *self.receiver_routes.get(receiver_name)?;
        self.legacy_subtree().routes.get(idx)
    }

    /// Integration registered under `uid`
    pub fn receiver_for(&self, uid: &str) -> Option<&ManagedReceiver> {
        let (receiver_idx, integration_idx) = *self.uid_receivers.get(uid)?;
        self.config
            .receivers
            .get(receiver_idx)?
            .integrations
            .get(integration_idx)
    }

    /// Label that routes alerts to the migrated channel with this UID.
    ///
    /// Returns an empty string when the receiver, its route or the label
    /// cannot be found.
    pub fn contact_label_for(&self, uid: &str) -> &str {
        self.uid_receivers
            .get(uid)
            .and_then(|&(receiver_idx, _)| self.config.receivers.get(receiver_idx))
            .and_then(|receiver| self.legacy_route_for(&receiver.name))
            .and_then(|route| {
                route.matchers.iter().find(|m| {
                    m.is_equal() && m.name.starts_with(MIGRATED_CONTACT_LABEL_PREFIX)
                })
            })
            .map(|m| m.name.as_str())
            .unwrap_or("")
    }

    pub fn root(&self) -> &Route {
        &self.root
    }

    pub fn legacy_subtree(&self) -> &Route {
        &self.root.routes[self.legacy_index]
    }

    pub fn receivers(&self) -> &[Receiver] {
        &self.config.receivers
    }

    /// Produce the configuration to persist, dropping the legacy subtree if
    /// nothing was migrated into it.
    pub fn finalize(self) -> RoutingConfig {
        let Self {
            mut config,
            mut root,
            ..
        } = self;

        if let Some(idx) = root
            .routes
            .iter()
            .position(|r| is_legacy_subtree(r) && r.routes.is_empty())
        {
            debug!("Removing empty legacy subtree");
            root.routes.remove(idx);
        }

        config.route = Some(root);
        config
    }

    fn unique_receiver_name(&self, base: &str) -> String {
        if !self.receiver_names.contains(base) {
            return base.to_string();
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{}-{}", base, suffix);
            if !self.receiver_names.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

impl Default for LegacyRouteTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `route` is the legacy subtree: exactly one matcher, and that
/// matcher is `__legacy_use_channels__ = "true"`.
pub fn is_legacy_subtree(route: &Route) -> bool {
    match route.matchers.as_slice() {
        [matcher] => {
            matcher.is_equal()
                && matcher.name == USE_LEGACY_CHANNELS_LABEL
                && matcher.value == "true"
        }
        _ => false,
    }
}

/// An empty legacy subtree
pub fn legacy_subtree() -> Route {
    Route::default()
        .with_matcher(Matcher::equal(USE_LEGACY_CHANNELS_LABEL, "true"))
        .with_continue(true)
}

/// Root route pointing at the default receiver, grouped by folder and
/// alert name like pre-migration notifications were.
pub fn default_root_route() -> Route {
    Route {
        receiver: DEFAULT_RECEIVER_NAME.to_string(),
        group_by: vec![FOLDER_TITLE_LABEL.to_string(), ALERT_NAME_LABEL.to_string()],
        routes: vec![legacy_subtree()],
        ..Default::default()
    }
}

/// Label used to route alerts to a migrated channel
pub fn contact_label(channel_name: &str) -> String {
    format!("{}{}__", MIGRATED_CONTACT_LABEL_PREFIX, channel_name)
}

/// Route sending alerts that carry `contact_label = "true"` to `receiver_name`
pub fn channel_route(receiver_name: &str, contact_label: &str) -> Route {
    Route::new(receiver_name)
        .with_matcher(Matcher::equal(contact_label, "true"))
        .with_continue(true)
}

fn base_config() -> RoutingConfig {
    RoutingConfig {
        receivers: vec![Receiver::new(DEFAULT_RECEIVER_NAME)],
        route: Some(default_root_route()),
        mute_time_intervals: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amroute_core::definitions::MatchType;

    fn legacy_subtree_count(root: &Route) -> usize {
        root.routes.iter().filter(|r| is_legacy_subtree(r)).count()
    }

    fn migrate_channel(tree: &mut LegacyRouteTree, uid: &str, name: &str) {
        let wrapper = tree
            .add_receiver(Some(ManagedReceiver::new(uid, name, "email")))
            .map(|r| r.name.clone())
            .unwrap();
        tree.add_route(Some(channel_route(&wrapper, &contact_label(name))));
    }

    #[test]
    fn test_bootstrap_from_nothing() {
        let tree = LegacyRouteTree::new();

        assert_eq!(legacy_subtree_count(tree.root()), 1);
        assert!(tree.legacy_subtree().routes.is_empty());
        assert!(tree.legacy_subtree().continue_matching);

        assert_eq!(tree.root().receiver, DEFAULT_RECEIVER_NAME);
        assert_eq!(tree.root().group_by, vec!["grafana_folder", "alertname"]);
        assert_eq!(tree.receivers().len(), 1);
        assert_eq!(tree.receivers()[0].name, DEFAULT_RECEIVER_NAME);
    }

    #[test]
    fn test_bootstrap_twice_reuses_legacy_subtree() {
        let mut first = LegacyRouteTree::new();
        migrate_channel(&mut first, "uid-1", "ops");
        let config = first.finalize();

        let second = LegacyRouteTree::from_config(Some(config.clone()));
        assert_eq!(legacy_subtree_count(second.root()), 1);
        assert_eq!(second.legacy_subtree().routes.len(), 1);
        assert!(second.legacy_route_for("ops").is_some());
        assert!(second.receiver_for("uid-1").is_some());

        // Nothing new added, so a second finalize round-trips unchanged
        assert_eq!(second.finalize(), config);
    }

    #[test]
    fn test_existing_empty_legacy_subtree_is_detected() {
        let mut root = default_root_route();
        root.routes.push(Route::new("team-a"));
        let config = RoutingConfig {
            receivers: vec![Receiver::new(DEFAULT_RECEIVER_NAME), Receiver::new("team-a")],
            route: Some(root),
            mute_time_intervals: None,
        };

        let tree = LegacyRouteTree::from_config(Some(config));
        assert_eq!(legacy_subtree_count(tree.root()), 1);
        assert_eq!(tree.root().routes.len(), 2);
    }

    #[test]
    fn test_missing_root_route_is_synthesized() {
        let config = RoutingConfig {
            receivers: vec![Receiver::new("custom")],
            route: None,
            mute_time_intervals: None,
        };

        let tree = LegacyRouteTree::from_config(Some(config));
        assert_eq!(tree.root().receiver, DEFAULT_RECEIVER_NAME);
        assert_eq!(legacy_subtree_count(tree.root()), 1);
        assert_eq!(tree.receivers()[0].name, "custom");
    }

    #[test]
    fn test_legacy_subtree_inserted_first() {
        let root = Route::new("default")
            .with_route(Route::new("catch-all").with_continue(false))
            .with_route(Route::new("other"));
        let config = RoutingConfig {
            receivers: vec![Receiver::new("default")],
            route: Some(root),
            mute_time_intervals: None,
        };

        let tree = LegacyRouteTree::from_config(Some(config));
        let children = &tree.root().routes;
        assert_eq!(children.len(), 3);
        assert!(is_legacy_subtree(&children[0]));
        assert_eq!(children[1].receiver, "catch-all");
        assert_eq!(children[2].receiver, "other");
    }

    #[test]
    fn test_user_route_with_other_value_is_not_legacy() {
        let lookalike =
            Route::new("team").with_matcher(Matcher::equal(USE_LEGACY_CHANNELS_LABEL, "false"));
        assert!(!is_legacy_subtree(&lookalike));

        let regex = Route::new("team").with_matcher(Matcher::new(
            USE_LEGACY_CHANNELS_LABEL,
            MatchType::Regexp,
            "true",
        ));
        assert!(!is_legacy_subtree(&regex));

        let extra = legacy_subtree().with_matcher(Matcher::equal("team", "ops"));
        assert!(!is_legacy_subtree(&extra));
    }

    #[test]
    fn test_add_route_attaches_under_legacy_subtree() {
        let root = Route::new("default").with_route(Route::new("team-a"));
        let config = RoutingConfig {
            receivers: vec![Receiver::new("default")],
            route: Some(root),
            mute_time_intervals: None,
        };
        let mut tree = LegacyRouteTree::from_config(Some(config));
        let before: Vec<String> = tree.root().routes.iter().map(|r| r.receiver.clone()).collect();

        tree.add_route(Some(channel_route("pager", &contact_label("pager"))));

        let after: Vec<String> = tree.root().routes.iter().map(|r| r.receiver.clone()).collect();
        assert_eq!(before, after);
        assert_eq!(tree.legacy_subtree().routes.len(), 1);
        assert_eq!(tree.legacy_route_for("pager").unwrap().receiver, "pager");
    }

    #[test]
    fn test_none_inputs_are_ignored() {
        let mut tree = LegacyRouteTree::new();
        tree.add_route(None);
        assert!(tree.add_receiver(None).is_none());

        assert!(tree.legacy_subtree().routes.is_empty());
        assert_eq!(tree.receivers().len(), 1);
    }

    #[test]
    fn test_add_receiver_synthesizes_unique_names() {
        let mut tree = LegacyRouteTree::new();
        let first = tree
            .add_receiver(Some(ManagedReceiver::new("uid-1", "slack", "slack")))
            .unwrap()
            .name
            .clone();
        let second = tree
            .add_receiver(Some(ManagedReceiver::new("uid-2", "slack", "slack")))
            .unwrap()
            .name
            .clone();
        let clash = tree
            .add_receiver(Some(ManagedReceiver::new(
                "uid-3",
                DEFAULT_RECEIVER_NAME,
                "email",
            )))
            .unwrap()
            .name
            .clone();

        assert_eq!(first, "slack");
        assert_eq!(second, "slack-2");
        assert_eq!(clash, format!("{}-2", DEFAULT_RECEIVER_NAME));
        assert_eq!(tree.receiver_for("uid-2").unwrap().uid, "uid-2");
        assert!(tree.receiver_for("missing").is_none());
    }

    #[test]
    fn test_contact_label_for() {
        let mut tree = LegacyRouteTree::new();
        migrate_channel(&mut tree, "uid-1", "ops");

        assert_eq!(tree.contact_label_for("uid-1"), "__legacy_c_ops__");
        assert_eq!(tree.contact_label_for("unknown"), "");

        // Receiver without a route
        tree.add_receiver(Some(ManagedReceiver::new("uid-2", "orphan", "email")));
        assert_eq!(tree.contact_label_for("uid-2"), "");

        // Route without a contact label matcher
        tree.add_receiver(Some(ManagedReceiver::new("uid-3", "plain", "email")));
        tree.add_route(Some(Route::new("plain").with_matcher(Matcher::equal("team", "x"))));
        assert_eq!(tree.contact_label_for("uid-3"), "");
    }

    #[test]
    fn test_finalize_removes_empty_legacy_subtree() {
        let config = LegacyRouteTree::new().finalize();
        let root = config.route.unwrap();
        assert_eq!(legacy_subtree_count(&root), 0);
        assert!(root.routes.is_empty());
    }

    #[test]
    fn test_finalize_removes_only_first_empty_legacy_subtree() {
        let config = RoutingConfig {
            receivers: vec![Receiver::new(DEFAULT_RECEIVER_NAME)],
            route: Some(
                Route::new(DEFAULT_RECEIVER_NAME)
                    .with_route(legacy_subtree())
                    .with_route(Route::new("team-a"))
                    .with_route(legacy_subtree()),
            ),
            mute_time_intervals: None,
        };

        let config = LegacyRouteTree::from_config(Some(config)).finalize();
        let root = config.route.unwrap();
        assert_eq!(legacy_subtree_count(&root), 1);
        assert_eq!(root.routes.len(), 2);
        assert_eq!(root.routes[0].receiver, "team-a");
        assert!(is_legacy_subtree(&root.routes[1]));
    }

    #[test]
    fn test_finalize_keeps_populated_legacy_subtree() {
        let mut tree = LegacyRouteTree::new();
        migrate_channel(&mut tree, "uid-1", "ops");

        let config = tree.finalize();
        let root = config.route.unwrap();
        assert_eq!(legacy_subtree_count(&root), 1);
        assert_eq!(root.routes[0].routes.len(), 1);
        assert_eq!(config.receivers.len(), 2);
    }
}
