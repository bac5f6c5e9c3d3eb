//! Routes declared in `config/routes.rb`.

use crate::utils::inflect::{camelize, underscore};
use serde::Serialize;
use std::fmt;

/// One `(namespaces, controller, action)` route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Route {
    namespaces: Vec<String>,
    controller_name: String,
    action_name: String,
}

impl Route {
    /// Creates a route.
    ///
    /// The controller name may be given as `posts`, `admin/posts` or
    /// `Admin::PostsController`; any namespace it carries is appended to
    /// `namespaces`.
    #[must_use]
    pub fn new(namespaces: &[String], controller_name: &str, action_name: &str) -> Self {
        let controller = controller_name
            .strip_suffix("Controller")
            .unwrap_or(controller_name);
        let controller = underscore(controller);
        let mut namespaces: Vec<String> = namespaces
            .iter()
            .filter(|ns| !ns.is_empty())
            .cloned()
            .collect();
        let mut parts: Vec<&str> = controller.split('/').filter(|p| !p.is_empty()).collect();
        let controller_name = parts.pop().unwrap_or_default().to_string();
        namespaces.extend(parts.into_iter().map(String::from));
        Self {
            namespaces,
            controller_name,
            action_name: action_name.to_string(),
        }
    }

    /// Enclosing namespaces, outermost first.
    #[must_use]
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Controller name without namespaces (`posts`).
    #[must_use]
    pub fn controller_name(&self) -> &str {
        &self.controller_name
    }

    /// Action name (`index`).
    #[must_use]
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    /// Fully qualified controller class, e.g. `Admin::PostsController`.
    #[must_use]
    pub fn controller_name_with_namespaces(&self) -> String {
        let mut parts: Vec<String> = self.namespaces.iter().map(|ns| camelize(ns)).collect();
        parts.push(format!("{}Controller", camelize(&self.controller_name)));
        parts.join("::")
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}",
            self.controller_name_with_namespaces(),
            self.action_name
        )
    }
}

/// Ordered route collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Routes {
    routes: Vec<Route>,
}

impl Routes {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a route. Routes without a controller are dropped.
    pub fn add_route(&mut self, namespaces: &[String], controller_name: &str, action_name: &str) {
        if controller_name.is_empty() || action_name.is_empty() {
            tracing::debug!(controller_name, action_name, "skipping incomplete route");
            return;
        }
        self.routes
            .push(Route::new(namespaces, controller_name, action_name));
    }

    /// All routes in declaration order.
    #[must_use]
    pub fn all(&self) -> &[Route] {
        &self.routes
    }

    /// Routes whose qualified controller is `controller`.
    pub fn for_controller<'a>(&'a self, controller: &'a str) -> impl Iterator<Item = &'a Route> {
        self.routes
            .iter()
            .filter(move |r| r.controller_name_with_namespaces() == controller)
    }

    /// Returns true if `controller#action` is routed.
    #[must_use]
    pub fn has_action(&self, controller: &str, action: &str) -> bool {
        self.for_controller(controller)
            .any(|r| r.action_name == action)
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no route was declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Removes every route.
    pub fn clear(&mut self) {
        self.routes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_namespaced_controller() {
        let route = Route::new(&["admin".into()], "posts", "index");
        assert_eq!(route.to_string(), "Admin::PostsController#index");
    }

    #[test]
    fn splits_namespaced_controller_strings() {
        let route = Route::new(&[], "admin/user_posts", "show");
        assert_eq!(route.namespaces(), ["admin".to_string()]);
        assert_eq!(route.controller_name(), "user_posts");
        assert_eq!(route.to_string(), "Admin::UserPostsController#show");
    }

    #[test]
    fn accepts_class_names() {
        let route = Route::new(&[], "Admin::PostsController", "edit");
        assert_eq!(route.to_string(), "Admin::PostsController#edit");
    }

    #[test]
    fn drops_routes_without_controller() {
        let mut routes = Routes::new();
        routes.add_route(&[], "", "index");
        routes.add_route(&[], "posts", "index");
        assert_eq!(routes.len(), 1);
        assert!(routes.has_action("PostsController", "index"));
        assert!(!routes.has_action("PostsController", "show"));
    }
}
