//! Route DSL helpers and `namespace`/`scope`/`resources` block tracking.

use railsbp_core::utils::pluralize;
use railsbp_core::{CheckerBuilder, Kind, NodeRef};

/// The seven actions `resources` generates.
pub const RESOURCES_ACTIONS: &[&str] = &["index", "show", "new", "create", "edit", "update", "destroy"];

/// The six actions `resource` generates.
pub const RESOURCE_ACTIONS: &[&str] = &["show", "new", "create", "edit", "update", "destroy"];

/// HTTP verb helpers.
pub const VERBS: &[&str] = &["get", "post", "put", "patch", "delete", "match"];

/// Node kinds a route call can take: `resources :posts` is a command,
/// `resources(:posts)` a method call with arguments.
pub const ROUTE_CALL_KINDS: [Kind; 2] = [Kind::Command, Kind::MethodAddArg];

/// True for a receiverless call, with or without parentheses.
#[must_use]
pub fn is_route_call(node: NodeRef<'_>) -> bool {
    node.is(&Kind::Command) || (node.is(&Kind::MethodAddArg) && node.slot(0).is(&Kind::Fcall))
}

/// Returns true for a `resources` or `resource` declaration name.
#[must_use]
pub fn is_resource_message(message: &str) -> bool {
    message == "resources" || message == "resource"
}

/// Keyword options of a route call (`only:`, `to:`, ...), or the Null Object.
#[must_use]
pub fn route_options(node: NodeRef<'_>) -> NodeRef<'_> {
    node.call_arguments()
        .into_iter()
        .find(|arg| arg.is(&Kind::BareAssocHash))
        .unwrap_or_default()
}

/// Positional symbol/string arguments of a route call.
#[must_use]
pub fn route_names(node: NodeRef<'_>) -> Vec<String> {
    node.call_arguments()
        .into_iter()
        .filter(|arg| !arg.is(&Kind::BareAssocHash))
        .map(NodeRef::render_text)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Actions generated by a `resources`/`resource` call after `only:`/`except:`.
#[must_use]
pub fn resource_actions(message: &str, options: NodeRef<'_>) -> Vec<String> {
    let defaults = if message == "resource" {
        RESOURCE_ACTIONS
    } else {
        RESOURCES_ACTIONS
    };
    let all = || defaults.iter().map(ToString::to_string).collect::<Vec<_>>();
    let only = options.hash_value("only");
    if only.is_present() {
        let names = only.string_list();
        return match names.as_slice() {
            [all_word] if all_word == "all" => all(),
            [none] if none == "none" => Vec::new(),
            _ => names,
        };
    }
    let except = options.hash_value("except");
    if except.is_present() {
        let names = except.string_list();
        if names.iter().any(|n| n == "all") {
            return Vec::new();
        }
        return all().into_iter().filter(|a| !names.contains(a)).collect();
    }
    all()
}

/// Controller a `resources`/`resource` call routes to.
#[must_use]
pub fn resource_controller(name: &str, options: NodeRef<'_>) -> String {
    let controller = options.hash_value("controller").render_text();
    if controller.is_empty() {
        pluralize(name)
    } else {
        controller
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Frame {
    Namespace(String),
    Resource {
        name: String,
        controller: String,
        shallow: bool,
        head_seen: bool,
    },
    Other,
}

/// Open `namespace`, `scope` and `resources` blocks.
#[derive(Debug, Clone, Default)]
pub struct RouteScope {
    frames: Vec<Frame>,
}

impl RouteScope {
    /// Module path of the open `namespace`/`scope module:` blocks.
    #[must_use]
    pub fn namespaces(&self) -> Vec<String> {
        self.frames
            .iter()
            .filter_map(|f| match f {
                Frame::Namespace(name) if !name.is_empty() => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Controller of the innermost open `resources` block, unless a
    /// namespace was opened inside it.
    #[must_use]
    pub fn current_controller(&self) -> Option<&str> {
        self.frames.iter().rev().find_map(|f| match f {
            Frame::Resource { controller, .. } => Some(Some(controller.as_str())),
            Frame::Namespace(name) if !name.is_empty() => Some(None),
            Frame::Namespace(_) | Frame::Other => None,
        })?
    }

    /// Names of the open `resources`/`resource` blocks, outermost first.
    #[must_use]
    pub fn resource_names(&self) -> Vec<String> {
        self.frames
            .iter()
            .filter_map(|f| match f {
                Frame::Resource { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of open `resources` blocks.
    #[must_use]
    pub fn resource_depth(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| matches!(f, Frame::Resource { .. }))
            .count()
    }

    /// True if any open `resources` block was declared `shallow: true`.
    #[must_use]
    pub fn in_shallow(&self) -> bool {
        self.frames
            .iter()
            .any(|f| matches!(f, Frame::Resource { shallow: true, .. }))
    }

    /// Classifies a `resources`/`resource` command.
    ///
    /// The first call after a block opens is the block's own head and
    /// returns `None`; any other call returns the number of enclosing
    /// `resources` blocks.
    pub fn visit_resource_command(&mut self) -> Option<usize> {
        if let Some(Frame::Resource { head_seen, .. }) = self.frames.last_mut() {
            if !*head_seen {
                *head_seen = true;
                return None;
            }
        }
        Some(self.resource_depth())
    }

    fn enter_block(&mut self, node: NodeRef<'_>) {
        let message = node.message().render_text();
        let options = route_options(node.slot(0));
        let frame = match message.as_str() {
            "namespace" => Frame::Namespace(route_names(node.slot(0)).into_iter().next().unwrap_or_default()),
            "scope" => Frame::Namespace(options.hash_value("module").render_text()),
            m if is_resource_message(m) => {
                let name = route_names(node.slot(0)).into_iter().next().unwrap_or_default();
                Frame::Resource {
                    controller: resource_controller(&name, options),
                    shallow: options.hash_value("shallow").render_text() == "true",
                    head_seen: false,
                    name,
                }
            }
            _ => Frame::Other,
        };
        self.frames.push(frame);
    }
}

/// State that carries a [`RouteScope`].
pub trait HasRouteScope {
    /// The route block tracker.
    fn route_scope(&mut self) -> &mut RouteScope;
}

/// Installs route block tracking. Install before the check's own callbacks.
#[must_use]
pub fn routable<S>(builder: CheckerBuilder<S>) -> CheckerBuilder<S>
where
    S: HasRouteScope + Send + 'static,
{
    builder
        .interesting_kinds([Kind::MethodAddBlock])
        .on_enter(Kind::MethodAddBlock, |state: &mut S, _, node| {
            state.route_scope().enter_block(node);
            Ok(())
        })
        .on_exit(Kind::MethodAddBlock, |state: &mut S, _, _| {
            state.route_scope().frames.pop();
            Ok(())
        })
}
