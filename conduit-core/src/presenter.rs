//! Group list presenter: read-only projection of a [`GroupingResult`] into a
//! display tree.
//!
//! Without any non-empty group the tree is a flat list of the ungrouped
//! targets. Otherwise every non-empty group becomes a node, followed by one
//! trailing "Others" node that is emitted even when it is empty.
//!
//! Actions on a target ("run", "view in task graph") are never performed
//! here. Items expose a [`TargetRef`] and callers route it through
//! [`ActionHooks`].

use std::fmt;

use serde::Serialize;

use crate::grouping::GroupingResult;
use crate::types::{Project, ProjectName, TargetName};

/// Heading of the catch-all node.
pub const OTHERS_LABEL: &str = "Others";

/// Identifies a target for action callbacks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRef {
    pub project_name: ProjectName,
    pub target_name: TargetName,
}

/// One target row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub project: ProjectName,
    pub target: TargetName,
    pub executor: Option<String>,
    pub configurations: Vec<String>,
}

impl DisplayItem {
    pub fn target_ref(&self) -> TargetRef {
        TargetRef {
            project_name: self.project.clone(),
            target_name: self.target.clone(),
        }
    }
}

/// Heading of a grouped node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "label", rename_all = "lowercase")]
pub enum NodeHeading {
    Group(String),
    Others,
}

impl NodeHeading {
    pub fn label(&self) -> &str {
        match self {
            NodeHeading::Group(label) => label,
            NodeHeading::Others => OTHERS_LABEL,
        }
    }
}

impl fmt::Display for NodeHeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A group container and its rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNode {
    pub heading: NodeHeading,
    pub count: usize,
    pub items: Vec<DisplayItem>,
}

/// Result of [`present`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", content = "entries", rename_all = "lowercase")]
pub enum DisplayTree {
    Flat(Vec<DisplayItem>),
    Grouped(Vec<DisplayNode>),
}

impl DisplayTree {
    /// Every item in display order.
    pub fn items(&self) -> Box<dyn Iterator<Item = &DisplayItem> + '_> {
        match self {
            DisplayTree::Flat(items) => Box::new(items.iter()),
            DisplayTree::Grouped(nodes) => Box::new(nodes.iter().flat_map(|n| n.items.iter())),
        }
    }

    /// Target names in display order.
    pub fn target_names(&self) -> Vec<&str> {
        self.items().map(|i| i.target.0.as_str()).collect()
    }
}

/// Project `grouping` (computed from `project`) into a [`DisplayTree`].
pub fn present(project: &Project, grouping: &GroupingResult) -> DisplayTree {
    let item = |name: &TargetName| {
        let target = project.target(&name.0);
        DisplayItem {
            project: project.name.clone(),
            target: name.clone(),
            executor: target.and_then(|t| t.executor.clone()),
            configurations: target.map(|t| t.configuration_names()).unwrap_or_default(),
        }
    };

    if !grouping.has_groups() {
        return DisplayTree::Flat(grouping.ungrouped().iter().map(item).collect());
    }

    let mut nodes: Vec<DisplayNode> = grouping
        .groups()
        .iter()
        .filter(|g| !g.targets.is_empty())
        .map(|g| DisplayNode {
            heading: NodeHeading::Group(g.label.clone()),
            count: g.targets.len(),
            items: g.targets.iter().map(item).collect(),
        })
        .collect();
    nodes.push(DisplayNode {
        heading: NodeHeading::Others,
        count: grouping.ungrouped().len(),
        items: grouping.ungrouped().iter().map(item).collect(),
    });
    DisplayTree::Grouped(nodes)
}

type Hook = Box<dyn Fn(&TargetRef)>;

/// Optional callbacks wired through from the caller, invoked with a [`TargetRef`].
#[derive(Default)]
pub struct ActionHooks {
    on_run_target: Option<Hook>,
    on_view_in_task_graph: Option<Hook>,
}

impl ActionHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_run_target(mut self, hook: impl Fn(&TargetRef) + 'static) -> Self {
        self.on_run_target = Some(Box::new(hook));
        self
    }

    pub fn on_view_in_task_graph(mut self, hook: impl Fn(&TargetRef) + 'static) -> Self {
        self.on_view_in_task_graph = Some(Box::new(hook));
        self
    }

    /// Invoke the run hook for `item`. Returns `false` when none is wired.
    pub fn run_target(&self, item: &DisplayItem) -> bool {
        Self::fire(&self.on_run_target, item)
    }

    /// Invoke the task-graph hook for `item`. Returns `false` when none is wired.
    pub fn view_in_task_graph(&self, item: &DisplayItem) -> bool {
        Self::fire(&self.on_view_in_task_graph, item)
    }

    fn fire(hook: &Option<Hook>, item: &DisplayItem) -> bool {
        match hook {
            Some(hook) => {
                hook(&item.target_ref());
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for ActionHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionHooks")
            .field("on_run_target", &self.on_run_target.is_some())
            .field("on_view_in_task_graph", &self.on_view_in_task_graph.is_some())
            .finish()
    }
}
