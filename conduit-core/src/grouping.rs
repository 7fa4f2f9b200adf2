//! Target grouping: partitions a project's targets into display groups.
//!
//! Every target lands in exactly one place: the group named by its label, or
//! the ungrouped residual list. Order inside each list follows target
//! declaration order; groups appear in first-seen order.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Project, TargetName};

/// Where a target was placed.
///
/// `Ungrouped` is distinct from every label, so a real group called
/// "Others" never merges with the residual list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey<'a> {
    Named(&'a str),
    Ungrouped,
}

/// One labelled group and its targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetGroup {
    pub label: String,
    pub targets: Vec<TargetName>,
}

/// Output of [`group_targets`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct GroupingResult {
    groups: Vec<TargetGroup>,
    ungrouped: Vec<TargetName>,
}

impl GroupingResult {
    /// Build directly from parts. Used by callers that assemble groups themselves.
    pub fn from_parts(groups: Vec<TargetGroup>, ungrouped: Vec<TargetName>) -> Self {
        Self { groups, ungrouped }
    }

    /// Groups in first-seen order.
    pub fn groups(&self) -> &[TargetGroup] {
        &self.groups
    }

    pub fn ungrouped(&self) -> &[TargetName] {
        &self.ungrouped
    }

    pub fn group(&self, label: &str) -> Option<&[TargetName]> {
        self.groups
            .iter()
            .find(|g| g.label == label)
            .map(|g| g.targets.as_slice())
    }

    /// `true` if at least one group holds a target.
    pub fn has_groups(&self) -> bool {
        self.groups.iter().any(|g| !g.targets.is_empty())
    }

    /// Where `target` was placed, if it belongs to the project at all.
    pub fn locate(&self, target: &str) -> Option<GroupKey<'_>> {
        if let Some(g) = self
            .groups
            .iter()
            .find(|g| g.targets.iter().any(|t| t.0 == target))
        {
            return Some(GroupKey::Named(&g.label));
        }
        if self.ungrouped.iter().any(|t| t.0 == target) {
            return Some(GroupKey::Ungrouped);
        }
        None
    }

    /// Every bucket, groups first and the residual list last.
    pub fn iter(&self) -> impl Iterator<Item = (GroupKey<'_>, &[TargetName])> {
        self.groups
            .iter()
            .map(|g| (GroupKey::Named(g.label.as_str()), g.targets.as_slice()))
            .chain(std::iter::once((
                GroupKey::Ungrouped,
                self.ungrouped.as_slice(),
            )))
    }

    /// Total number of placed targets.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.targets.len()).sum::<usize>() + self.ungrouped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition the targets of `project` by group label.
pub fn group_targets(project: &Project) -> GroupingResult {
    let mut groups: Vec<TargetGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut ungrouped = Vec::new();

    for target in project.targets() {
        match target.group.as_deref() {
            Some(label) if !label.trim().is_empty() => {
                let slot = *index.entry(label).or_insert_with(|| {
                    groups.push(TargetGroup {
                        label: label.to_string(),
                        targets: Vec::new(),
                    });
                    groups.len() - 1
                });
                groups[slot].targets.push(target.name.clone());
            }
            _ => ungrouped.push(target.name.clone()),
        }
    }

    GroupingResult { groups, ungrouped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TargetDefinition;

    fn project(targets: Vec<TargetDefinition>) -> Project {
        Project::new("shop", "apps/shop", targets).expect("project")
    }

    fn names(list: &[TargetName]) -> Vec<&str> {
        list.iter().map(|t| t.0.as_str()).collect()
    }

    #[test]
    fn groups_by_label_and_keeps_residual() {
        let p = project(vec![
            TargetDefinition::new("build").with_group("build"),
            TargetDefinition::new("test"),
            TargetDefinition::new("lint").with_group("build"),
        ]);
        let result = group_targets(&p);
        assert_eq!(result.groups().len(), 1);
        assert_eq!(names(result.group("build").unwrap()), vec!["build", "lint"]);
        assert_eq!(names(result.ungrouped()), vec!["test"]);
    }

    #[test]
    fn group_order_is_first_seen() {
        let p = project(vec![
            TargetDefinition::new("e2e").with_group("testing"),
            TargetDefinition::new("build").with_group("compile"),
            TargetDefinition::new("unit").with_group("testing"),
        ]);
        let result = group_targets(&p);
        let labels: Vec<&str> = result
            .groups()
            .iter()
            .map(|g| g.label.as_str())
            .collect();
        assert_eq!(labels, vec!["testing", "compile"]);
    }

    #[test]
    fn empty_project_has_nothing() {
        let result = group_targets(&project(vec![]));
        assert!(result.is_empty());
        assert!(!result.has_groups());
    }

    #[test]
    fn group_named_others_is_not_the_residual() {
        let p = project(vec![
            TargetDefinition::new("a").with_group("Others"),
            TargetDefinition::new("b"),
        ]);
        let result = group_targets(&p);
        assert_eq!(result.locate("a"), Some(GroupKey::Named("Others")));
        assert_eq!(result.locate("b"), Some(GroupKey::Ungrouped));
        assert_eq!(result.locate("missing"), None);
    }

    #[test]
    fn iter_puts_residual_last() {
        let p = project(vec![
            TargetDefinition::new("a"),
            TargetDefinition::new("b").with_group("g"),
        ]);
        let result = group_targets(&p);
        let keys: Vec<GroupKey<'_>> = result.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![GroupKey::Named("g"), GroupKey::Ungrouped]);
    }
}
