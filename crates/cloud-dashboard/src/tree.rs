//! Version tree: minor version → patch version → tenant → project → cluster.
//!
//! The tree is rebuilt from scratch every refresh and then reconciled with
//! the tree on screen. Nodes are matched by key within their level, never by
//! position, so that expand/collapse state survives reordering.

use std::cmp::Ordering;

use cloud_api::models::ClusterResponse;

/// Placeholder label for a missing tenant or project.
const MISSING: &str = "-";

/// One node of the version tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// Identity of the node among its siblings.
    pub key: String,
    /// Displayed text.
    pub label: String,
    /// Whether the children are shown.
    pub expanded: bool,
    /// Child nodes.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn new(key: impl Into<String>, label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            expanded: false,
            children,
        }
    }
}

/// Minor version of a kubernetes version string: `1.24.3` → `1.24`.
pub fn minor_version(version: &str) -> &str {
    match version.match_indices('.').nth(1) {
        Some((idx, _)) => &version[..idx],
        None => version,
    }
}

/// Compare dotted versions numerically per component.
///
/// Components that are not numbers compare as strings, and a version that is
/// a prefix of another sorts first.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(l), Ok(r)) => l.cmp(&r),
                    _ => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Group items by key, keeping first-seen order inside each group.
fn group_by<'a, F>(
    clusters: &[&'a ClusterResponse],
    key: F,
) -> Vec<(String, Vec<&'a ClusterResponse>)>
where
    F: Fn(&ClusterResponse) -> String,
{
    let mut groups: Vec<(String, Vec<&'a ClusterResponse>)> = Vec::new();
    for &cluster in clusters {
        let k = key(cluster);
        match groups.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, members)) => members.push(cluster),
            None => groups.push((k, vec![cluster])),
        }
    }
    groups
}

fn text_or_missing(value: Option<&String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| MISSING.to_string())
}

fn leaf(cluster: &ClusterResponse) -> TreeNode {
    let name = cluster.name.as_deref().unwrap_or(MISSING);
    let id = cluster.id.as_deref().unwrap_or(MISSING);
    let key = cluster
        .id
        .clone()
        .or_else(|| cluster.name.clone())
        .unwrap_or_default();
    TreeNode::new(key, format!("{name} ({id})"), Vec::new())
}

fn projects(clusters: &[&ClusterResponse]) -> Vec<TreeNode> {
    let mut groups = group_by(clusters, |c| text_or_missing(c.project_id.as_ref()));
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups
        .into_iter()
        .map(|(project, members)| {
            let mut leaves: Vec<TreeNode> = members.into_iter().map(leaf).collect();
            leaves.sort_by(|a, b| a.label.cmp(&b.label));
            TreeNode::new(project.clone(), project, leaves)
        })
        .collect()
}

fn tenants(clusters: &[&ClusterResponse]) -> Vec<TreeNode> {
    let mut groups = group_by(clusters, |c| text_or_missing(c.tenant.as_ref()));
    groups.sort_by(|a, b| a.0.cmp(&b.0));
    groups
        .into_iter()
        .map(|(tenant, members)| TreeNode::new(tenant.clone(), tenant, projects(&members)))
        .collect()
}

/// Build the version tree for the given clusters.
///
/// Clusters without a kubernetes version are not part of the tree.
pub fn build_version_tree<'a, I>(clusters: I) -> Vec<TreeNode>
where
    I: IntoIterator<Item = &'a ClusterResponse>,
{
    let versioned: Vec<&ClusterResponse> = clusters
        .into_iter()
        .filter(|c| c.version().is_some_and(|v| !v.is_empty()))
        .collect();

    let mut minors = group_by(&versioned, |c| {
        minor_version(c.version().unwrap_or_default()).to_string()
    });
    minors.sort_by(|a, b| compare_versions(&a.0, &b.0));

    minors
        .into_iter()
        .map(|(minor, members)| {
            let mut patches = group_by(&members, |c| c.version().unwrap_or_default().to_string());
            patches.sort_by(|a, b| compare_versions(&a.0, &b.0));

            let children = patches
                .into_iter()
                .map(|(patch, members)| {
                    let label = format!("{patch} ({})", members.len());
                    TreeNode::new(patch, label, tenants(&members))
                })
                .collect();

            let label = format!("{minor} ({})", members.len());
            TreeNode::new(minor, label, children)
        })
        .collect()
}

/// Carry expand state from `previous` into `next`, matching nodes by key.
///
/// Returns the reconciled tree and whether labels or structure differ from
/// `previous`. Expand state alone never counts as a change.
pub fn reconcile(previous: &[TreeNode], mut next: Vec<TreeNode>) -> (Vec<TreeNode>, bool) {
    let changed = reconcile_level(previous, &mut next);
    (next, changed)
}

fn reconcile_level(previous: &[TreeNode], next: &mut [TreeNode]) -> bool {
    let mut changed = previous.len() != next.len();
    let mut used = vec![false; previous.len()];

    for (position, node) in next.iter_mut().enumerate() {
        let matched = (0..previous.len()).find(|&i| !used[i] && previous[i].key == node.key);
        let Some(index) = matched else {
            changed = true;
            continue;
        };
        used[index] = true;

        let old = &previous[index];
        node.expanded = old.expanded;
        changed |= index != position;
        changed |= old.label != node.label;
        changed |= reconcile_level(&old.children, &mut node.children);
    }

    changed
}

/// A node as displayed, flattened from the expanded part of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// Nesting depth, 0 for version roots.
    pub depth: usize,
    /// Displayed text.
    pub label: String,
    /// Whether the node has children.
    pub has_children: bool,
    /// Whether the node is expanded.
    pub expanded: bool,
    /// Keys from the root down to this node.
    pub key_path: Vec<String>,
}

/// The version tree on screen, with its selection.
#[derive(Debug, Clone, Default)]
pub struct VersionTree {
    roots: Vec<TreeNode>,
    selected: usize,
}

impl VersionTree {
    /// Root nodes.
    pub fn roots(&self) -> &[TreeNode] {
        &self.roots
    }

    /// Index of the selected visible row.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Rebuild from a snapshot and reconcile with the current tree.
    ///
    /// The selection follows the selected node when it still exists.
    pub fn update<'a, I>(&mut self, clusters: I) -> bool
    where
        I: IntoIterator<Item = &'a ClusterResponse>,
    {
        let selected_path = self
            .visible_rows()
            .into_iter()
            .nth(self.selected)
            .map(|row| row.key_path);

        let (roots, changed) = reconcile(&self.roots, build_version_tree(clusters));
        self.roots = roots;

        let rows = self.visible_rows();
        self.selected = selected_path
            .and_then(|path| rows.iter().position(|row| row.key_path == path))
            .unwrap_or_else(|| self.selected.min(rows.len().saturating_sub(1)));

        changed
    }

    /// Rows currently visible, depth first.
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        fn walk(nodes: &[TreeNode], depth: usize, path: &mut Vec<String>, rows: &mut Vec<TreeRow>) {
            for node in nodes {
                path.push(node.key.clone());
                rows.push(TreeRow {
                    depth,
                    label: node.label.clone(),
                    has_children: !node.children.is_empty(),
                    expanded: node.expanded,
                    key_path: path.clone(),
                });
                if node.expanded {
                    walk(&node.children, depth + 1, path, rows);
                }
                path.pop();
            }
        }

        let mut rows = Vec::new();
        walk(&self.roots, 0, &mut Vec::new(), &mut rows);
        rows
    }

    /// Move the selection down.
    pub fn select_next(&mut self) {
        let count = self.visible_rows().len();
        if self.selected + 1 < count {
            self.selected += 1;
        }
    }

    /// Move the selection up.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Expand or collapse the selected node.
    pub fn toggle_selected(&mut self) {
        let Some(row) = self.visible_rows().into_iter().nth(self.selected) else {
            return;
        };
        if let Some(node) = find_mut(&mut self.roots, &row.key_path) {
            node.expanded = !node.expanded;
        }
    }

    /// Expand or collapse every node.
    pub fn set_all_expanded(&mut self, expanded: bool) {
        fn walk(nodes: &mut [TreeNode], expanded: bool) {
            for node in nodes {
                node.expanded = expanded;
                walk(&mut node.children, expanded);
            }
        }
        walk(&mut self.roots, expanded);
    }
}

fn find_mut<'a>(nodes: &'a mut [TreeNode], path: &[String]) -> Option<&'a mut TreeNode> {
    let (first, rest) = path.split_first()?;
    let node = nodes.iter_mut().find(|n| &n.key == first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        find_mut(&mut node.children, rest)
    }
}
