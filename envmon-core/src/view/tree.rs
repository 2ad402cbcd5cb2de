//! Collapsible hierarchy of the snapshot fields.
//!
//! The node tree is rebuilt from the snapshot on every render; which
//! branches are open lives in [`TreeView`] keyed by node id, so a refresh
//! does not reset what the user collapsed.

use chrono::NaiveDateTime;
use std::collections::HashMap;

use crate::WeatherSnapshot;

use super::NO_DATA;

/// Every node with children. All of them start expanded.
const BRANCH_IDS: &[&str] = &["root", "location", "weather", "wind"];

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub id: String,
    pub label: String,
    pub value: Option<String>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    fn branch(id: &str, label: &str, children: Vec<TreeNode>) -> Self {
        Self { id: id.to_string(), label: label.to_string(), value: None, children }
    }

    fn leaf(id: &str, label: &str, value: String) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn find(&self, id: &str) -> Option<&TreeNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Build the fixed three-branch hierarchy for a snapshot.
pub fn build(snapshot: &WeatherSnapshot, description: &str) -> TreeNode {
    TreeNode::branch(
        "root",
        "Environmental Data",
        vec![
            TreeNode::branch(
                "location",
                "Location Information",
                vec![
                    TreeNode::leaf("lat", "Latitude", format!("{}°", snapshot.latitude)),
                    TreeNode::leaf("lon", "Longitude", format!("{}°", snapshot.longitude)),
                    TreeNode::leaf("elev", "Elevation", format!("{}m", snapshot.elevation)),
                ],
            ),
            TreeNode::branch(
                "weather",
                "Weather Conditions",
                vec![
                    TreeNode::leaf("temp", "Temperature", format!("{}°C", snapshot.temperature)),
                    TreeNode::leaf("code", "Weather Code", snapshot.weathercode.to_string()),
                    TreeNode::leaf("desc", "Description", description.to_string()),
                    TreeNode::leaf("time", "Last Updated", format_observation_time(&snapshot.time)),
                ],
            ),
            TreeNode::branch(
                "wind",
                "Wind Data",
                vec![
                    TreeNode::leaf("speed", "Speed", format!("{} km/h", snapshot.windspeed)),
                    TreeNode::leaf("dir", "Direction", format!("{}°", snapshot.winddirection)),
                ],
            ),
        ],
    )
}

/// Open-Meteo reports local wall-clock time without an offset, with or without seconds.
/// Anything else is shown as received.
pub fn format_observation_time(raw: &str) -> String {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[derive(Debug, Clone)]
pub struct TreeView {
    expanded: HashMap<String, bool>,
}

impl TreeView {
    pub fn new() -> Self {
        let expanded = BRANCH_IDS.iter().map(|id| (id.to_string(), true)).collect();
        Self { expanded }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// Flip a branch open or closed. Leaves and unknown ids are left alone;
    /// returns whether anything changed.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !BRANCH_IDS.contains(&id) {
            return false;
        }
        let state = self.expanded.entry(id.to_string()).or_insert(false);
        *state = !*state;
        true
    }

    pub fn render(&self, snapshot: Option<&WeatherSnapshot>, description: &str) -> String {
        let Some(snapshot) = snapshot else {
            return NO_DATA.to_string();
        };

        let root = build(snapshot, description);
        let mut lines = Vec::new();
        self.render_node(&root, 0, &mut lines);
        lines.join("\n")
    }

    fn render_node(&self, node: &TreeNode, level: usize, lines: &mut Vec<String>) {
        let indent = "  ".repeat(level);
        let open = self.is_expanded(&node.id);

        let line = match (&node.value, node.has_children()) {
            (_, true) => {
                let marker = if open { '▾' } else { '▸' };
                format!("{indent}{marker} {} [{}]", node.label, node.id)
            }
            (Some(value), false) => format!("{indent}  {}: {value}", node.label),
            (None, false) => format!("{indent}  {}", node.label),
        };
        lines.push(line);

        if node.has_children() && open {
            for child in &node.children {
                self.render_node(child, level + 1, lines);
            }
        }
    }
}

impl Default for TreeView {
    fn default() -> Self {
        Self::new()
    }
}
