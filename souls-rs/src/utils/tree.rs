//! Tree rendering for hierarchical file contents

use console::Style;

use super::format::format_len;

/// Represents a node in a tree structure
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub node_type: NodeType,
    pub size: Option<usize>,
    pub children: Vec<TreeNode>,
    pub metadata: Vec<(String, String)>,
}

/// Types of nodes in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Root,
    Header,
    Bone,
    Material,
    Mesh,
    Texture,
}

/// Options for tree rendering
#[derive(Debug, Clone, Default)]
pub struct TreeOptions {
    pub max_depth: Option<usize>,
    pub no_color: bool,
    pub show_metadata: bool,
}

impl TreeNode {
    /// Create a new tree node
    pub fn new(name: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            name: name.into(),
            node_type,
            size: None,
            children: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Add a child node
    pub fn add_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// Set the size of this node
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = Some(size);
        self
    }

    /// Add metadata
    pub fn with_metadata(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.push((key.to_string(), value.to_string()));
        self
    }
}

impl NodeType {
    /// Get emoji icon for node type
    pub fn icon(self) -> &'static str {
        match self {
            NodeType::Root => "📁",
            NodeType::Header => "📋",
            NodeType::Bone => "🦴",
            NodeType::Material => "🎨",
            NodeType::Mesh => "🔺",
            NodeType::Texture => "🖼️",
        }
    }

    /// Get color style for node type
    pub fn style(self, no_color: bool) -> Style {
        if no_color {
            Style::new()
        } else {
            match self {
                NodeType::Root => Style::new().bold().cyan(),
                NodeType::Header => Style::new().bold().yellow(),
                NodeType::Bone => Style::new().white(),
                NodeType::Material => Style::new().blue(),
                NodeType::Mesh => Style::new().green(),
                NodeType::Texture => Style::new().yellow(),
            }
        }
    }
}

/// Render a tree structure to string
pub fn render_tree(root: &TreeNode, options: &TreeOptions) -> String {
    let mut output = String::new();
    render_node(root, &mut output, "", true, 0, options);
    output
}

fn render_node(
    node: &TreeNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &TreeOptions,
) {
    if let Some(max_depth) = options.max_depth
        && depth > max_depth
    {
        return;
    }

    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };
    let style = node.node_type.style(options.no_color);

    output.push_str(&format!(
        "{prefix}{connector}{} {}",
        node.node_type.icon(),
        style.apply_to(&node.name)
    ));
    if let Some(size) = node.size {
        output.push_str(&format!(" ({})", format_len(size)));
    }
    output.push('\n');

    let child_prefix = if depth == 0 {
        String::new()
    } else {
        format!("{prefix}{}", if is_last { "    " } else { "│   " })
    };

    if options.show_metadata {
        let meta_style = if options.no_color { Style::new() } else { Style::new().dim() };
        for (key, value) in &node.metadata {
            output.push_str(&format!("{child_prefix}    {}: {value}\n", meta_style.apply_to(key)));
        }
    }

    for (i, child) in node.children.iter().enumerate() {
        let is_last_child = i + 1 == node.children.len();
        render_node(child, output, &child_prefix, is_last_child, depth + 1, options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_tree() {
        let root = TreeNode::new("model", NodeType::Root)
            .add_child(TreeNode::new("a", NodeType::Bone).add_child(TreeNode::new("b", NodeType::Bone)))
            .add_child(TreeNode::new("c", NodeType::Mesh).with_metadata("vertices", 3));
        let options = TreeOptions {
            no_color: true,
            show_metadata: true,
            ..TreeOptions::default()
        };

        let rendered = render_tree(&root, &options);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "📁 model");
        assert_eq!(lines[1], "├── 🦴 a");
        assert_eq!(lines[2], "│   └── 🦴 b");
        assert_eq!(lines[3], "└── 🔺 c");
        assert_eq!(lines[4], "        vertices: 3");
    }

    #[test]
    fn test_max_depth() {
        let root = TreeNode::new("root", NodeType::Root)
            .add_child(TreeNode::new("child", NodeType::Bone).add_child(TreeNode::new("grandchild", NodeType::Bone)));
        let options = TreeOptions {
            max_depth: Some(1),
            no_color: true,
            ..TreeOptions::default()
        };

        let rendered = render_tree(&root, &options);
        assert!(rendered.contains("child"));
        assert!(!rendered.contains("grandchild"));
    }
}
