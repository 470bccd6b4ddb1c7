//! Dependency-tree rendering for diagnostics: a hierarchical view of what
//! resolved from what, with cache/shared annotations and cycle markers.
//!
//! A plain builder-style `DependencyNode` plus a box-drawing (or ASCII) tree
//! renderer. Nodes are supplied by the caller — this module does not walk a
//! container's internals to build them, since nothing in the engine records
//! the shape of a past resolution; a host assembles the tree it wants
//! rendered from whatever it already knows about its own assembly.

/// One node in a rendered dependency tree.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    pub name: String,
    pub children: Vec<DependencyNode>,
    pub shared: bool,
    pub cached: bool,
    pub note: Option<String>,
    pub cycle: bool,
}

impl DependencyNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            shared: false,
            cached: false,
            note: None,
            cycle: false,
        }
    }

    #[must_use]
    pub fn child(mut self, child: DependencyNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: Vec<DependencyNode>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }

    #[must_use]
    pub fn cached(mut self) -> Self {
        self.cached = true;
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn cycle(mut self) -> Self {
        self.cycle = true;
        self
    }
}

/// Whether to draw the tree with plain ASCII connectors or Unicode
/// box-drawing characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeStyle {
    Ascii,
    Unicode,
}

struct TreeGlyphs {
    branch: &'static str,
    last: &'static str,
    vertical: &'static str,
    spacer: &'static str,
}

impl TreeGlyphs {
    fn for_style(style: TreeStyle) -> Self {
        match style {
            TreeStyle::Ascii => Self {
                branch: "+-",
                last: "\\-",
                vertical: "| ",
                spacer: "  ",
            },
            TreeStyle::Unicode => Self {
                branch: "├─",
                last: "└─",
                vertical: "│ ",
                spacer: "  ",
            },
        }
    }
}

/// Renders a forest of [`DependencyNode`]s to a string.
#[derive(Debug, Clone)]
pub struct DependencyTreeDisplay {
    style: TreeStyle,
    roots: Vec<DependencyNode>,
    title: Option<String>,
    cycle_paths: Vec<Vec<String>>,
}

impl DependencyTreeDisplay {
    #[must_use]
    pub fn new(style: TreeStyle, roots: Vec<DependencyNode>) -> Self {
        Self {
            style,
            roots,
            title: Some("Dependency Tree".to_string()),
            cycle_paths: Vec::new(),
        }
    }

    #[must_use]
    pub fn title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub fn with_cycle_path(mut self, path: Vec<String>) -> Self {
        if !path.is_empty() {
            self.cycle_paths.push(path);
        }
        self
    }

    #[must_use]
    pub fn render(&self) -> String {
        if self.roots.is_empty() {
            return "No components resolved.".to_string();
        }

        let glyphs = TreeGlyphs::for_style(self.style);
        let mut lines = Vec::new();

        if let Some(title) = &self.title {
            lines.push(title.clone());
            lines.push("-".repeat(title.len()));
        }

        for (idx, root) in self.roots.iter().enumerate() {
            let is_last = idx + 1 == self.roots.len();
            Self::render_node(&mut lines, "", root, is_last, &glyphs);
        }

        if !self.cycle_paths.is_empty() {
            lines.push(String::new());
            lines.push("Cycles detected:".to_string());
            for cycle in &self.cycle_paths {
                lines.push(format!("  {}", cycle.join(" -> ")));
            }
        }

        lines.join("\n")
    }

    fn render_node(lines: &mut Vec<String>, prefix: &str, node: &DependencyNode, is_last: bool, glyphs: &TreeGlyphs) {
        let connector = if is_last { glyphs.last } else { glyphs.branch };
        lines.push(format!("{prefix}{connector} {}", Self::render_label(node)));

        let next_prefix = if is_last {
            format!("{prefix}{}", glyphs.spacer)
        } else {
            format!("{prefix}{}", glyphs.vertical)
        };

        for (idx, child) in node.children.iter().enumerate() {
            let child_is_last = idx + 1 == node.children.len();
            Self::render_node(lines, &next_prefix, child, child_is_last, glyphs);
        }
    }

    fn render_label(node: &DependencyNode) -> String {
        let mut parts = vec![node.name.clone()];
        if node.shared {
            parts.push("[shared]".to_string());
        }
        if node.cached {
            parts.push("[cached]".to_string());
        }
        if node.cycle {
            parts.push("[cycle]".to_string());
        }
        if let Some(note) = &node.note {
            parts.push(format!("- {note}"));
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_forest_renders_placeholder() {
        let display = DependencyTreeDisplay::new(TreeStyle::Ascii, vec![]);
        assert_eq!(display.render(), "No components resolved.");
    }

    #[test]
    fn renders_shared_and_cached_annotations() {
        let roots = vec![DependencyNode::new("Database").shared().cached().child(DependencyNode::new("Config"))];
        let output = DependencyTreeDisplay::new(TreeStyle::Ascii, roots).render();
        assert!(output.contains("Database"));
        assert!(output.contains("[shared]"));
        assert!(output.contains("[cached]"));
        assert!(output.contains("Config"));
    }

    #[test]
    fn unicode_style_uses_box_drawing_glyphs() {
        let roots = vec![DependencyNode::new("Root")];
        let output = DependencyTreeDisplay::new(TreeStyle::Unicode, roots).render();
        assert!(output.contains('└'));
    }

    #[test]
    fn cycle_paths_render_a_trailer_section() {
        let roots = vec![DependencyNode::new("Auth").child(DependencyNode::new("Db").cycle())];
        let output = DependencyTreeDisplay::new(TreeStyle::Ascii, roots)
            .with_cycle_path(vec!["Auth".into(), "Db".into(), "Auth".into()])
            .render();
        assert!(output.contains("[cycle]"));
        assert!(output.contains("Cycles detected:"));
        assert!(output.contains("Auth -> Db -> Auth"));
    }

    #[test]
    fn empty_cycle_path_is_ignored() {
        let roots = vec![DependencyNode::new("Root")];
        let output = DependencyTreeDisplay::new(TreeStyle::Ascii, roots)
            .with_cycle_path(vec![])
            .render();
        assert!(!output.contains("Cycles detected:"));
    }
}
