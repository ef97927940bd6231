//! Debug rendering of trees.
//!
//! Each line reads `<type> [start_row, start_col] - [end_row, end_col]`,
//! indented by four spaces per depth level. Used for inspection and
//! snapshot tests, not as a machine-readable format.

use std::fmt;

use super::node::Node;
use super::tree::Tree;
use crate::constants::RENDERED_LEAF_KINDS;

const INDENT: &str = "    ";

fn write_node(out: &mut String, node: Node<'_>, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(&format!(
        "{} {} - {}\n",
        node.kind(),
        node.start_point(),
        node.end_point()
    ));
}

fn render_filtered<F>(root: Node<'_>, base_depth: usize, keep: F) -> String
where
    F: Fn(Node<'_>) -> bool,
{
    let mut out = String::new();
    let mut stack = vec![(root, base_depth)];
    while let Some((node, depth)) = stack.pop() {
        if keep(node) {
            write_node(&mut out, node, depth);
        }
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

/// Renders every node of the subtree rooted at `root`.
#[must_use]
pub fn render_subtree(root: Node<'_>) -> String {
    render_filtered(root, 0, |_| true)
}

/// Camel-cases a language tag: `c-sharp` becomes `CSharp`.
fn language_title(lang: &str) -> String {
    lang.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect()
}

impl Tree {
    /// Renders every node, root at depth zero.
    #[must_use]
    pub fn render_all(&self) -> String {
        render_subtree(self.root())
    }

    /// Renders inner nodes plus identifier/number leaves below a header line.
    #[must_use]
    pub fn render(&self) -> String {
        let source = self.source();
        let line_count = source.lines().count();
        let last_len = source.lines().last().map_or(0, |line| line.chars().count());
        let body = render_filtered(self.root(), 1, |node| {
            !node.is_leaf() || RENDERED_LEAF_KINDS.contains(&node.kind())
        });
        format!(
            "{}CodeAST [0, 0] - [{line_count}, {last_len}]\n{body}",
            language_title(self.language())
        )
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
