//! Static view tree produced by components.

/// Height given to a leaf that sets none.
pub const LINE_HEIGHT: f32 = 40.0;

/// One element of a component's view. `key` names elements a component wants
/// back after layout; keys are unique within one mount.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Node {
    pub tag: String,
    pub dom_id: Option<String>,
    pub classes: Vec<String>,
    pub text: Option<String>,
    pub href: Option<String>,
    pub key: Option<String>,
    pub children: Vec<Node>,
    /// Children per row; 1 stacks them vertically.
    pub columns: usize,
    /// Space between rows.
    pub gap: f32,
    pub min_height: f32,
}

impl Node {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            columns: 1,
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.dom_id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = columns.max(1);
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn min_height(mut self, height: f32) -> Self {
        self.min_height = height;
        self
    }

    /// Number of nodes in this subtree, this one included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// Pre-order walk.
    pub fn walk<'a>(&'a self, out: &mut Vec<&'a Node>) {
        out.push(self);
        for c in &self.children {
            c.walk(out);
        }
    }

    /// First node in the subtree whose text equals `text`.
    pub fn find_text(&self, text: &str) -> Option<&Node> {
        if self.text.as_deref() == Some(text) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_text(text))
    }
}

/// `<a>` with a label.
pub fn link(name: &str, href: &str) -> Node {
    Node::new("a").text(name).href(href)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_and_walk() {
        let tree = Node::new("ul")
            .class("menu")
            .children(["Home", "Pricing"].map(|n| Node::new("li").child(link(n, "/"))));
        assert_eq!(tree.count(), 5);
        let mut all = Vec::new();
        tree.walk(&mut all);
        assert_eq!(all[2].text.as_deref(), Some("Home"));
        assert!(tree.find_text("Pricing").is_some());
        assert_eq!(Node::new("div").columns(0).columns, 1);
    }
}
