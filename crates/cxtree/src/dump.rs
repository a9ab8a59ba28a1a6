use crate::traverse::WalkEvent;
use crate::{Accessor, Node, Result};

impl Node {
    /// Indented `Kind@start..end` outline of the subtree, with names, operators
    /// and literal spellings where the kind has them.
    pub fn debug_tree(&self) -> Result<String> {
        let mut out = String::new();
        let mut depth = 0usize;
        for event in self.preorder()? {
            let node = match event? {
                WalkEvent::Enter(node) => node,
                WalkEvent::Leave(_) => {
                    depth -= 1;
                    continue;
                }
            };
            let range = node.range()?;
            let indent = depth * 2;
            out.push_str(&format!("{:indent$}{}@{:?}", "", node.kind()?, range));
            if node.supports(Accessor::DeclaredName)? {
                out.push_str(&format!(" {:?}", node.name()?));
            }
            if node.supports(Accessor::OperatorSpelling)? {
                out.push_str(&format!(" '{}'", node.operator_spelling()?));
            }
            if node.supports(Accessor::LiteralSpelling)? {
                out.push_str(&format!(" {}", node.literal_spelling()?));
            }
            out.push('\n');
            depth += 1;
        }
        Ok(out)
    }
}
