//! Bounded subtree materialization with a recycling node pool.
//!
//! Task elements dominate a compilation log (millions per file), and each one
//! is materialized to inspect `task_done`, `failure` and `code_cache`. The
//! frozen output is small; the churn is in the mutable builder nodes used
//! while the subtree is still open. Those builders live in a [`NodePool`]:
//! an arena of slots plus a LIFO free-list of slot indices, so acquiring and
//! releasing a builder is O(1) and keeps its buffers' capacity.
//!
//! Materialization is iterative (explicit stack of slot indices), so document
//! depth never grows the call stack.

use super::element::{Attributes, XmlElement};
use super::token::{Token, TokenSource};
use crate::utils::error::IngestError;
use log::trace;
use std::io::BufRead;

/// Mutable element under construction
#[derive(Debug, Default)]
pub struct BuilderNode {
    name: String,
    attributes: Attributes,
    children: Vec<XmlElement>,
    content: Option<String>,
}

impl BuilderNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    fn reset(&mut self, name: &str, attributes: Attributes) {
        self.clear();
        self.name.push_str(name);
        self.attributes = attributes;
    }

    fn clear(&mut self) {
        self.name.clear();
        self.attributes.clear();
        self.children.clear();
        self.content = None;
    }

    fn append_text(&mut self, text: &str) {
        match &mut self.content {
            Some(content) => content.push_str(text),
            None => self.content = Some(text.to_string()),
        }
    }
}

/// Arena of builder nodes with a LIFO free-list
///
/// Slots are addressed by index. The most recently released slot is handed
/// out first.
#[derive(Debug, Default)]
pub struct NodePool {
    slots: Vec<BuilderNode>,
    free: Vec<usize>,
}

impl NodePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a builder for a new element, reusing a released slot if any
    pub fn acquire(&mut self, name: &str, attributes: Attributes) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.slots[index].reset(name, attributes);
                index
            }
            None => {
                let mut node = BuilderNode::default();
                node.reset(name, attributes);
                self.slots.push(node);
                self.slots.len() - 1
            }
        }
    }

    /// Return a slot to the pool; its contents are cleared immediately
    pub fn release(&mut self, index: usize) {
        debug_assert!(!self.free.contains(&index), "slot {index} released twice");
        self.slots[index].clear();
        self.free.push(index);
    }

    pub fn node(&self, index: usize) -> &BuilderNode {
        &self.slots[index]
    }

    /// Total number of slots ever allocated
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots ready for reuse
    pub fn available(&self) -> usize {
        self.free.len()
    }

    /// Freeze a builder into an immutable element and release its slot
    fn freeze(&mut self, index: usize) -> XmlElement {
        let node = &mut self.slots[index];
        let element = XmlElement {
            name: node.name.clone(),
            attributes: std::mem::take(&mut node.attributes),
            children: node.children.drain(..).collect(),
            content: node.content.take(),
        };
        self.release(index);
        element
    }
}

/// Reconstructs the subtree of the element the token source is positioned at
#[derive(Debug, Default)]
pub struct TreeMaterializer {
    pool: NodePool,
    stack: Vec<usize>,
}

impl TreeMaterializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(&self) -> &NodePool {
        &self.pool
    }

    /// Materialize the element just opened on `source`
    ///
    /// **Public** - used by the extractor for version and task elements
    ///
    /// # Arguments
    /// * `source` - token source whose last token is an `Open`
    /// * `allowed_children` - if set, only direct children of the root with
    ///   one of these names are kept; the others are skipped unparsed
    ///
    /// # Returns
    /// The frozen root; the source is left just after its close
    ///
    /// # Errors
    /// * `IngestError::MalformedInput` - source not at an element start, or
    ///   the stream ends inside the subtree
    pub fn materialize<R: BufRead>(
        &mut self,
        source: &mut TokenSource<R>,
        allowed_children: Option<&[&str]>,
    ) -> Result<XmlElement, IngestError> {
        let root_is_empty = match source.last_token() {
            Some(Token::Open { is_empty }) => is_empty,
            other => {
                return Err(IngestError::MalformedInput(format!(
                    "cannot materialize: not at an element start ({other:?})"
                )))
            }
        };

        if root_is_empty {
            let attributes = source.take_attributes();
            return Ok(XmlElement::leaf(source.name(), attributes));
        }

        // Leftovers from an aborted materialization
        for index in self.stack.drain(..) {
            self.pool.release(index);
        }

        let attributes = source.take_attributes();
        let root = self.pool.acquire(source.name(), attributes);
        self.stack.push(root);

        loop {
            match source.next_token()? {
                Token::Open { is_empty } => {
                    let depth = self.stack.len();
                    if depth == 1 {
                        if let Some(allowed) = allowed_children {
                            if !allowed.contains(&source.name()) {
                                trace!("skipping <{}> while materializing", source.name());
                                source.skip_element()?;
                                continue;
                            }
                        }
                    }

                    let attributes = source.take_attributes();
                    if is_empty {
                        let leaf = XmlElement::leaf(source.name(), attributes);
                        self.current()?.children.push(leaf);
                    } else {
                        let child = self.pool.acquire(source.name(), attributes);
                        self.stack.push(child);
                    }
                }
                Token::Text => {
                    self.current()?.append_text(source.text());
                }
                Token::Close => {
                    let Some(index) = self.stack.pop() else {
                        return Err(IngestError::MalformedInput(
                            "close without open while materializing".to_string(),
                        ));
                    };
                    let element = self.pool.freeze(index);
                    match self.stack.last() {
                        Some(&parent) => self.pool.slots[parent].children.push(element),
                        None => return Ok(element),
                    }
                }
                Token::Eof => {
                    return Err(IngestError::MalformedInput(
                        "unexpected end of input while materializing".to_string(),
                    ))
                }
            }
        }
    }

    fn current(&mut self) -> Result<&mut BuilderNode, IngestError> {
        match self.stack.last() {
            Some(&index) => Ok(&mut self.pool.slots[index]),
            None => Err(IngestError::MalformedInput(
                "content after the materialized root closed".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn materialize(xml: &str, allowed: Option<&[&str]>) -> (XmlElement, TreeMaterializer) {
        let mut source = TokenSource::new(xml.as_bytes());
        source.next_token().unwrap();
        let mut materializer = TreeMaterializer::new();
        let element = materializer.materialize(&mut source, allowed).unwrap();
        (element, materializer)
    }

    #[test]
    fn test_materialize_nested() {
        let (root, _) = materialize(
            "<vm_version><name>VM</name><release>\n 21.0.1+12-b509.1 \n</release><info/></vm_version>",
            None,
        );

        assert_eq!(root.name, "vm_version");
        assert_eq!(root.children.len(), 3);
        assert_eq!(root.child("name").unwrap().content.as_deref(), Some("VM"));
        assert_eq!(
            root.child("release").unwrap().content.as_deref().map(str::trim),
            Some("21.0.1+12-b509.1")
        );
        assert!(root.child("info").unwrap().children.is_empty());
    }

    #[test]
    fn test_attributes_round_trip() {
        let xml = "<task compile_id='7' method='a.B c ()V' stamp='0.104'><task_done success='1' nmsize='120' stamp='0.110'/></task>";
        let mut source = TokenSource::new(xml.as_bytes());
        source.next_token().unwrap();
        let expected = source.attributes().clone();

        let root = TreeMaterializer::new().materialize(&mut source, None).unwrap();
        assert_eq!(root.attributes, expected);
        for (name, value) in expected.iter() {
            assert_eq!(root.attribute(name), Some(value));
        }
    }

    #[test]
    fn test_allow_list_filters_direct_children_only() {
        let (root, _) = materialize(
            "<task><phase name='parse'><x/></phase><code_cache total_blobs='1'/><task_done success='1'><inner/></task_done></task>",
            Some(&["task_done", "failure", "code_cache"]),
        );

        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["code_cache", "task_done"]);
        assert_eq!(root.child("task_done").unwrap().count("inner"), 1);
    }

    #[test]
    fn test_empty_root_is_leaf() {
        let (root, materializer) = materialize("<task stamp='1.0'/>", None);
        assert_eq!(root.attribute("stamp"), Some("1.0"));
        assert!(root.children.is_empty());
        assert_eq!(materializer.pool().capacity(), 0);
    }

    #[test]
    fn test_empty_children_bypass_pool() {
        let (_, materializer) = materialize("<a><b/><c/><d/></a>", None);
        assert_eq!(materializer.pool().capacity(), 1);
    }

    #[test]
    fn test_source_resumes_after_subtree() {
        let xml = "<log><task><task_done/></task><next id='2'/></log>";
        let mut source = TokenSource::new(xml.as_bytes());
        source.next_token().unwrap();
        source.next_token().unwrap();

        let mut materializer = TreeMaterializer::new();
        materializer.materialize(&mut source, None).unwrap();

        assert_eq!(source.next_token().unwrap(), Token::Open { is_empty: true });
        assert_eq!(source.attribute("id"), Some("2"));
    }

    #[test]
    fn test_pool_reuses_slots_across_subtrees() {
        let xml = "<log><t><a><b>x</b></a></t><t><c><d>y</d></c></t></log>";
        let mut source = TokenSource::new(xml.as_bytes());
        source.next_token().unwrap();
        let mut materializer = TreeMaterializer::new();

        source.next_token().unwrap();
        let first = materializer.materialize(&mut source, None).unwrap();
        let allocated = materializer.pool().capacity();
        assert_eq!(materializer.pool().available(), allocated);

        source.next_token().unwrap();
        let second = materializer.materialize(&mut source, None).unwrap();
        assert_eq!(materializer.pool().capacity(), allocated);

        assert_eq!(first.child("a").unwrap().child("b").unwrap().content.as_deref(), Some("x"));
        let c = second.child("c").unwrap();
        assert!(c.child("b").is_none());
        assert_eq!(c.child("d").unwrap().content.as_deref(), Some("y"));
    }

    #[test]
    fn test_pool_does_not_leak_released_state() {
        let mut pool = NodePool::new();
        let mut indices = Vec::new();
        for i in 0..4 {
            let attrs: Attributes = [("k", i.to_string())].into_iter().collect();
            let index = pool.acquire(&format!("node{i}"), attrs);
            pool.slots[index].append_text("stale");
            pool.slots[index].children.push(XmlElement::leaf("child", Attributes::new()));
            indices.push(index);
        }
        for index in indices.into_iter().rev() {
            pool.release(index);
        }

        for _ in 0..4 {
            let index = pool.acquire("fresh", Attributes::new());
            let node = pool.node(index);
            assert_eq!(node.name(), "fresh");
            assert!(node.attributes().is_empty());
            assert!(node.children().is_empty());
            assert_eq!(node.content(), None);
        }
        assert_eq!(pool.capacity(), 4);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn test_pool_is_lifo() {
        let mut pool = NodePool::new();
        let a = pool.acquire("a", Attributes::new());
        let b = pool.acquire("b", Attributes::new());
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.acquire("c", Attributes::new()), b);
        assert_eq!(pool.acquire("d", Attributes::new()), a);
    }
}
