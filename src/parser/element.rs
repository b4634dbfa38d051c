//! Attribute lists and frozen element snapshots.
//!
//! These are the only tree-shaped values the parser hands out. An
//! [`XmlElement`] is immutable once built: its children are an exact-length
//! boxed slice, not a growable vector.

/// Attribute list of one element, looked up by local name
///
/// Compilation log elements carry a handful of attributes, so a flat list
/// beats a hash map both in lookup time and allocation count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Value of the first attribute with this name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Immutable snapshot of one element and its retained descendants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Attributes,
    pub children: Box<[XmlElement]>,
    /// Concatenated non-whitespace text, if any
    pub content: Option<String>,
}

impl XmlElement {
    /// Element without children or text (self-closing in the source)
    pub fn leaf(name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            attributes,
            children: Box::default(),
            content: None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    /// First direct child with this name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    pub fn count(&self, name: &str) -> usize {
        self.children_named(name).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup_by_name() {
        let attrs: Attributes = [("stamp", "0.104"), ("success", "1")].into_iter().collect();
        assert_eq!(attrs.get("success"), Some("1"));
        assert_eq!(attrs.get("nmsize"), None);
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_child_lookup() {
        let done = XmlElement::leaf("task_done", Attributes::new());
        let cache = XmlElement::leaf("code_cache", Attributes::new());
        let task = XmlElement {
            name: "task".to_string(),
            attributes: Attributes::new(),
            children: vec![done, cache.clone(), cache].into_boxed_slice(),
            content: None,
        };

        assert!(task.child("task_done").is_some());
        assert!(task.child("failure").is_none());
        assert_eq!(task.count("code_cache"), 2);
    }
}
