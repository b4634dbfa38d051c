//! Compilation log parsing.
//!
//! This module handles:
//! - Tokenizing the XML-shaped log stream without building a tree
//! - Materializing bounded subtrees on demand with a pooled allocator
//! - Frozen element and attribute types

pub mod element;
pub mod token;
pub mod tree;

// Re-export main types
pub use element::{Attributes, XmlElement};
pub use token::{Token, TokenSource};
pub use tree::{NodePool, TreeMaterializer};
