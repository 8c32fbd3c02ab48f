// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trees of tests organized by nesting path.
//!
//! Nodes are stored in an arena, with the synthetic root at index 0. Each node keeps its children
//! in the order they were first encountered, along with an index from label to child so that
//! lookup-or-create is constant time.
//!
//! # Placement rules
//!
//! 1. **Display names** (containing a space) are attached to the root, even if they contain `+`.
//! 2. **Names without `+`** are attached to the root.
//! 3. **Nested names** walk the [`NestingPath`] from the root, creating nodes as needed, and are
//!    attached to the node reached at the last segment. Intermediate nodes only hold tests whose
//!    path ends there.

use crate::{
    errors::MalformedTestName,
    qualified::{self, NestingPath},
    record::TestRecord,
};
use std::collections::HashMap;
use tracing::warn;

/// A tree of tests, built from a list of records in a single pass.
#[derive(Clone, Debug, PartialEq)]
pub struct TestTree<'a> {
    nodes: Vec<NodeData<'a>>,
    malformed: Vec<MalformedTestName>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct NodeIndex(usize);

impl NodeIndex {
    const ROOT: Self = Self(0);
}

#[derive(Clone, Debug, PartialEq)]
struct NodeData<'a> {
    label: &'a str,
    tests: Vec<&'a TestRecord>,
    children: Vec<NodeIndex>,
    child_index: HashMap<&'a str, NodeIndex>,
}

impl<'a> NodeData<'a> {
    fn new(label: &'a str) -> Self {
        Self {
            label,
            tests: Vec::new(),
            children: Vec::new(),
            child_index: HashMap::new(),
        }
    }
}

impl<'a> TestTree<'a> {
    /// Builds a tree from `tests`, processed in iteration order.
    ///
    /// The root is always present, even if `tests` is empty.
    pub fn build<I>(tests: I) -> Self
    where
        I: IntoIterator<Item = &'a TestRecord>,
    {
        let mut tree = Self {
            nodes: vec![NodeData::new("")],
            malformed: Vec::new(),
        };
        for test in tests {
            tree.insert(test);
        }
        tree
    }

    fn insert(&mut self, test: &'a TestRecord) {
        let name = test.name.as_str();
        if qualified::has_display_name(name) || !qualified::is_nested(name) {
            self.nodes[NodeIndex::ROOT.0].tests.push(test);
            return;
        }

        let (path, malformed) = NestingPath::parse_lenient(name);
        if let Some(malformed) = malformed {
            warn!("{malformed}, using whole substrings as the nesting path");
            self.malformed.push(malformed);
        }

        let mut current = NodeIndex::ROOT;
        for segment in path.iter() {
            current = self.child_or_insert(current, segment);
        }
        self.nodes[current.0].tests.push(test);
    }

    fn child_or_insert(&mut self, parent: NodeIndex, label: &'a str) -> NodeIndex {
        if let Some(&child) = self.nodes[parent.0].child_index.get(label) {
            return child;
        }

        let child = NodeIndex(self.nodes.len());
        self.nodes.push(NodeData::new(label));
        let parent = &mut self.nodes[parent.0];
        parent.children.push(child);
        parent.child_index.insert(label, child);
        child
    }

    /// Returns the root of the tree.
    pub fn root(&self) -> TreeNode<'_, 'a> {
        self.node(NodeIndex::ROOT)
    }

    /// Returns the total number of tests in the tree.
    pub fn test_count(&self) -> usize {
        self.nodes.iter().map(|node| node.tests.len()).sum()
    }

    /// Returns true if the tree has no tests.
    pub fn is_empty(&self) -> bool {
        self.nodes.iter().all(|node| node.tests.is_empty())
    }

    /// Returns the malformed names encountered while building the tree.
    pub fn malformed(&self) -> &[MalformedTestName] {
        &self.malformed
    }

    /// Iterates over the nodes of the tree in depth-first pre-order, starting with the root.
    ///
    /// Children are visited in the order they were first encountered.
    pub fn iter(&self) -> Iter<'_, 'a> {
        Iter {
            tree: self,
            stack: vec![(NodeIndex::ROOT, 0)],
        }
    }

    fn node(&self, index: NodeIndex) -> TreeNode<'_, 'a> {
        TreeNode { tree: self, index }
    }
}

impl<'t, 'a> IntoIterator for &'t TestTree<'a> {
    type Item = TreeIterItem<'t, 'a>;
    type IntoIter = Iter<'t, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A read-only view of a node in a [`TestTree`].
#[derive(Clone, Copy, Debug)]
pub struct TreeNode<'t, 'a> {
    tree: &'t TestTree<'a>,
    index: NodeIndex,
}

impl<'t, 'a> TreeNode<'t, 'a> {
    fn data(&self) -> &'t NodeData<'a> {
        &self.tree.nodes[self.index.0]
    }

    /// Returns true if this is the synthetic root.
    pub fn is_root(&self) -> bool {
        self.index == NodeIndex::ROOT
    }

    /// Returns the label of this node: one nesting path segment, or empty for the root.
    pub fn label(&self) -> &'a str {
        self.data().label
    }

    /// Returns the tests whose nesting path ends at this node.
    pub fn tests(&self) -> &'t [&'a TestRecord] {
        &self.data().tests
    }

    /// Returns the children of this node, in the order they were first encountered.
    pub fn children(&self) -> impl ExactSizeIterator<Item = TreeNode<'t, 'a>> + use<'t, 'a> {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&index| TreeNode { tree, index })
    }

    /// Returns the child with the given label.
    pub fn child(&self, label: &str) -> Option<TreeNode<'t, 'a>> {
        let tree = self.tree;
        self.data()
            .child_index
            .get(label)
            .map(|&index| TreeNode { tree, index })
    }
}

/// An iterator over the nodes of a [`TestTree`], returned by [`TestTree::iter`].
#[derive(Clone, Debug)]
pub struct Iter<'t, 'a> {
    tree: &'t TestTree<'a>,
    stack: Vec<(NodeIndex, usize)>,
}

impl<'t, 'a> Iterator for Iter<'t, 'a> {
    type Item = TreeIterItem<'t, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (index, depth) = self.stack.pop()?;
        let node = self.tree.node(index);
        // Push in reverse so the first child is visited first.
        self.stack.extend(
            node.data()
                .children
                .iter()
                .rev()
                .map(|&child| (child, depth + 1)),
        );
        Some(TreeIterItem { node, depth })
    }
}

/// An item in a pre-order traversal of a [`TestTree`].
#[derive(Clone, Copy, Debug)]
pub struct TreeIterItem<'t, 'a> {
    /// The node.
    pub node: TreeNode<'t, 'a>,

    /// Depth in the tree (0 for the root).
    pub depth: usize,
}
