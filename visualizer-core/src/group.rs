// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grouping tests by trait.
//!
//! An assembly's tests are split into one group for tests without any traits, and one group for
//! each distinct trait. A test carrying several traits appears in each of their groups. Every
//! group gets its own [`TestTree`].

use crate::{
    record::{TestRecord, Trait},
    traits::unique_traits,
    tree::TestTree,
};
use serde::Deserialize;
use std::fmt;

/// Identifies a group within a [`GroupedForest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey<'a> {
    /// Tests without any traits.
    NoTrait,

    /// Tests carrying this trait.
    Trait(&'a Trait),
}

impl GroupKey<'_> {
    /// Returns the trait for this group, if any.
    pub fn test_trait(&self) -> Option<&Trait> {
        match self {
            Self::NoTrait => None,
            Self::Trait(test_trait) => Some(test_trait),
        }
    }
}

/// Displays the key as a string: empty for [`GroupKey::NoTrait`], `{name} - {value}` otherwise.
impl fmt::Display for GroupKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTrait => Ok(()),
            Self::Trait(test_trait) => write!(f, "{test_trait}"),
        }
    }
}

/// The order in which groups are presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupOrder {
    /// Sorted by group key. The no-trait group sorts first since its key is empty.
    #[default]
    Sorted,

    /// The no-trait group first, then traits in the order they were first seen.
    FirstSeen,
}

/// A single group: its key and its tree.
#[derive(Clone, Debug)]
pub struct TestGroup<'a> {
    key: GroupKey<'a>,
    tree: TestTree<'a>,
}

impl<'a> TestGroup<'a> {
    /// Returns the key of this group.
    pub fn key(&self) -> GroupKey<'a> {
        self.key
    }

    /// Returns the tree of tests in this group.
    pub fn tree(&self) -> &TestTree<'a> {
        &self.tree
    }
}

/// Tests grouped by trait, one tree per group.
///
/// Groups are stored in insertion order: the no-trait group first, then one group per unique
/// trait in first-seen order. The no-trait group is always present, even if it is empty.
#[derive(Clone, Debug)]
pub struct GroupedForest<'a> {
    // Keys are unique by construction, since traits are deduplicated before groups are built.
    groups: Vec<TestGroup<'a>>,
}

impl<'a> GroupedForest<'a> {
    /// Returns the number of groups. This is always one more than the number of unique traits.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always false: the no-trait group is present even without any tests.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the group for tests without traits.
    pub fn no_trait(&self) -> &TestGroup<'a> {
        &self.groups[0]
    }

    /// Returns the group for `test_trait`, if any test carries it.
    pub fn get_trait(&self, test_trait: &Trait) -> Option<&TestGroup<'a>> {
        self.groups
            .iter()
            .find(|group| group.key.test_trait() == Some(test_trait))
    }

    /// Returns the group whose key displays as `key`.
    ///
    /// `""` is the no-trait group.
    pub fn get(&self, key: &str) -> Option<&TestGroup<'a>> {
        if key.is_empty() {
            return Some(self.no_trait());
        }
        self.groups
            .iter()
            .find(|group| group.key.to_string() == key)
    }

    /// Iterates over groups in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TestGroup<'a>> {
        self.groups.iter()
    }

    /// Returns the groups in the given order.
    pub fn ordered(&self, order: GroupOrder) -> Vec<&TestGroup<'a>> {
        let mut groups: Vec<_> = self.groups.iter().collect();
        match order {
            // Stable sort, so distinct traits with the same key keep their first-seen order.
            GroupOrder::Sorted => groups.sort_by_cached_key(|group| group.key.to_string()),
            GroupOrder::FirstSeen => {}
        }
        groups
    }
}

/// Groups `tests` by trait, building one tree per group.
///
/// Tests are fed to each tree in the order given.
pub fn group_by_trait<'a, I>(tests: I) -> GroupedForest<'a>
where
    I: IntoIterator<Item = &'a TestRecord>,
{
    let tests: Vec<&'a TestRecord> = tests.into_iter().collect();
    let unique = unique_traits(tests.iter().copied());
    let mut groups = Vec::with_capacity(1 + unique.len());

    let untagged = tests.iter().copied().filter(|test| test.traits.is_empty());
    groups.push(TestGroup {
        key: GroupKey::NoTrait,
        tree: TestTree::build(untagged),
    });

    for test_trait in unique {
        let tagged = tests
            .iter()
            .copied()
            .filter(|test| test.has_trait(test_trait));
        groups.push(TestGroup {
            key: GroupKey::Trait(test_trait),
            tree: TestTree::build(tagged),
        });
    }

    GroupedForest { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{arb_records, record};
    use pretty_assertions::assert_eq;
    use test_strategy::proptest;

    fn keys(groups: &[&TestGroup<'_>]) -> Vec<String> {
        groups.iter().map(|group| group.key().to_string()).collect()
    }

    fn names<'a>(group: &TestGroup<'a>) -> Vec<&'a str> {
        group
            .tree()
            .iter()
            .flat_map(|item| item.node.tests().iter().map(|&test| test.name.as_str()))
            .collect()
    }

    #[test]
    fn empty() {
        let tests: Vec<TestRecord> = Vec::new();
        let forest = group_by_trait(&tests);

        assert_eq!(forest.len(), 1);
        let group = forest.get("").expect("no-trait group exists");
        assert_eq!(group.key(), GroupKey::NoTrait);
        assert!(group.tree().is_empty());
        assert_eq!(group.tree().root().children().len(), 0);
    }

    #[test]
    fn tests_appear_in_each_trait_group() {
        let tests = vec![
            record("Ns.Outer+Inner.Both")
                .with_trait("A", "1")
                .with_trait("B", "2"),
            record("Ns.Plain.Untagged"),
            record("Ns.Plain.OnlyB").with_trait("B", "2"),
        ];
        let forest = group_by_trait(&tests);

        assert_eq!(keys(&forest.iter().collect::<Vec<_>>()), ["", "A - 1", "B - 2"]);
        assert_eq!(names(forest.no_trait()), ["Ns.Plain.Untagged"]);
        assert_eq!(
            names(forest.get("A - 1").expect("group exists")),
            ["Ns.Outer+Inner.Both"]
        );
        assert_eq!(
            names(forest.get("B - 2").expect("group exists")),
            ["Ns.Plain.OnlyB", "Ns.Outer+Inner.Both"],
        );

        let b = forest
            .get_trait(&Trait::new("B", "2"))
            .expect("group exists");
        let inner = b
            .tree()
            .root()
            .child("Outer")
            .and_then(|outer| outer.child("Inner"))
            .expect("nesting path is built within the trait group");
        assert_eq!(inner.tests().len(), 1);
    }

    #[test]
    fn group_order() {
        let tests = vec![
            record("Ns.T.One").with_trait("Owner", "Math"),
            record("Ns.T.Two").with_trait("Category", "Unit"),
            record("Ns.T.Three"),
        ];
        let forest = group_by_trait(&tests);

        assert_eq!(
            keys(&forest.ordered(GroupOrder::FirstSeen)),
            ["", "Owner - Math", "Category - Unit"]
        );
        assert_eq!(
            keys(&forest.ordered(GroupOrder::Sorted)),
            ["", "Category - Unit", "Owner - Math"]
        );
    }

    #[test]
    fn colliding_keys_stay_distinct() {
        let tests = vec![
            record("Ns.T.One").with_trait("A - B", "C"),
            record("Ns.T.Two").with_trait("A", "B - C"),
        ];
        let forest = group_by_trait(&tests);

        assert_eq!(forest.len(), 3);
        assert_eq!(
            keys(&forest.ordered(GroupOrder::Sorted)),
            ["", "A - B - C", "A - B - C"]
        );
        let second = forest
            .get_trait(&Trait::new("A", "B - C"))
            .expect("group exists");
        assert_eq!(names(second), ["Ns.T.Two"]);
    }

    #[proptest]
    fn one_group_per_unique_trait(#[strategy(arb_records())] tests: Vec<TestRecord>) {
        let forest = group_by_trait(&tests);
        let unique = unique_traits(&tests);
        assert_eq!(forest.len(), 1 + unique.len());

        for test in &tests {
            if test.traits.is_empty() {
                assert!(names(forest.no_trait()).contains(&test.name.as_str()));
            }
            for test_trait in &test.traits {
                let group = forest.get_trait(test_trait).expect("group exists");
                assert!(names(group).contains(&test.name.as_str()));
            }
        }

        let untagged = forest.no_trait().tree().test_count();
        assert_eq!(
            untagged,
            tests.iter().filter(|test| test.traits.is_empty()).count()
        );
    }
}
