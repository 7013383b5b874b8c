//! Declared-order conformance checking
//!
//! Children of a container are tagged with categories and compared against
//! an [`OrderSpec`], an ordered list of groups of order-equivalent
//! categories. The check is a forward greedy scan: each group in turn scans
//! the items past the current frontier, advancing the frontier over its own
//! members. Items passed over by a group but lying before the frontier it
//! reached are out of place and are reported against that group.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A set of categories that may appear in any order relative to each other
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryGroup<C> {
    categories: Vec<C>,
}

impl<C: PartialEq> CategoryGroup<C> {
    pub fn new(categories: impl IntoIterator<Item = C>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
        }
    }

    pub fn single(category: C) -> Self {
        Self {
            categories: vec![category],
        }
    }

    pub fn contains(&self, category: &C) -> bool {
        self.categories.contains(category)
    }

    pub fn categories(&self) -> &[C] {
        &self.categories
    }
}

impl<C: fmt::Display> fmt::Display for CategoryGroup<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, category) in self.categories.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{category}")?;
        }
        Ok(())
    }
}

/// Required relative ordering of category groups
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderSpec<C> {
    groups: Vec<CategoryGroup<C>>,
}

impl<C: PartialEq> OrderSpec<C> {
    pub fn new(groups: impl IntoIterator<Item = CategoryGroup<C>>) -> Self {
        Self {
            groups: groups.into_iter().collect(),
        }
    }

    pub fn groups(&self) -> &[CategoryGroup<C>] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Whether any group mentions `category`
    pub fn constrains(&self, category: &C) -> bool {
        self.groups.iter().any(|group| group.contains(category))
    }
}

/// A categorized child of the container being checked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedItem<C> {
    pub category: C,
    pub offset: usize,
}

impl<C> OrderedItem<C> {
    pub fn new(category: C, offset: usize) -> Self {
        Self { category, offset }
    }
}

/// An item found amongst a group it should not be placed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderViolation<C> {
    /// Category of the misplaced item
    pub category: C,
    /// Offset of the misplaced item
    pub offset: usize,
    /// Index of the item in the offset-sorted, filtered item list
    pub index: usize,
    /// The group whose scan found the item out of place
    pub group: CategoryGroup<C>,
}

/// Check `items` against `spec`
///
/// Items whose category no group mentions are unconstrained and dropped.
/// The remaining items are sorted by offset (stable for equal offsets).
/// Violations come back in the order they are detected: by group, then by
/// item index.
pub fn check_order<C>(items: Vec<OrderedItem<C>>, spec: &OrderSpec<C>) -> Vec<OrderViolation<C>>
where
    C: Clone + PartialEq,
{
    let mut items: Vec<OrderedItem<C>> = items
        .into_iter()
        .filter(|item| spec.constrains(&item.category))
        .collect();
    items.sort_by_key(|item| item.offset);

    let mut violations = Vec::new();
    // Index one past the last item confirmed in place
    let mut start = 0;

    for group in spec.groups() {
        let mut frontier: Option<usize> = None;
        let mut candidates = Vec::new();

        for (index, item) in items.iter().enumerate().skip(start) {
            if group.contains(&item.category) {
                frontier = Some(index);
            } else {
                candidates.push(index);
            }
        }

        let Some(frontier) = frontier else {
            continue;
        };

        for index in candidates.into_iter().filter(|&index| index < frontier) {
            let item = &items[index];
            violations.push(OrderViolation {
                category: item.category.clone(),
                offset: item.offset,
                index,
                group: group.clone(),
            });
        }

        start = frontier + 1;
    }

    violations
}
