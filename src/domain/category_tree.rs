//! Adjacency index over a flat category set.
//!
//! The index is built once per request and answers every hierarchy question
//! the catalog needs: tree assembly, full path names, descendant sets and the
//! immediate neighbourhood of a category. Every walk tracks the categories it
//! has visited so a corrupted parent graph fails with
//! [`CategoryGraphError::CycleDetected`] instead of looping.

use std::collections::{BTreeSet, HashMap, HashSet};

use thiserror::Error;

use crate::domain::category::{Category, CategoryNode};

/// Label that prefixes every full path.
pub const ROOT_LABEL: &str = "root";

/// Errors raised while walking the category graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryGraphError {
    /// The parent references contain a cycle through `category_id`.
    #[error("category {category_id} is part of a parent cycle")]
    CycleDetected { category_id: i32 },
}

/// Children-by-parent index over a borrowed category slice.
#[derive(Debug)]
pub struct CategoryIndex<'a> {
    by_id: HashMap<i32, &'a Category>,
    children: HashMap<Option<i32>, Vec<&'a Category>>,
}

impl<'a> CategoryIndex<'a> {
    /// Index `categories`. A category whose parent is missing from the set
    /// is filed as a root.
    pub fn new(categories: &'a [Category]) -> Self {
        let by_id: HashMap<i32, &Category> = categories.iter().map(|c| (c.id, c)).collect();

        let mut children: HashMap<Option<i32>, Vec<&Category>> = HashMap::new();
        for category in categories {
            let parent = category.parent_id.filter(|id| by_id.contains_key(id));
            children.entry(parent).or_default().push(category);
        }

        for group in children.values_mut() {
            group.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        }

        Self { by_id, children }
    }

    pub fn get(&self, id: i32) -> Option<&'a Category> {
        self.by_id.get(&id).copied()
    }

    /// Root categories ordered by name.
    pub fn roots(&self) -> &[&'a Category] {
        self.children.get(&None).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Immediate children of `id` ordered by name.
    pub fn children_of(&self, id: i32) -> &[&'a Category] {
        self.children
            .get(&Some(id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Parent of `id`, if it exists in the indexed set.
    pub fn parent_of(&self, id: i32) -> Option<&'a Category> {
        self.get(id)
            .and_then(|category| category.parent_id)
            .and_then(|parent_id| self.get(parent_id))
    }

    /// Other children of the parent of `id`. Roots have no siblings.
    pub fn siblings_of(&self, id: i32) -> Vec<&'a Category> {
        match self.parent_of(id) {
            Some(parent) => self
                .children_of(parent.id)
                .iter()
                .copied()
                .filter(|category| category.id != id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Every category reachable downward from `root_id`, including itself.
    ///
    /// Each id is expanded at most once. Because a category has a single
    /// parent, reaching an id twice can only happen through a cycle.
    pub fn descendants(&self, root_id: i32) -> Result<BTreeSet<i32>, CategoryGraphError> {
        let mut visited = BTreeSet::new();
        let mut pending = vec![root_id];

        while let Some(current) = pending.pop() {
            if !visited.insert(current) {
                return Err(CategoryGraphError::CycleDetected {
                    category_id: current,
                });
            }
            pending.extend(self.children_of(current).iter().map(|child| child.id));
        }

        Ok(visited)
    }

    /// Full path of every indexed category, e.g. `root/Shoes/Sneakers`.
    ///
    /// Paths of shared ancestors are computed once and reused.
    pub fn full_paths(&self) -> Result<HashMap<i32, String>, CategoryGraphError> {
        let mut memo: HashMap<i32, String> = HashMap::with_capacity(self.by_id.len());

        for &start in self.by_id.keys() {
            if memo.contains_key(&start) {
                continue;
            }

            let mut chain = Vec::new();
            let mut seen = HashSet::new();
            let mut prefix = ROOT_LABEL.to_string();
            let mut cursor = Some(start);

            while let Some(current) = cursor {
                if let Some(known) = memo.get(&current) {
                    prefix = known.clone();
                    break;
                }
                if !seen.insert(current) {
                    return Err(CategoryGraphError::CycleDetected {
                        category_id: current,
                    });
                }
                chain.push(current);
                cursor = self.parent_of(current).map(|parent| parent.id);
            }

            for id in chain.into_iter().rev() {
                if let Some(category) = self.get(id) {
                    let path = format!("{prefix}/{}", category.name);
                    memo.insert(id, path.clone());
                    prefix = path;
                }
            }
        }

        Ok(memo)
    }

    /// Assemble the category forest with full paths attached.
    pub fn build_tree(&self) -> Result<Vec<CategoryNode>, CategoryGraphError> {
        // Fails on any cycle, so the recursion below is bounded by tree depth.
        let paths = self.full_paths()?;

        fn build_branch(
            index: &CategoryIndex<'_>,
            nodes: &[&Category],
            paths: &HashMap<i32, String>,
        ) -> Vec<CategoryNode> {
            nodes
                .iter()
                .map(|category| {
                    let full_path = paths.get(&category.id).cloned().unwrap_or_default();
                    let children = build_branch(index, index.children_of(category.id), paths);
                    CategoryNode::new((*category).clone(), full_path).with_children(children)
                })
                .collect()
        }

        Ok(build_branch(self, self.roots(), &paths))
    }
}
