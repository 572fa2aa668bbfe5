use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Domain representation of a hierarchical product category.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Category {
    /// Unique identifier of the category.
    pub id: i32,
    /// Identifier of the parent category; `None` marks a root.
    pub parent_id: Option<i32>,
    /// Human-readable name of the category.
    pub name: String,
    /// Optional description that expands upon the category name.
    pub description: Option<String>,
    /// Timestamp for when the category record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the category record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Optional identifier of the parent category.
    pub parent_id: Option<i32>,
    /// Human-readable name of the category.
    pub name: String,
    /// Optional description that expands upon the category name.
    pub description: Option<String>,
    /// Timestamp captured when the category payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewCategory {
    /// Build a new root category payload with the current timestamp.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            parent_id: None,
            name: name.into(),
            description: None,
            updated_at: Local::now().naive_utc(),
        }
    }

    /// Attach a parent identifier to the category payload.
    pub fn with_parent_id(mut self, parent_id: i32) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Attach a descriptive text to the category payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Node representation of a category and its children for tree traversal.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CategoryNode {
    /// Category data represented by this node.
    pub category: Category,
    /// Ancestor names joined with `/`, starting at the `root` label.
    pub full_path: String,
    /// Children that belong to this node, ordered by name.
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Create a new category tree node with no children.
    pub fn new(category: Category, full_path: impl Into<String>) -> Self {
        Self {
            category,
            full_path: full_path.into(),
            children: Vec::new(),
        }
    }

    /// Attach a collection of children to the node.
    pub fn with_children(mut self, children: impl Into<Vec<CategoryNode>>) -> Self {
        self.children = children.into();
        self
    }
}

/// Flat category entry used by navigation menus and admin listings.
#[derive(Debug, Serialize, Clone)]
pub struct CategorySummary {
    /// Category data.
    pub category: Category,
    /// Full path of the category, e.g. `root/Shoes/Sneakers`.
    pub full_path: String,
    /// Full path of the parent, or the bare `root` label for roots.
    pub parent_path: String,
    /// Products filed directly under the category or its immediate children.
    pub product_count: usize,
}
