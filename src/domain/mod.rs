pub mod category;
pub mod category_tree;
pub mod pagination;
pub mod product;
