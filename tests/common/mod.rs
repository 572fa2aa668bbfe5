//! Helpers for integration tests.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use pushkind_catalog::domain::category::{Category, NewCategory};
use pushkind_catalog::domain::product::{NewProduct, Product};
use pushkind_catalog::repository::{CategoryWriter, DieselRepository, ProductWriter};
use pushkind_common::db::{DbPool, establish_connection_pool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!(); // assumes migrations/ exists

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repository(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}

#[allow(dead_code)]
pub fn category(repo: &DieselRepository, name: &str, parent_id: Option<i32>) -> Category {
    let mut new_category = NewCategory::new(name);
    if let Some(parent_id) = parent_id {
        new_category = new_category.with_parent_id(parent_id);
    }
    repo.create_category(&new_category)
        .expect("failed to create category")
}

#[allow(dead_code)]
pub fn product(repo: &DieselRepository, category_id: i32, name: &str, price_cents: i64) -> Product {
    repo.create_product(&NewProduct::new(category_id, name, price_cents))
        .expect("failed to create product")
}

/// Categories `Shoes`, `Shoes/Sneakers` and `Shoes/Boots`.
#[allow(dead_code)]
pub struct ShoeShop {
    pub shoes: Category,
    pub sneakers: Category,
    pub boots: Category,
}

#[allow(dead_code)]
impl ShoeShop {
    pub fn new(repo: &DieselRepository) -> Self {
        let shoes = category(repo, "Shoes", None);
        let sneakers = category(repo, "Sneakers", Some(shoes.id));
        let boots = category(repo, "Boots", Some(shoes.id));
        Self {
            shoes,
            sneakers,
            boots,
        }
    }
}
