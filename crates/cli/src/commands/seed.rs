//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - title: Canvas Tote
//!     description: Heavy cotton bag
//!     category: accessories
//!     brand: northwind
//!     price: 24.50
//!     salePrice: 19.99
//!     totalStock: 40
//!     image: https://res.cloudinary.com/demo/image/upload/tote.jpg
//! ```
//!
//! Every entry is validated before the database is touched. Products whose
//! title already exists are skipped, so re-running a file is harmless.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use bazaar_storefront::db::{self, ProductRepository};
use bazaar_storefront::models::{NewProductRequest, ProductDraft};

#[derive(Debug, Deserialize)]
struct SeedFile {
    products: Vec<NewProductRequest>,
}

/// Parse and validate a seed file's contents.
///
/// # Errors
///
/// Returns a message listing every invalid entry.
pub fn parse_products(content: &str) -> Result<Vec<ProductDraft>, String> {
    let file: SeedFile = serde_yaml::from_str(content).map_err(|e| e.to_string())?;

    let mut drafts = Vec::with_capacity(file.products.len());
    let mut errors = Vec::new();
    for (index, request) in file.products.into_iter().enumerate() {
        let title = request.title.clone();
        match request.into_draft() {
            Ok(draft) => drafts.push(draft),
            Err(e) => errors.push(format!("entry {index} ({title}): {e}")),
        }
    }

    if errors.is_empty() {
        Ok(drafts)
    } else {
        Err(errors.join("\n"))
    }
}

/// Insert the products listed in `file_path`.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the file cannot be read
/// or validated, or a database operation fails.
pub async fn products(
    file_path: &str,
    clear_existing: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading products from file");
    let content = tokio::fs::read_to_string(path).await?;
    let drafts = parse_products(&content).map_err(|errors| {
        error!("Seed file validation failed:\n{errors}");
        "seed file has invalid entries"
    })?;
    info!(products = drafts.len(), "Seed file validated");

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    if clear_existing {
        let removed = sqlx::query("DELETE FROM shop.product")
            .execute(&pool)
            .await?
            .rows_affected();
        info!(removed, "Cleared existing products");
    }

    let repo = ProductRepository::new(&pool);
    let mut inserted = 0_usize;
    let mut skipped = 0_usize;

    for draft in &drafts {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM shop.product WHERE title = $1)",
        )
        .bind(&draft.title)
        .fetch_one(&pool)
        .await?;

        if exists {
            skipped += 1;
            continue;
        }

        repo.create(draft).await?;
        inserted += 1;
    }

    info!("Seeding complete!");
    info!("  Products inserted: {inserted}");
    info!("  Products skipped (already exist): {skipped}");
    Ok(())
}
