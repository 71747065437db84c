//! Demo data seeding command.
//!
//! Idempotent: rows are keyed by slug and re-running skips anything
//! already present.

use rust_decimal::Decimal;
use sqlx::PgPool;

use neo_commerce_core::ProductId;

use super::{CommandError, connect};

struct SeedCategory {
    slug: &'static str,
    name: &'static str,
    hero_image: &'static str,
}

struct SeedProduct {
    sku: &'static str,
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    category: &'static str,
    featured: bool,
    popularity: i32,
    brand: &'static str,
    tags: &'static [&'static str],
    /// Price in whole dollars.
    price: i64,
    rating: i32,
    review_title: &'static str,
    review_body: &'static str,
}

const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        slug: "wearables",
        name: "Wearables",
        hero_image: "https://images.unsplash.com/photo-1542291026-7eec264c27ff",
    },
    SeedCategory {
        slug: "smart-home",
        name: "Smart Home",
        hero_image: "https://images.unsplash.com/photo-1520607162513-77705c0f0d4a",
    },
    SeedCategory {
        slug: "mobility",
        name: "Mobility",
        hero_image: "https://images.unsplash.com/photo-1511399322040-9e63f5e5f0e9",
    },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        sku: "AUR-001",
        slug: "aurora-pulse",
        name: "Aurora Pulse Headset",
        description: "Adaptive AI audio headset with biometric privacy shield and contextual cues.",
        category: "wearables",
        featured: true,
        popularity: 95,
        brand: "Neo Labs",
        tags: &["audio", "biometrics", "ai"],
        price: 499,
        rating: 5,
        review_title: "Insanely polished",
        review_body: "Setup took seconds and it suggested accessories I actually wanted.",
    },
    SeedProduct {
        sku: "NEB-201",
        slug: "nebula-lens",
        name: "Nebula Smart Lens",
        description: "AR-enabled eyewear with contextual overlays and privacy-preserving optics.",
        category: "wearables",
        featured: true,
        popularity: 88,
        brand: "Spectra",
        tags: &["ar", "vision", "ai"],
        price: 699,
        rating: 4,
        review_title: "Future proof",
        review_body: "Felt like stepping into the future. Needs more colours though.",
    },
    SeedProduct {
        sku: "FLX-880",
        slug: "flux-console",
        name: "Flux Modular Console",
        description: "Seamless cross-device command center for your smart home ecosystem.",
        category: "smart-home",
        featured: true,
        popularity: 92,
        brand: "Flux Systems",
        tags: &["iot", "automation"],
        price: 899,
        rating: 5,
        review_title: "Runs the whole house",
        review_body: "Twelve modules and not a single dropout in three months.",
    },
    SeedProduct {
        sku: "ORB-330",
        slug: "orbital-scooter",
        name: "Orbital Foldable Scooter",
        description: "AI stability control with adaptive suspension for urban mobility.",
        category: "mobility",
        featured: false,
        popularity: 84,
        brand: "Orbital",
        tags: &["mobility", "ev"],
        price: 1299,
        rating: 4,
        review_title: "Commute sorted",
        review_body: "Predictive braking has saved me twice already.",
    },
    SeedProduct {
        sku: "HYB-450",
        slug: "hyperion-bike",
        name: "Hyperion Smart Bike",
        description: "Carbon-fiber e-bike with AI shifting, theft lock, and solar trickle charging.",
        category: "mobility",
        featured: false,
        popularity: 86,
        brand: "Hyperion Mobility",
        tags: &["ebike", "mobility", "sustainability"],
        price: 1499,
        rating: 5,
        review_title: "Stolen once, recovered once",
        review_body: "The seatpost lock and tracking paid for themselves.",
    },
];

/// Normalise a title into a URL slug (lowercase, hyphen-separated,
/// at most 64 characters).
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut last_was_hyphen = true;

    for c in input.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    let trimmed = slug.trim_end_matches('-');
    trimmed.chars().take(64).collect()
}

/// Seed the catalog and knowledge base with demo data.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert
/// fails.
pub async fn run() -> Result<(), CommandError> {
    tracing::info!("Connecting to storefront database...");
    let pool = connect().await?;

    seed_categories(&pool).await?;
    seed_products(&pool).await?;
    seed_knowledge_base(&pool).await?;

    tracing::info!("Seed data loaded");
    Ok(())
}

async fn seed_categories(pool: &PgPool) -> Result<(), CommandError> {
    for category in CATEGORIES {
        sqlx::query(
            r"
            INSERT INTO storefront.category (slug, name, hero_image)
            VALUES ($1, $2, $3)
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(category.slug)
        .bind(category.name)
        .bind(category.hero_image)
        .execute(pool)
        .await?;
    }

    tracing::info!(count = CATEGORIES.len(), "categories seeded");
    Ok(())
}

async fn seed_products(pool: &PgPool) -> Result<(), CommandError> {
    let mut inserted = 0;

    for product in PRODUCTS {
        let mut tx = pool.begin().await?;

        let tags: Vec<String> = product.tags.iter().map(|t| (*t).to_string()).collect();
        let product_id: Option<ProductId> = sqlx::query_scalar(
            r"
            INSERT INTO storefront.product
                (sku, slug, name, description, brand, tags, featured, popularity, category_id)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, c.id
            FROM storefront.category c
            WHERE c.slug = $9
            ON CONFLICT (slug) DO NOTHING
            RETURNING id
            ",
        )
        .bind(product.sku)
        .bind(product.slug)
        .bind(product.name)
        .bind(product.description)
        .bind(product.brand)
        .bind(&tags)
        .bind(product.featured)
        .bind(product.popularity)
        .bind(product.category)
        .fetch_optional(&mut *tx)
        .await?;

        // Already seeded (or unknown category); leave it untouched.
        let Some(product_id) = product_id else {
            tx.commit().await?;
            continue;
        };

        sqlx::query(
            r"
            INSERT INTO storefront.price (product_id, amount, currency)
            VALUES ($1, $2, 'usd')
            ",
        )
        .bind(product_id)
        .bind(Decimal::from(product.price))
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO storefront.inventory (product_id, quantity, threshold)
            VALUES ($1, 120, 5)
            ",
        )
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
            INSERT INTO storefront.review (product_id, rating, title, body)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(product_id)
        .bind(product.rating)
        .bind(product.review_title)
        .bind(product.review_body)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        inserted += 1;
    }

    tracing::info!(inserted, "products seeded");
    Ok(())
}

async fn seed_knowledge_base(pool: &PgPool) -> Result<(), CommandError> {
    let title = "Shipping & fulfilment";
    sqlx::query(
        r"
        INSERT INTO storefront.kb_article (slug, title, body, category)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (slug) DO NOTHING
        ",
    )
    .bind(slugify(title))
    .bind(title)
    .bind("Orders ship within 48 hours. Express upgrades available at checkout.")
    .bind("logistics")
    .execute(pool)
    .await?;

    tracing::info!("knowledge base seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Shipping & fulfilment"), "shipping-fulfilment");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("  Returns --- policy!  "), "returns-policy");
    }

    #[test]
    fn test_slugify_truncates_to_64() {
        let long = "a ".repeat(100);
        assert!(slugify(&long).len() <= 64);
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify("!!!"), "");
    }
}
