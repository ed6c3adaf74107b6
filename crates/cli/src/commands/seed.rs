//! Seed the database with a sample catalog and a demo account.
//!
//! Intended for local development and demo environments. Running it twice
//! fails on the demo user's unique email, which is the desired guard
//! against double-seeding.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use super::{CommandError, connect};

/// Demo account credentials, also documented in the README.
const DEMO_EMAIL: &str = "test@example.com";
const DEMO_PASSWORD: &str = "password123";

/// Seed categories, products, the demo user, and two sample orders.
///
/// # Errors
///
/// Returns an error if the database is unreachable or already seeded.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    info!("Seeding categories...");
    seed_categories(&pool).await?;

    info!("Seeding products...");
    seed_products(&pool).await?;

    info!("Creating demo user...");
    let user_id = seed_demo_user(&pool).await?;

    info!("Creating sample orders...");
    seed_orders(&pool, user_id).await?;

    info!("Seed complete! Log in as {DEMO_EMAIL} / {DEMO_PASSWORD}");
    Ok(())
}

async fn seed_categories(pool: &PgPool) -> Result<(), CommandError> {
    let categories = [
        (
            "Electronics",
            "electronics",
            "Smart home devices, premium audio equipment, and the latest gadgets.",
        ),
        (
            "Clothing",
            "clothing",
            "Stylish apparel for every occasion, from sustainable basics to outerwear.",
        ),
        (
            "Home & Kitchen",
            "home-kitchen",
            "Elegant dining sets, modern kitchen appliances, and cozy decor.",
        ),
        (
            "Beauty & Personal Care",
            "beauty-personal-care",
            "Skincare, makeup, and personal care with premium ingredients.",
        ),
    ];

    for (name, slug, description) in categories {
        sqlx::query(
            r"
            INSERT INTO categories (name, slug, description)
            VALUES ($1, $2, $3)
            ON CONFLICT (slug) DO NOTHING
            ",
        )
        .bind(name)
        .bind(slug)
        .bind(description)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn seed_products(pool: &PgPool) -> Result<(), CommandError> {
    struct Seed {
        name: &'static str,
        slug: &'static str,
        description: &'static str,
        price: &'static str,
        discount: &'static str,
        stock: i32,
        brand: &'static str,
        category_slug: &'static str,
    }

    let products = [
        Seed {
            name: "Wireless Headphones",
            slug: "wireless-headphones",
            description: "Premium wireless headphones with noise cancellation and 20-hour battery life.",
            price: "149.99",
            discount: "199.99",
            stock: 50,
            brand: "SoundPro",
            category_slug: "electronics",
        },
        Seed {
            name: "Smart Watch",
            slug: "smart-watch",
            description: "Track your fitness goals with this waterproof smart watch featuring heart rate monitoring.",
            price: "199.99",
            discount: "249.99",
            stock: 30,
            brand: "TechWear",
            category_slug: "electronics",
        },
        Seed {
            name: "Cotton T-Shirt",
            slug: "cotton-tshirt",
            description: "Comfortable cotton t-shirt available in multiple colors.",
            price: "19.99",
            discount: "24.99",
            stock: 100,
            brand: "EcoWear",
            category_slug: "clothing",
        },
        Seed {
            name: "Leather Jacket",
            slug: "leather-jacket",
            description: "Classic leather jacket with quilted lining and multiple pockets.",
            price: "199.99",
            discount: "249.99",
            stock: 20,
            brand: "UrbanChic",
            category_slug: "clothing",
        },
    ];

    for product in products {
        let price: Decimal = product.price.parse().unwrap_or_default();
        let discount: Decimal = product.discount.parse().unwrap_or_default();

        sqlx::query(
            r"
            INSERT INTO products (name, slug, description, price, discount, stock, brand, category_id)
            SELECT $1, $2, $3, $4, $5, $6, $7, c.id
            FROM categories c
            WHERE c.slug = $8
            ",
        )
        .bind(product.name)
        .bind(product.slug)
        .bind(product.description)
        .bind(price)
        .bind(discount)
        .bind(product.stock)
        .bind(product.brand)
        .bind(product.category_slug)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn seed_demo_user(pool: &PgPool) -> Result<i32, CommandError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(DEMO_PASSWORD.as_bytes(), &salt)
        .map_err(|_| CommandError::PasswordHash)?
        .to_string();

    let (id,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO users (name, email, password_hash, avatar)
        VALUES ('Test User', $1, $2, 'https://api.dicebear.com/7.x/initials/svg?seed=Test+User')
        RETURNING id
        ",
    )
    .bind(DEMO_EMAIL)
    .bind(password_hash)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// One delivered order (review-eligible) and one still processing
/// (cancellable), so every workflow is exercisable out of the box.
async fn seed_orders(pool: &PgPool, user_id: i32) -> Result<(), CommandError> {
    let (delivered_id,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO orders (
            user_id, subtotal, shipping, tax, total, status, payment_method,
            shipping_address, shipping_city, shipping_state, shipping_zip,
            shipping_country, created_at, shipped_at, delivered_at
        ) VALUES (
            $1, 349.98, 12.99, 28.00, 390.97, 'delivered', 'Credit Card',
            '123 Main St', 'Anytown', 'CA', '12345', 'USA',
            now() - interval '15 days',
            now() - interval '12 days',
            now() - interval '10 days'
        )
        RETURNING id
        ",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        r"
        INSERT INTO order_items (order_id, product_id, quantity, price, name)
        SELECT $1, p.id, 1, p.price, p.name
        FROM products p
        WHERE p.slug IN ('wireless-headphones', 'smart-watch')
        ",
    )
    .bind(delivered_id)
    .execute(pool)
    .await?;

    let (processing_id,): (i32,) = sqlx::query_as(
        r"
        INSERT INTO orders (
            user_id, subtotal, shipping, tax, total, status, payment_method,
            shipping_address, shipping_city, shipping_state, shipping_zip,
            shipping_country, created_at
        ) VALUES (
            $1, 19.99, 12.99, 1.60, 34.58, 'processing', 'Credit Card',
            '123 Main St', 'Anytown', 'CA', '12345', 'USA',
            now() - interval '2 days'
        )
        RETURNING id
        ",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    sqlx::query(
        r"
        INSERT INTO order_items (order_id, product_id, quantity, price, name)
        SELECT $1, p.id, 1, p.price, p.name
        FROM products p
        WHERE p.slug = 'cotton-tshirt'
        ",
    )
    .bind(processing_id)
    .execute(pool)
    .await?;

    Ok(())
}
