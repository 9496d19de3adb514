use chrono::Duration;
use rust_decimal::Decimal;
use storefront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    middleware::auth::SessionKeys,
    models::{NewProduct, NewUser},
    store::{PgStore, ProductFilter, StorefrontStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;
    let store = PgStore::new(pool);

    let user = store
        .upsert_user(NewUser {
            email: "test.user@example.com".into(),
            name: Some("Test User".into()),
            image: Some("https://via.placeholder.com/150".into()),
        })
        .await?;
    println!("Ensured user {} ({})", user.email, user.id);

    seed_products(&store).await?;

    let sessions = SessionKeys::new(&config.session_secret);
    let token = sessions.issue(user.id, Some(&user.email), Duration::days(30))?;
    println!("Session token for {}: {token}", user.email);
    Ok(())
}

async fn seed_products(store: &PgStore) -> anyhow::Result<()> {
    let probe = ProductFilter {
        term: None,
        limit: 1,
        offset: 0,
    };
    let (_, existing) = store.list_products(&probe).await?;
    if existing > 0 {
        println!("Catalog already has {existing} products, skipping");
        return Ok(());
    }

    let products = vec![
        (
            "Wireless Headphones",
            "Premium noise-cancelling wireless headphones.",
            29999,
            "https://via.placeholder.com/300?text=Headphones",
        ),
        (
            "Smartphone",
            "Latest model with high-resolution camera.",
            89999,
            "https://via.placeholder.com/300?text=Smartphone",
        ),
        (
            "Laptop",
            "Powerful laptop for professionals.",
            129999,
            "https://via.placeholder.com/300?text=Laptop",
        ),
        (
            "Smart Watch",
            "Track your fitness and stay connected.",
            19999,
            "https://via.placeholder.com/300?text=Watch",
        ),
    ];

    for (name, description, cents, image_url) in products {
        store
            .insert_product(NewProduct {
                name: name.into(),
                description: description.into(),
                price: Decimal::new(cents, 2),
                image_url: image_url.into(),
            })
            .await?;
    }

    println!("Seeded products");
    Ok(())
}
