//! Initial data for development environments: two users and their orders.
//!
//! Seeding wipes both tables first, so it must never be enabled against a
//! production database.

use anyhow::{Context, Result};
use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::auth::password::Argon2Verifier;
use crate::database::models::{Order, OrderProduct, OrderStatus, UserRecord};

pub const SEED_PASSWORD: &str = "123456";

const SEED_USERS: &[(&str, &str)] = &[
    ("User Teste", "usertest@gmail.com"),
    ("User Teste2", "usertest2@gmail.com"),
];

/// Rows written by [`seed_initial_data`].
#[derive(Debug, Clone)]
pub struct InitialData {
    pub users: Vec<UserRecord>,
    pub orders: Vec<Order>,
}

fn product(product_id: i64, quantity: i32) -> OrderProduct {
    OrderProduct { product_id, quantity }
}

/// Build the seed users (with hashed passwords) and one order per user.
pub async fn build_initial_data(hasher: &Argon2Verifier) -> Result<InitialData> {
    let mut users = Vec::with_capacity(SEED_USERS.len());
    for (name, email) in SEED_USERS {
        users.push(UserRecord {
            id: Uuid::new_v4(),
            name: (*name).to_string(),
            email: (*email).to_string(),
            password_hash: hasher.hash(SEED_PASSWORD).await?,
        });
    }

    let orders = vec![
        Order::new(
            users[0].auth_user(),
            vec![product(1000, 2), product(1001, 1), product(1002, 1)],
            OrderStatus::Approved,
        ),
        Order::new(
            users[1].auth_user(),
            vec![product(1001, 4), product(1002, 2)],
            OrderStatus::Rejected,
        ),
    ];

    Ok(InitialData { users, orders })
}

/// Replace the contents of the users and orders tables with the seed data.
pub async fn seed_initial_data(pool: &Pool, hasher: &Argon2Verifier) -> Result<InitialData> {
    let data = build_initial_data(hasher).await?;

    let mut client = pool.get().await.context("Failed to get DB connection")?;
    let tx = client
        .transaction()
        .await
        .context("Failed to start seeding transaction")?;

    tx.batch_execute("DELETE FROM orders; DELETE FROM users;")
        .await
        .context("Failed to clear existing data")?;

    for user in &data.users {
        tx.execute(
            "INSERT INTO users (id, name, email, password_hash) VALUES ($1, $2, $3, $4)",
            &[&user.id, &user.name, &user.email, &user.password_hash],
        )
        .await
        .with_context(|| format!("Failed to insert user {}", user.email))?;
    }

    for order in &data.orders {
        let products = serde_json::to_value(&order.products)?;
        let user = serde_json::to_value(&order.user)?;
        tx.execute(
            r#"INSERT INTO orders (id, products, "user", status, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
            &[
                &order.id,
                &products,
                &user,
                &order.status.as_str(),
                &order.created_at,
                &order.updated_at,
            ],
        )
        .await
        .with_context(|| format!("Failed to insert order {}", order.id))?;
    }

    tx.commit().await.context("Failed to commit seed data")?;

    tracing::info!(
        users = data.users.len(),
        orders = data.orders.len(),
        "Initial data was created"
    );
    Ok(data)
}
