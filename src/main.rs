//! Page Gate server binary.
//!
//! Wires the adapters together: PostgreSQL entitlement store, Stripe
//! gateway, JWT validator, filesystem content storage, and the seeded
//! collaborator stand-ins for the material catalog and user directory.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use page_gate::adapters::auth::JwtCredentialValidator;
use page_gate::adapters::catalog::InMemoryMaterialCatalog;
use page_gate::adapters::content::LocalFileStorage;
use page_gate::adapters::directory::InMemoryUserDirectory;
use page_gate::adapters::gateway::{StripeConfig, StripeGateway};
use page_gate::adapters::http::{api_router, AppState};
use page_gate::adapters::store::PostgresEntitlementStore;
use page_gate::config::AppConfig;
use page_gate::domain::foundation::{MaterialId, Money, Role, UserId};
use page_gate::ports::{MaterialRecord, UserRecord};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        test_mode = config.payment.is_test_mode(),
        "starting page-gate"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let store = Arc::new(PostgresEntitlementStore::new(pool));
    let gateway = Arc::new(StripeGateway::new(
        StripeConfig::new(config.payment.stripe_api_key.clone())
            .with_timeout(Duration::from_secs(config.payment.timeout_secs)),
    ));
    let content = Arc::new(LocalFileStorage::new(config.storage.content_dir.clone()));
    let validator = Arc::new(JwtCredentialValidator::new(&SecretString::new(
        config.auth.jwt_secret.clone(),
    )));

    // Catalog and directory belong to external collaborators; until those
    // services are attached, serve the demo seed set.
    let (catalog, directory) = seed_collaborators(&config.payment.currency);

    let state = AppState::new(store, catalog, directory, gateway, content, validator);

    let app = api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.server.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn seed_collaborators(
    currency: &str,
) -> (Arc<InMemoryMaterialCatalog>, Arc<InMemoryUserDirectory>) {
    let materials = vec![
        MaterialRecord {
            id: MaterialId::new(),
            title: "Linear Algebra Lecture Notes".to_string(),
            price: Money::new(Decimal::from_str("1500.00").unwrap(), currency)
                .expect("seed price is valid"),
            content_ref: "linear-algebra-notes.pdf".to_string(),
        },
        MaterialRecord {
            id: MaterialId::new(),
            title: "Microeconomics Exam Summary".to_string(),
            price: Money::new(Decimal::from_str("950.00").unwrap(), currency)
                .expect("seed price is valid"),
            content_ref: "microeconomics-summary.pdf".to_string(),
        },
    ];

    let users = vec![
        UserRecord {
            id: UserId::new(),
            role: Role::User,
        },
        UserRecord {
            id: UserId::new(),
            role: Role::Admin,
        },
    ];

    for material in &materials {
        tracing::info!(id = %material.id, title = %material.title, "seeded material");
    }
    for user in &users {
        tracing::info!(id = %user.id, role = user.role.as_str(), "seeded user");
    }

    (
        Arc::new(InMemoryMaterialCatalog::with_materials(materials)),
        Arc::new(InMemoryUserDirectory::with_users(users)),
    )
}
