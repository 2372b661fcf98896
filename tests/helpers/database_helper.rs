//! Database-backed test context
//!
//! Flow tests run against a real Postgres instance when `TEST_DATABASE_URL`
//! is exported and are skipped otherwise, so the suite stays runnable on
//! machines without a database.

use sqlx::PgPool;

use festreg::config::GatewayConfig;
use festreg::database::DatabaseService;
use festreg::gateway::build_gateway;
use festreg::services::{CatalogService, PaymentService, RegistrationService};

pub struct TestContext {
    pub pool: PgPool,
    pub db: DatabaseService,
}

impl TestContext {
    /// Connect to the test database and apply migrations.
    /// Returns None when `TEST_DATABASE_URL` is not set.
    pub async fn new() -> Option<Self> {
        let url = std::env::var("TEST_DATABASE_URL").ok()?;

        let pool = PgPool::connect(&url)
            .await
            .expect("failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("failed to run migrations on test database");

        Some(Self {
            db: DatabaseService::new(pool.clone()),
            pool,
        })
    }

    pub fn registration_service(&self) -> RegistrationService {
        RegistrationService::new(
            self.db.events.clone(),
            self.db.participants.clone(),
            self.db.teams.clone(),
        )
    }

    pub fn catalog_service(&self) -> CatalogService {
        CatalogService::new(self.db.events.clone())
    }

    pub fn payment_service(&self, gateway_config: &GatewayConfig) -> PaymentService {
        let gateway = build_gateway(gateway_config).expect("failed to build gateway");
        PaymentService::new(
            gateway,
            self.db.events.clone(),
            self.db.participants.clone(),
            self.db.payments.clone(),
            gateway_config.currency.clone(),
        )
    }

    /// Payment rows recorded against a team
    pub async fn payments_for_team(&self, team_id: i64) -> i64 {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM payments WHERE team_id = $1")
            .bind(team_id)
            .fetch_one(&self.pool)
            .await
            .expect("failed to count team payments");
        count.0
    }

    /// Payment rows recorded against a participant
    pub async fn payments_for_participant(&self, participant_id: i64) -> i64 {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM payments WHERE participant_id = $1")
                .bind(participant_id)
                .fetch_one(&self.pool)
                .await
                .expect("failed to count participant payments");
        count.0
    }
}

/// Print a skip notice for database-gated tests
pub fn skip_notice(test_name: &str) {
    eprintln!("{}: TEST_DATABASE_URL not set, skipping", test_name);
}
