use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info, warn};

use tour_api::{build_router, AppState};
use tour_core::cart::CartStore;
use tour_core::notifications::EmailService;
use tour_core::repositories::{
    LoginAttemptRepository, ProblemRepository, PurchaseRepository, RatingRepository, TourRepository,
    UserRepository,
};
use tour_core::services::{
    AdminService, AuthService, BackgroundJobService, CartService, ProblemService, PurchaseService,
    RatingService, ReplacementService, TourService,
};
use tour_infrastructure::{
    create_pool, run_migrations, seed_demo_data, LogEmailService, PgLoginAttemptRepository,
    PgProblemRepository, PgPurchaseRepository, PgRatingRepository, PgTourRepository, PgUserRepository,
};
use tour_security::JwtService;
use tour_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    let _log_guard = match tour_shared::telemetry::init_telemetry() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize telemetry: {}", e);
            std::process::exit(1);
        }
    };

    info!("Tour server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Connect to Database
    info!("Connecting to database...");
    let pool = create_pool(&config.database).await?;
    info!("Database connection established.");

    if config.database.run_migrations {
        run_migrations(&pool).await?;
        info!("Database migrations applied.");
    }

    if config.app.seed_demo_data {
        match seed_demo_data(&pool).await {
            Ok(true) => info!("Demo data seeded."),
            Ok(false) => info!("Demo data already present, seeding skipped."),
            Err(e) => warn!("Demo data seeding failed: {}", e),
        }
    }

    // Repositories and adapters
    let tours: Arc<dyn TourRepository> = Arc::new(PgTourRepository::new(pool.clone()));
    let purchases: Arc<dyn PurchaseRepository> = Arc::new(PgPurchaseRepository::new(pool.clone()));
    let ratings: Arc<dyn RatingRepository> = Arc::new(PgRatingRepository::new(pool.clone()));
    let problems: Arc<dyn ProblemRepository> = Arc::new(PgProblemRepository::new(pool.clone()));
    let users: Arc<dyn UserRepository> = Arc::new(PgUserRepository::new(pool.clone()));
    let attempts: Arc<dyn LoginAttemptRepository> = Arc::new(PgLoginAttemptRepository::new(pool));
    let email: Arc<dyn EmailService> = Arc::new(LogEmailService::new());
    let carts = Arc::new(CartStore::new());

    let jwt = JwtService::new(
        &config.jwt.secret,
        config.jwt.issuer.clone(),
        config.jwt.audience.clone(),
        config.jwt.access_token_expiry,
    );

    // Create App State
    let jobs = Arc::new(BackgroundJobService::new(
        tours.clone(),
        purchases.clone(),
        users.clone(),
        email.clone(),
    ));
    let state = AppState {
        tours: Arc::new(TourService::new(tours.clone())),
        replacements: Arc::new(ReplacementService::new(tours.clone())),
        carts: Arc::new(CartService::new(tours.clone(), users.clone(), carts.clone())),
        purchases: Arc::new(PurchaseService::new(
            tours.clone(),
            purchases.clone(),
            users.clone(),
            carts,
            email.clone(),
        )),
        ratings: Arc::new(RatingService::new(tours.clone(), ratings, purchases.clone())),
        problems: Arc::new(ProblemService::new(tours, problems, purchases, users.clone(), email)),
        jobs: jobs.clone(),
        auth: Arc::new(AuthService::new(users.clone(), attempts.clone(), jwt.clone())),
        admin: Arc::new(AdminService::new(users, attempts)),
        jwt,
    };

    if config.jobs.enabled {
        spawn_job_scheduler(jobs, config.jobs.interval_seconds);
    } else {
        info!("Background jobs disabled.");
    }

    // Build router
    let app = build_router(state, &config.app.cors_origin);

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Tour server stopped.");
    Ok(())
}

/// Runs cancellation then reminders every `interval_seconds`
fn spawn_job_scheduler(jobs: Arc<BackgroundJobService>, interval_seconds: u64) {
    info!("Background jobs scheduled every {}s", interval_seconds);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds.max(1)));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match jobs.run_all().await {
                Ok(report) => info!(
                    tours_canceled = report.cancellation_result.tours_canceled,
                    tourists_refunded = report.cancellation_result.tourists_refunded,
                    reminders_sent = report.reminder_result.reminders_sent,
                    "Background jobs finished"
                ),
                Err(e) => error!("Background jobs failed: {}", e),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received.");
}
