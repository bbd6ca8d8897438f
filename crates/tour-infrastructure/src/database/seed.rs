// ============================================================================
// Tour Infrastructure - Demo Data Seeder
// File: crates/tour-infrastructure/src/database/seed.rs
// Description: Demo accounts and tours for local development. Runs only
//              against an empty database.
// ============================================================================

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use tour_core::domain::{Difficulty, Interest, SystemUser, Tour, Tourist};
use tour_core::error::DomainError;
use tour_core::repositories::{TourRepository, UserRepository};
use tour_security::PasswordService;
use tour_shared::Role;

use super::postgres::{db_error, PgTourRepository, PgUserRepository};

pub const DEMO_ADMIN_ID: Uuid = Uuid::from_u128(0x11111111_1111_1111_1111_111111111111);
pub const DEMO_GUIDE_ID: Uuid = Uuid::from_u128(0x22222222_2222_2222_2222_222222222222);
pub const DEMO_GUIDE2_ID: Uuid = Uuid::from_u128(0x33333333_3333_3333_3333_333333333333);

struct DemoTour {
    id: u128,
    guide_id: Uuid,
    name: &'static str,
    description: &'static str,
    difficulty: Difficulty,
    category: Interest,
    price: i64,
    days_ahead: i64,
    key_points: &'static [(f64, f64, &'static str, &'static str)],
    publish: bool,
}

const DEMO_TOURS: &[DemoTour] = &[
    DemoTour {
        id: 0x77777777_7777_7777_7777_777777777777,
        guide_id: DEMO_GUIDE_ID,
        name: "Mountain Hiking Adventure",
        description: "Mountain trails with panoramic views and fresh air.",
        difficulty: Difficulty::Hard,
        category: Interest::Nature,
        price: 150,
        days_ahead: 30,
        key_points: &[
            (45.4215, -75.6972, "Trail Start", "Beginning of the climb"),
            (45.4315, -75.6872, "Mountain Peak", "Highest point of the route"),
            (45.4415, -75.6772, "Forest Rest Area", "Break among the pines"),
        ],
        publish: true,
    },
    DemoTour {
        id: 0x88888888_8888_8888_8888_888888888888,
        guide_id: DEMO_GUIDE_ID,
        name: "City Art Gallery Tour",
        description: "The finest galleries of the city center.",
        difficulty: Difficulty::Easy,
        category: Interest::Art,
        price: 75,
        days_ahead: 15,
        key_points: &[
            (40.7128, -74.0060, "Modern Art Museum", "Contemporary collection"),
            (40.7228, -74.0160, "Classical Gallery", "Renaissance and baroque paintings"),
        ],
        publish: true,
    },
    DemoTour {
        id: 0x99999999_9999_9999_9999_999999999999,
        guide_id: DEMO_GUIDE2_ID,
        name: "Food Market Experience",
        description: "Local cuisine straight from the market vendors.",
        difficulty: Difficulty::Easy,
        category: Interest::Food,
        price: 95,
        days_ahead: 20,
        key_points: &[
            (51.5074, -0.1278, "Central Market", "Heart of the local food scene"),
            (51.5174, -0.1378, "Street Food Alley", "Street food tasting"),
        ],
        publish: true,
    },
    DemoTour {
        id: 0xaaaaaaaa_aaaa_aaaa_aaaa_aaaaaaaaaaaa,
        guide_id: DEMO_GUIDE2_ID,
        name: "Shopping District Tour",
        description: "Popular shopping streets and boutiques.",
        difficulty: Difficulty::Easy,
        category: Interest::Shopping,
        price: 50,
        days_ahead: 45,
        key_points: &[(48.8566, 2.3522, "Fashion Boulevard", "Designer stores")],
        publish: false,
    },
];

/// Seeds demo users and tours. Returns false when data already exists.
pub async fn seed_demo_data(pool: &PgPool) -> Result<bool, DomainError> {
    let populated: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM system_users)")
        .fetch_one(pool)
        .await
        .map_err(db_error("checking seed state"))?;

    if populated {
        info!("Demo data already present, seeding skipped");
        return Ok(false);
    }

    seed_system_users(pool).await?;
    seed_tourists(pool).await?;
    seed_tours(pool).await?;

    info!("Demo data seeded");
    Ok(true)
}

fn hash(password: &str) -> Result<String, DomainError> {
    PasswordService::hash(password).map_err(|e| DomainError::PasswordHashError(e.to_string()))
}

async fn seed_system_users(pool: &PgPool) -> Result<(), DomainError> {
    let admin_hash = hash("Admin123!")?;
    let guide_hash = hash("Guide123!")?;

    let users = [
        SystemUser::new(DEMO_ADMIN_ID, "admin", "admin@tourapp.com", "System", "Administrator", Role::Admin, admin_hash)?,
        SystemUser::new(DEMO_GUIDE_ID, "guide", "guide@tourapp.com", "Tour", "Guide", Role::Guide, guide_hash.clone())?,
        SystemUser::new(DEMO_GUIDE2_ID, "guide2", "guide2@tourapp.com", "Second", "Guide", Role::Guide, guide_hash)?,
    ];

    for user in &users {
        sqlx::query(
            r#"
            INSERT INTO system_users (id, username, email, first_name, last_name, role, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(&user.password_hash)
        .execute(pool)
        .await
        .map_err(db_error("seeding system user"))?;
    }
    Ok(())
}

async fn seed_tourists(pool: &PgPool) -> Result<(), DomainError> {
    let repo = PgUserRepository::new(pool.clone());
    let password_hash = hash("Tourist123!")?;

    let demo = [
        (0x44444444_4444_4444_4444_444444444444_u128, "john_doe", "john.doe@example.com", "John", "Doe", true, vec![Interest::Nature, Interest::Sport]),
        (0x55555555_5555_5555_5555_555555555555, "jane_smith", "jane.smith@example.com", "Jane", "Smith", true, vec![Interest::Art, Interest::Food, Interest::Shopping]),
        (0x66666666_6666_6666_6666_666666666666, "bob_wilson", "bob.wilson@example.com", "Bob", "Wilson", false, vec![Interest::Nature]),
    ];

    for (id, username, email, first, last, wants, interests) in demo {
        let mut tourist = Tourist::new(username, email, first, last, password_hash.clone(), wants, interests)?;
        tourist.id = Uuid::from_u128(id);
        repo.create_tourist(&tourist).await?;
    }
    Ok(())
}

async fn seed_tours(pool: &PgPool) -> Result<(), DomainError> {
    let repo = PgTourRepository::new(pool.clone());
    let now = Utc::now();

    for demo in DEMO_TOURS {
        let mut tour = Tour::new(
            demo.guide_id,
            demo.name,
            demo.description,
            demo.difficulty,
            demo.category,
            Decimal::from(demo.price),
            now + Duration::days(demo.days_ahead),
        )?;
        tour.id = Uuid::from_u128(demo.id);

        for (lat, lon, name, description) in demo.key_points {
            tour.add_key_point(*lat, *lon, name, description, None)?;
        }
        if demo.publish {
            tour.publish()?;
        }
        repo.create(&tour).await?;
    }
    Ok(())
}
