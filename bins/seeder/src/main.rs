//! Database seeder for Trustfund development and testing.
//!
//! Seeds a small student directory (courses, students, academic-year
//! enrollments) and an "Alumni Fund" trust with an opening inflow. Safe to
//! run repeatedly: rows that already exist are skipped.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use trustfund_core::ledger::{InflowInput, LedgerService};
use trustfund_db::entities::{academic_years, courses, students};
use trustfund_db::{PgDirectory, PgLedgerStore};
use trustfund_shared::AppError;
use uuid::Uuid;

const SEED_TRUST_NAME: &str = "Alumni Fund";

/// Courses offered: (id, name).
const COURSES: [(u128, &str); 3] = [
    (0x0100, "BSc Physics"),
    (0x0101, "BA Economics"),
    (0x0102, "BCom Accounting"),
];

/// Students: (id, full name, roll number, course id, academic year id).
const STUDENTS: [(u128, &str, &str, u128, u128); 4] = [
    (0x0200, "Asha Rao", "PHY-2025-001", 0x0100, 0x0300),
    (0x0201, "Ravi Kumar", "PHY-2025-002", 0x0100, 0x0301),
    (0x0202, "Meera Iyer", "ECO-2025-001", 0x0101, 0x0302),
    (0x0203, "Farhan Ali", "COM-2025-001", 0x0102, 0x0303),
];

const SESSION: &str = "2025-26";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = trustfund_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding courses...");
    seed_courses(&db).await?;

    println!("Seeding students and enrollments...");
    seed_students(&db).await?;

    println!("Seeding trust...");
    seed_trust(&db).await.context("Failed to seed trust")?;

    println!("Seeding complete!");
    Ok(())
}

/// Seeds the course catalogue.
async fn seed_courses(db: &DatabaseConnection) -> anyhow::Result<()> {
    for (id, name) in COURSES {
        let id = Uuid::from_u128(id);
        if courses::Entity::find_by_id(id).one(db).await?.is_some() {
            println!("  Course '{name}' already exists, skipping...");
            continue;
        }
        courses::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to create course '{name}'"))?;
        println!("  Created course '{name}'");
    }
    Ok(())
}

/// Seeds students, each enrolled in one course for the current session.
async fn seed_students(db: &DatabaseConnection) -> anyhow::Result<()> {
    for (id, full_name, roll_number, course_id, academic_year_id) in STUDENTS {
        let id = Uuid::from_u128(id);
        if students::Entity::find_by_id(id).one(db).await?.is_some() {
            println!("  Student {roll_number} already exists, skipping...");
            continue;
        }
        students::ActiveModel {
            id: Set(id),
            full_name: Set(full_name.to_string()),
            roll_number: Set(roll_number.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to create student {roll_number}"))?;

        academic_years::ActiveModel {
            id: Set(Uuid::from_u128(academic_year_id)),
            student_id: Set(id),
            course_id: Set(Uuid::from_u128(course_id)),
            session: Set(SESSION.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to enroll student {roll_number}"))?;
        println!("  Created student {roll_number} ({full_name})");
    }
    Ok(())
}

/// Seeds a trust through the ledger service so its opening inflow is
/// recorded like any other.
async fn seed_trust(db: &DatabaseConnection) -> Result<(), AppError> {
    let ledger = LedgerService::new(
        Arc::new(PgLedgerStore::new(db.clone())),
        Arc::new(PgDirectory::new(db.clone())),
    );

    let existing = ledger.list_trusts().await?;
    if existing.iter().any(|t| t.name == SEED_TRUST_NAME) {
        println!("  Trust '{SEED_TRUST_NAME}' already exists, skipping...");
        return Ok(());
    }

    let trust = ledger
        .create_trust(
            SEED_TRUST_NAME,
            Some("Donations from the alumni association".to_string()),
        )
        .await?;
    ledger
        .apply_inflow(InflowInput {
            trust_id: trust.id,
            amount: dec!(50000),
            notes: Some("Opening balance".to_string()),
        })
        .await?;
    println!("  Created trust '{SEED_TRUST_NAME}' ({})", trust.id);
    Ok(())
}
