use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{data::shared_booking::SharedBookingRepository, error::AppError};

/// Starts the proposal expiry scheduler
///
/// Runs every minute and marks shared booking proposals whose 48 hour response window has
/// passed as `expired`. Proposals are also checked lazily when a player responds, so a
/// missed tick only delays the status change in listings.
///
/// # Arguments
/// - `db`: Database connection
pub async fn start_scheduler(db: DatabaseConnection) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job_db = db.clone();

    let job = Job::new_async("0 * * * * *", move |_uuid, _lock| {
        let db = job_db.clone();

        Box::pin(async move {
            if let Err(e) = process_expired_proposals(&db, Utc::now()).await {
                tracing::error!("Error expiring shared booking proposals: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Proposal expiry scheduler started");

    Ok(())
}

/// Expires every open proposal past its deadline.
///
/// # Returns
/// - `Ok(u64)` - Number of proposals marked expired
/// - `Err(AppError::DbErr)` - Database error
pub async fn process_expired_proposals(
    db: &DatabaseConnection,
    now: DateTime<Utc>,
) -> Result<u64, AppError> {
    let expired = SharedBookingRepository::new(db).expire_overdue(now).await?;

    if expired > 0 {
        tracing::info!("Expired {} shared booking proposals", expired);
    }

    Ok(expired)
}
