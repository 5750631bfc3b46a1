use chrono::Utc;
use student_management_backend::{
    config::Config,
    db::connection::create_pool,
    repositories::auth as token_repo,
    services::auth::sweep_expired,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "session_sweep=info,student_management_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;
    let now = Utc::now();

    let swept = sweep_expired(&pool, now).await?;
    if swept > 0 {
        tracing::info!("Deactivated {} expired sessions", swept);
    }

    let revoked = token_repo::revoke_refresh_tokens_of_inactive_sessions(&pool).await?;
    if revoked > 0 {
        tracing::info!("Revoked {} refresh tokens of inactive sessions", revoked);
    }

    let purged = token_repo::cleanup_expired_blacklist(&pool, now).await?;
    if purged > 0 {
        tracing::info!("Deleted {} expired blacklist entries", purged);
    }

    sqlx::query("VACUUM (ANALYZE) blacklisted_tokens")
        .execute(&pool)
        .await?;

    Ok(())
}
