use std::env;

use anyhow::{anyhow, Context};
use student_management_backend::{
    config::Config,
    db::connection::{create_pool, run_migrations},
    models::user::{CreateUser, UserRole},
    services::auth::create_account,
    validation::validate_payload,
};

fn required(name: &str) -> anyhow::Result<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .with_context(|| format!("{} must be set", name))
}

fn optional(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "student_management_backend=info".into()),
        )
        .init();

    let role: UserRole = optional("NEW_USER_ROLE", "admin")
        .parse()
        .map_err(|err| anyhow!("NEW_USER_ROLE: {}", err))?;
    let username = required("NEW_USER_USERNAME")?;
    let payload = CreateUser {
        first_name: optional("NEW_USER_FIRST_NAME", &username),
        last_name: optional("NEW_USER_LAST_NAME", role.as_str()),
        phone: optional("NEW_USER_PHONE", "0000000000"),
        email: required("NEW_USER_EMAIL")?,
        password: required("NEW_USER_PASSWORD")?,
        username,
        role,
    };
    validate_payload(&payload)?;

    let config = Config::load()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let user = create_account(&pool, payload.into()).await?;
    println!("Created {} user {} ({})", user.role, user.username, user.id);

    Ok(())
}
