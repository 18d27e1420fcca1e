use shop_services::{
    app::init_tracing,
    config::DbConfig,
    db::{RetryPolicy, connect_with_retry, run_migrations},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();
    let config = DbConfig::from_env()?;
    let pool = connect_with_retry(&config, RetryPolicy::default()).await?;
    run_migrations(&pool).await?;
    tracing::info!("migrations applied");
    pool.close().await;
    Ok(())
}
