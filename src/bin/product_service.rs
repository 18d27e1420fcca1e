use shop_services::{app, config::ServiceKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run(ServiceKind::Products).await
}
