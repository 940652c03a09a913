#[tokio::main]
async fn main() -> anyhow::Result<()> {
    watchlog_backend::run().await
}
