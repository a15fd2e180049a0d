use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    pdfdeck::cli::run().await
}
