#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sticker_studio_lib::run().await?;
    Ok(())
}
