use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let _state = vellum::run()?;
    Ok(())
}
