use deepl_http::{DeepLClient, UsageKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = DeepLClient::from_env()?;
    println!("server: {}", client.server_url());

    let usage = client.usage().await?;
    println!("{}", UsageKind::Summary.select(usage));

    Ok(())
}
