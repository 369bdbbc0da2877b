//! Client subcommands: call a running gateway and print the result.

use {
    aistudio_client::{ClientError, GatewayClient},
    anyhow::{Result, anyhow},
};

fn rejected(e: ClientError) -> anyhow::Error {
    anyhow!(e.user_message())
}

pub async fn social_media(gateway_url: &str, text: &str, pin: &str) -> Result<()> {
    let out = GatewayClient::new(gateway_url)
        .social_media(text, pin)
        .await
        .map_err(rejected)?;
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

pub async fn podcast(gateway_url: &str, topic: &str) -> Result<()> {
    let audio = GatewayClient::new(gateway_url)
        .podcast(topic)
        .await
        .map_err(rejected)?;
    println!("{audio}");
    Ok(())
}

pub async fn thumbnail(gateway_url: &str, prompt: &str) -> Result<()> {
    let image = GatewayClient::new(gateway_url)
        .thumbnail(prompt)
        .await
        .map_err(rejected)?;
    println!("{image}");
    Ok(())
}

pub async fn health(gateway_url: &str) -> Result<()> {
    let client = GatewayClient::new(gateway_url);
    let backend = client.health().await?;
    let webhook = client.webhook_health().await?;
    println!("{} ({}) at {}", backend.status, backend.environment, backend.timestamp);
    println!("{} at {}", webhook.status, webhook.timestamp);
    Ok(())
}
