use {aistudio_config::StudioConfig, aistudio_gateway::ChannelRegistry, anyhow::Result};

/// Print the resolved channel table.
pub fn list(config: &StudioConfig) -> Result<()> {
    let registry = ChannelRegistry::from_config(config);
    if registry.is_empty() {
        println!("No channels configured.");
        return Ok(());
    }

    let width = registry.iter().map(|c| c.name.len()).max().unwrap_or(0);
    for channel in registry.iter() {
        let auth = if channel.requires_pin {
            "pin"
        } else {
            "open"
        };
        println!(
            "  {:<width$}  {:<4}  {}  {}",
            channel.name, auth, channel.description, channel.url
        );
    }
    Ok(())
}
