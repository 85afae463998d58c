//! Example of fetching a player profile from a comlink instance

use comlink_client::{ComlinkClient, PlayerIdentifier, player_payload};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create a client for a local comlink instance. Credentials are read
    // from ACCESS_KEY / SECRET_KEY when the instance requires HMAC.
    let client = ComlinkClient::new("http://localhost:3000")?.with_credentials_from_env()?;
    println!("Base URL: {}", client.base_url());
    println!("Signed requests: {}", client.is_signed());

    // Fetch a player profile by ally code
    let payload = player_payload(&PlayerIdentifier::AllyCode("123-456-789".to_string()), false)?;
    let player = client.post("player", &payload).await?;

    println!("Player name: {}", player["name"]);
    println!("Guild ID: {}", player["guildId"]);

    Ok(())
}
