use std::sync::Arc;

use flags_server::store::{FlagStore, MemoryStore};
use flags_server::FlagServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Start with a few flags of our own instead of the default seed
    let store: Arc<dyn FlagStore> = Arc::new(MemoryStore::with_flags([
        ("welcomeMessage", true),
        ("darkMode", false),
        ("betaCheckout", false),
    ]));

    // Flags can be toggled in-process before the server starts
    store.set("darkMode", true).await?;

    println!("Starting flags:");
    for (name, enabled) in store.get_all().await {
        println!("  {}: {}", name, enabled);
    }

    let server = FlagServer::builder()
        .with_bind_address("127.0.0.1")
        .with_port(8080)
        .with_store(store)
        .build();

    server.serve().await?;

    Ok(())
}
