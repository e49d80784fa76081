use clap::Parser;
use flags_server::{FlagServer, DEFAULT_BIND_ADDRESS, DEFAULT_PORT};

#[derive(Debug, Parser)]
#[command(name = "flags-server", version, about = "In-memory feature flag service")]
struct Cli {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind
    #[arg(short, long, default_value = DEFAULT_BIND_ADDRESS)]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let server = FlagServer::builder()
        .with_bind_address(&cli.bind)
        .with_port(cli.port)
        .build();

    server.serve().await?;

    Ok(())
}
