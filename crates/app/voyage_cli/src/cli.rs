use clap::{Parser, Subcommand};
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "voyage", about = "Voyage travel assistant", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the version.
    Version,

    /// Chat with the travel assistant through a running relay server.
    Chat {
        /// Base URL of the relay server.
        #[arg(long, env = "VOYAGE_SERVER_URL", default_value = "http://127.0.0.1:3100")]
        server: Url,

        /// Publishable map-service key; without it the map stays disabled.
        #[arg(long, env = "AZURE_MAPS_KEY")]
        map_key: Option<String>,
    },
}
