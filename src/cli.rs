use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "person-directory")]
#[command(about = "Person directory HTTP service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve(ServeArgs),

    #[command(about = "Print a bcrypt hash for use in BASIC_AUTH_USERS")]
    HashPassword {
        #[arg(help = "Password to hash")]
        password: String,
        #[arg(long, default_value_t = bcrypt::DEFAULT_COST, help = "bcrypt work factor")]
        cost: u32,
    },
}

#[derive(Debug, Default, Clone, clap::Args)]
pub struct ServeArgs {
    #[arg(long, help = "Address to bind (overrides BIND_ADDR)")]
    pub bind: Option<String>,
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,
}

impl Cli {
    /// Serve when no subcommand is given.
    pub fn command(self) -> Commands {
        self.command.unwrap_or_else(|| Commands::Serve(ServeArgs::default()))
    }
}
