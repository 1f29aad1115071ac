//! Serve command: run the timesheet HTTP API.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::ServerConfig;
use crate::server::{self, AppState};

/// Serve command options.
#[derive(Parser, Debug)]
pub struct ServeCommand {
    /// Address to listen on.
    #[arg(long, value_name = "ADDR", env = "GITSHEET_BIND", default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,
}

impl ServeCommand {
    /// Executes the serve command.
    pub async fn execute(self) -> Result<()> {
        let config = ServerConfig::from_env().context("Server configuration is incomplete")?;
        let state = AppState::from_config(config)?;
        server::serve(self.bind, state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_address() {
        let cmd = ServeCommand::try_parse_from(["serve"]).unwrap();
        assert_eq!(cmd.bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn custom_bind_address() {
        let cmd = ServeCommand::try_parse_from(["serve", "--bind", "127.0.0.1:9000"]).unwrap();
        assert_eq!(cmd.bind.port(), 9000);
    }
}
