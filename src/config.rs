//! Server configuration from flags and environment.
//!
//! Every flag has an environment fallback so deployments can configure the
//! server without a wrapper script. Flags win over environment.

use clap::Parser;

use crate::game::PALETTE;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3710;
pub const DEFAULT_PLAYERS: usize = 2;
pub const DEFAULT_BOARD_SIZE: usize = 10;
pub const MAX_BOARD_SIZE: usize = 100;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "claimboard", about = "Authoritative server for the square-claiming board game")]
pub struct Config {
    /// Interface to listen on.
    #[arg(long, env = "CLAIMBOARD_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// TCP port to listen on.
    #[arg(long, short, env = "CLAIMBOARD_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Players that must join before the game starts.
    #[arg(long, env = "CLAIMBOARD_PLAYERS", default_value_t = DEFAULT_PLAYERS, value_parser = parse_player_count)]
    pub players: usize,

    /// Board height in squares.
    #[arg(long, env = "CLAIMBOARD_ROWS", default_value_t = DEFAULT_BOARD_SIZE, value_parser = parse_board_size)]
    pub rows: usize,

    /// Board width in squares.
    #[arg(long, env = "CLAIMBOARD_COLS", default_value_t = DEFAULT_BOARD_SIZE, value_parser = parse_board_size)]
    pub cols: usize,
}

impl Config {
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_player_count(raw: &str) -> Result<usize, String> {
    parse_in_range(raw, 1, PALETTE.len())
}

fn parse_board_size(raw: &str) -> Result<usize, String> {
    parse_in_range(raw, 1, MAX_BOARD_SIZE)
}

fn parse_in_range(raw: &str, min: usize, max: usize) -> Result<usize, String> {
    let value: usize = raw.trim().parse().map_err(|e| format!("`{raw}` is not a number: {e}"))?;
    if !(min..=max).contains(&value) {
        return Err(format!("must be between {min} and {max}, got {value}"));
    }
    Ok(value)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
