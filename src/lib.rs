//! claimboard — authoritative server for a real-time square-claiming game.
//!
//! ARCHITECTURE
//! ============
//! Players race to paint squares on a shared grid; the first to cover a
//! square claims it for good. Clients hold one TCP connection each and
//! exchange newline-delimited JSON with the server.
//!
//! - `game`:       players, the square state machine, and the board
//! - `frame`:      wire codec for actions, replies, and updates
//! - `controller`: maps one action onto the game and yields an `Outcome`
//! - `server`:     session registry, broadcast fan-out, accept loop
//! - `session`:    per-connection read/dispatch/write loop
//! - `client`:     async client with a mirrored board
//! - `config`:     flags and environment for the binary

pub mod client;
pub mod config;
pub mod controller;
pub mod frame;
pub mod game;
pub mod server;
pub mod session;
