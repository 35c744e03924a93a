//! ==============================================================================
//! main.rs - sensor relay entry point
//! ==============================================================================
//!
//! purpose:
//!     a tiny http relay between a sensor device and a frontend. the device
//!     pushes its latest reading, the relay keeps exactly one copy in memory,
//!     and any client can read it back.
//!
//! responsibilities:
//!     - load configuration (relay.toml + PORT override)
//!     - set up logging
//!     - own the reading slot and hand it to the web server
//!
//! relationships:
//!     - uses: config.rs (RelayConfig)
//!     - uses: domain.rs (ReadingSlot)
//!     - uses: server.rs (routes, listener, shutdown)
//!
//! architecture:
//!
//!     ┌──────────────┐  POST /update-sensor-data  ┌──────────────────┐
//!     │ sensor device│ ─────────────────────────> │   relay (this)   │
//!     └──────────────┘                            │  ┌────────────┐  │
//!                                                 │  │ReadingSlot │  │
//!     ┌──────────────┐  GET /get-sensor-data      │  └────────────┘  │
//!     │   frontend   │ <───────────────────────── │  public/ files   │
//!     └──────────────┘                            └──────────────────┘
//!
//!     nothing is persisted. a restart brings the slot back to `{}`.
//!
//! ==============================================================================

mod config;
mod domain;
mod logger;
mod server;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // startup banner
    println!("===========================================================");
    println!("  Sensor Relay v{}", env!("CARGO_PKG_VERSION"));
    println!("===========================================================");

    // step 1: load configuration
    let mut config = config::RelayConfig::load_or_default();
    config.apply_env()?;
    config.print_summary();

    // step 2: logging
    logger::init(&config.logging.level)?;

    // step 3: the one piece of state, owned here and shared with handlers
    let slot = domain::ReadingSlot::new();

    // step 4: serve until ctrl-c; bind failures end the process
    server::run(&config, slot).await
}
