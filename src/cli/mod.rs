//! CLI module for the catalog service
//!
//! Subcommands:
//! - `serve`: run the catalog HTTP API
//! - `status`: print the health of the configured services

pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};

/// Catalog Service - product catalog API with a cache-aside read path
#[derive(Parser)]
#[command(name = "catalog-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the catalog API server
    Serve,

    /// Poll service health endpoints and print their status
    Status(status::StatusArgs),
}
