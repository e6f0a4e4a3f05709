pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod fetchers;
pub mod http;
pub mod report;
pub mod services;
pub mod store;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::ingestion::IngestionService;
use crate::services::reporting::ReportService;
use crate::services::server::ServerService;
use crate::services::tracking::TrackingService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_ingest() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let mut service = IngestionService::new(&config)?;
        service.run().await
    })
}

pub fn handle_report(date: Option<NaiveDate>) -> Result<()> {
    let config = AppConfig::new();
    let service = ReportService::new(config);
    service.run(date)
}

pub fn handle_track() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let mut service = TrackingService::new(&config)?;
        service.run().await
    })
}
