//! Sheet command - prints one sheet as JSON records

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tracing::info;

use crate::domain::sheet::fetch_sheet_filtered;
use crate::domain::SystemClock;
use crate::infrastructure::http::HttpClient;

#[derive(Args, Clone, Debug)]
pub struct SheetArgs {
    /// Sheet (tab) name, e.g. Cities
    pub name: String,

    /// Keep only rows whose state code or state name matches
    #[arg(long)]
    pub state: Option<String>,
}

pub async fn run(args: SheetArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    if !config.sheets.is_configured() {
        anyhow::bail!(
            "Spreadsheet access is not configured (missing: {})",
            config.missing_settings().join(", ")
        );
    }

    let http = Arc::new(HttpClient::with_timeout(Duration::from_secs(
        config.server.http_timeout_secs,
    ))?);
    let store = crate::create_sheet_store(&config, http, Arc::new(SystemClock));

    let records = fetch_sheet_filtered(store.as_ref(), &args.name, args.state.as_deref()).await?;
    info!(sheet = %args.name, count = records.len(), "Fetched sheet");

    println!("{}", serde_json::to_string_pretty(&records)?);

    Ok(())
}
