//! Locations command - prints the location list as the site resolves it

use clap::Args;

#[derive(Args, Clone, Debug)]
pub struct LocationsArgs {
    /// Bypass the cache and read the source again
    #[arg(long)]
    pub refresh: bool,
}

pub async fn run(args: LocationsArgs) -> anyhow::Result<()> {
    let config = super::bootstrap()?;
    let state = crate::create_app_state_with_config(&config)?;

    let locations = state.locations.get_all_locations(args.refresh).await;
    let status = state.locations.status().await;

    println!("{}", serde_json::to_string_pretty(&locations)?);
    eprintln!(
        "{} location(s), source: {}, environment: {:?}",
        status.count, status.source, status.environment
    );

    Ok(())
}
