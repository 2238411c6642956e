//! Status commands: last download date and the service's current date

use crate::cache::LastDownloadDateCache;
use crate::client::{DataService, DateDetails};
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use super::{Cli, CliError, OutputFormat};

/// Print the date of the most recent download.
pub async fn last_date(cli: &Cli) -> Result<(), CliError> {
    let cache = LastDownloadDateCache::new(Arc::new(cli.service()?));
    let last = cache.get().await?;

    match cli.output_format {
        OutputFormat::Json => println!("{}", json!({ "last_download_date": last })),
        OutputFormat::Human => match last {
            Some(date) => println!("Last download date: {date}"),
            None => println!("No downloads recorded yet"),
        },
    }
    Ok(())
}

/// Print the service's current date, falling back to the local clock.
pub async fn today(cli: &Cli) -> Result<(), CliError> {
    let service = cli.service()?;
    let (details, source) = match service.current_date().await {
        Ok(details) => (details, "service"),
        Err(e) => {
            warn!(error = %e, "Service date unavailable, using local clock");
            (DateDetails::local_today(), "local")
        }
    };

    match cli.output_format {
        OutputFormat::Json => println!(
            "{}",
            json!({
                "date": details.date,
                "dayOfWeek": details.day_of_week,
                "source": source,
            })
        ),
        OutputFormat::Human => {
            println!("{} ({})", details.date, details.day_of_week);
            if source == "local" {
                println!("  (service unreachable, showing local date)");
            }
        }
    }
    Ok(())
}
