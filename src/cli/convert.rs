//! Convert subcommand

use crate::date::{self, WireDate};
use clap::Parser;
use serde_json::json;

use super::{CliError, OutputFormat};

/// Show both representations of one date
#[derive(Parser, Debug)]
pub struct ConvertCommand {
    /// Date as YYYY-MM-DD or DDMMYYYY
    pub value: String,
}

impl ConvertCommand {
    /// Parse the value in whichever form it is written.
    ///
    /// A `-` marks the display form; anything else must be a wire date.
    pub fn resolve(&self) -> Result<WireDate, CliError> {
        let value = self.value.trim();
        let wire = if value.contains('-') {
            date::to_wire(value)?
        } else {
            WireDate::parse(value)?
        };
        Ok(wire)
    }

    /// Execute the convert command
    pub fn execute(&self, format: OutputFormat) -> Result<(), CliError> {
        let wire = self.resolve()?;
        let display = date::to_display(&wire);

        match format {
            OutputFormat::Json => println!(
                "{}",
                json!({ "display": display, "wire": wire.to_string() })
            ),
            OutputFormat::Human => {
                println!("Display: {display}");
                println!("Wire:    {wire}");
            }
        }
        Ok(())
    }
}
