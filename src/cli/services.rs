//! Services subcommand implementation.

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::services::known_services;
use clap::Parser;
use console::style;

/// List known port to service mappings.
#[derive(Parser, Debug)]
pub struct ServicesCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub output: OutputFormat,
}

impl ServicesCommand {
    /// Execute the services command.
    pub fn execute(&self) -> CliResult<()> {
        let services = known_services();

        match self.output {
            OutputFormat::Plain => {
                println!("  {:>6}  {}", style("PORT").bold(), style("SERVICE").bold());
                for (port, name) in services {
                    println!("  {:>6}  {}", port, name);
                }
            }
            OutputFormat::Json => {
                let entries: Vec<_> = services
                    .into_iter()
                    .map(|(port, service)| serde_json::json!({ "port": port, "service": service }))
                    .collect();
                let json = serde_json::to_string_pretty(&entries)
                    .map_err(crate::error::ConfigError::from)?;
                println!("{}", json);
            }
            OutputFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(std::io::stdout());
                wtr.write_record(["port", "service"])
                    .map_err(std::io::Error::from)?;
                for (port, name) in services {
                    wtr.write_record([port.to_string().as_str(), name])
                        .map_err(std::io::Error::from)?;
                }
                wtr.flush()?;
            }
        }

        Ok(())
    }
}
