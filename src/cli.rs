//! Command-line interface: argument parsing and command dispatch.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};

use crate::catalog::{ALL_DISEASES, DiseaseKind};
use crate::client::PredictionClient;
use crate::error::DermaScanError;
use crate::http;
use crate::prediction::ReportState;
use crate::render;
use crate::upload;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "dermascan",
    version,
    about = "Skin lesion analysis client — benign/malignant and multiclass predictions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze one dermoscopic image against the prediction backend
    Analyze {
        /// Path to a single JPG or PNG image (max. 5 MiB)
        image: PathBuf,

        /// Prediction endpoint base URL (overrides DERMASCAN_API_URL)
        #[arg(long)]
        endpoint: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        output: OutputFormat,
    },

    /// Browse the educational skin-condition catalog
    Diseases {
        /// Catalog key to open: melanoma, basal_cell, squamous_cell, benign
        key: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        output: OutputFormat,
    },

    /// Check that the prediction backend is reachable
    Health {
        /// Prediction endpoint base URL (overrides DERMASCAN_API_URL)
        #[arg(long)]
        endpoint: Option<String>,
    },
}

pub async fn run(cli: Cli) -> anyhow::Result<String> {
    match cli.command {
        Commands::Analyze {
            image,
            endpoint,
            output,
        } => {
            let image = upload::load_image(&image)?;
            let client = PredictionClient::new(endpoint.as_deref())?;
            let prediction = client.submit(image).await?;

            let rendered = match output {
                OutputFormat::Json => render::json::to_pretty(&prediction)?,
                OutputFormat::Markdown => {
                    render::markdown::report(&ReportState::Settled(prediction))?
                }
            };
            Ok(rendered)
        }

        Commands::Diseases { key, output } => {
            let selection = key.as_deref().map(parse_disease_key).transpose()?;

            let rendered = match output {
                OutputFormat::Json => match selection {
                    Some(kind) => render::json::to_pretty(kind.entry())?,
                    None => {
                        let entries: Vec<_> =
                            ALL_DISEASES.iter().map(|kind| kind.entry()).collect();
                        render::json::to_pretty(&entries)?
                    }
                },
                OutputFormat::Markdown => render::markdown::diseases(selection)?,
            };
            Ok(rendered)
        }

        Commands::Health { endpoint } => Ok(health(endpoint.as_deref()).await?),
    }
}

fn parse_disease_key(key: &str) -> Result<DiseaseKind, DermaScanError> {
    DiseaseKind::from_key(key).ok_or_else(|| DermaScanError::NotFound {
        entity: "disease".to_string(),
        id: key.to_string(),
        suggestion: format!(
            "Valid keys: {}",
            ALL_DISEASES
                .iter()
                .map(|kind| kind.key())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    })
}

async fn health(endpoint_flag: Option<&str>) -> Result<String, DermaScanError> {
    let Some(endpoint) = http::resolve_endpoint(endpoint_flag) else {
        return Err(DermaScanError::EndpointNotConfigured {
            env_var: http::ENDPOINT_ENV.to_string(),
        });
    };

    let client = http::shared_client()?;
    let start = Instant::now();
    let (status, latency) = match client.get(&endpoint).send().await {
        Ok(resp) => {
            let elapsed = start.elapsed().as_millis();
            if resp.status().is_success() {
                ("ok".to_string(), format!("{elapsed}ms"))
            } else {
                (
                    "error".to_string(),
                    format!("{elapsed}ms (HTTP {})", resp.status().as_u16()),
                )
            }
        }
        Err(err) => {
            let reason = if err.is_timeout() {
                "timeout"
            } else if err.is_connect() {
                "connect"
            } else {
                "error"
            };
            ("error".to_string(), reason.to_string())
        }
    };

    let mut out = String::new();
    out.push_str("# DermaScan Health Check\n\n");
    out.push_str("| Endpoint | Status | Latency |\n");
    out.push_str("|----------|--------|---------|\n");
    out.push_str(&format!("| {endpoint} | {status} | {latency} |\n"));
    Ok(out)
}
