//! Command line arguments and command dispatch.

use std::{
    io::{self, Read},
    path::PathBuf,
};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use dougong_pay::{ClientConfig, DougongClient, Operation, Params};
use serde_json::{Value, json};
use tracing::info;

/// Dougong payment gateway client.
#[derive(Debug, Parser)]
#[command(name = "dougong", version, about)]
pub struct Cli {
    /// Configuration file (TOML).
    #[arg(long, short, env = "DOUGONG_CONFIG", default_value = "dougong.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate and sign a request, print the envelope without sending it.
    Prepare {
        /// Gateway operation.
        operation: OperationArg,
        /// Input as a JSON object, or `-` to read it from stdin.
        input: String,
    },
    /// Validate, sign and send a request, print the gateway response.
    Send {
        /// Gateway operation.
        operation: OperationArg,
        /// Input as a JSON object, or `-` to read it from stdin.
        input: String,
    },
    /// Verify a gateway signature.
    Verify {
        /// Signed JSON text (`data` of a response or notification).
        #[arg(long)]
        body: String,
        /// Base64 signature.
        #[arg(long)]
        sign: String,
        /// Verify over sorted keys (synchronous responses) instead of the raw body.
        #[arg(long)]
        sorted: bool,
    },
    /// Encrypt a sensitive value with the gateway public key.
    Encrypt {
        /// Plaintext (card number, phone number, ID number).
        plaintext: String,
    },
}

/// Operation names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum OperationArg {
    /// Aggregated payment creation.
    CreatePayment,
    /// Close an order.
    Close,
    /// Query a close request.
    CloseQuery,
    /// Micropay.
    Micropay,
    /// Payment query.
    Query,
    /// Refund.
    Refund,
    /// Refund query.
    RefundQuery,
}

impl From<OperationArg> for Operation {
    fn from(arg: OperationArg) -> Self {
        match arg {
            OperationArg::CreatePayment => Self::CreatePayment,
            OperationArg::Close => Self::Close,
            OperationArg::CloseQuery => Self::CloseQuery,
            OperationArg::Micropay => Self::Micropay,
            OperationArg::Query => Self::Query,
            OperationArg::Refund => Self::Refund,
            OperationArg::RefundQuery => Self::RefundQuery,
        }
    }
}

/// Parses command input into a JSON object.
///
/// `-` reads the whole of stdin.
pub fn parse_input(input: &str) -> anyhow::Result<Params> {
    let text = if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("failed to read input from stdin")?;
        buffer
    } else {
        input.to_owned()
    };

    match serde_json::from_str::<Value>(&text).context("input is not valid JSON")? {
        Value::Object(params) => Ok(params),
        other => bail!("input must be a JSON object, got: {other}"),
    }
}

fn load_client(config: &std::path::Path) -> anyhow::Result<DougongClient> {
    let config = ClientConfig::load(config)?;
    Ok(DougongClient::from_config(config)?)
}

/// Runs one command and returns the JSON document to print.
pub async fn run(cli: Cli) -> anyhow::Result<Value> {
    let client = load_client(&cli.config)
        .with_context(|| format!("failed to load client from {}", cli.config.display()))?;

    match cli.command {
        Command::Prepare { operation, input } => {
            let prepared = client.prepare(operation.into(), &parse_input(&input)?)?;
            Ok(json!({
                "operation": prepared.operation.name(),
                "method": prepared.method.as_str(),
                "url": prepared.url,
                "envelope": prepared.envelope,
            }))
        }
        Command::Send { operation, input } => {
            let operation = Operation::from(operation);
            let response = client.execute(operation, &parse_input(&input)?).await?;
            info!(%operation, "request sent");
            Ok(Value::Object(response))
        }
        Command::Verify { body, sign, sorted } => {
            let valid = if sorted {
                client.signer().verify_sync_response(&parse_input(&body)?, &sign)?
            } else {
                client.signer().verify_notification_body(&body, &sign)?
            };
            Ok(json!({ "valid": valid }))
        }
        Command::Encrypt { plaintext } => {
            Ok(json!({ "ciphertext": client.signer().encrypt(&plaintext)? }))
        }
    }
}
