//! `dougong`: command line front-end for the Dougong payment gateway client.
//!
//! Loads credentials and transport settings from a TOML file, then prepares, sends
//! or verifies one request and prints the result as JSON on stdout.
//!
//! ```text
//! dougong --config dougong.toml prepare query '{"huifu_id":"6666000000000000","out_ord_id":"X1"}'
//! dougong --config dougong.toml send refund_query -  < input.json
//! dougong verify --body "$RESP_DATA" --sign "$SIGN"
//! ```

mod cli;
mod observability;

use clap::Parser;

use crate::{
    cli::{Cli, run},
    observability::{LogFormat, init_observability},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_observability(LogFormat::from_env());

    let output = run(Cli::parse()).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
