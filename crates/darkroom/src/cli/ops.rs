//! The `darkroom ops` command: list the operation registry.

use clap::Args;
use darkroom_core::OPERATIONS;

/// Arguments for the `ops` command.
#[derive(Args, Debug)]
pub struct OpsArgs {
    /// Output the list as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Execute the ops command.
pub async fn execute(args: OpsArgs) -> anyhow::Result<()> {
    if args.json {
        let names: Vec<&str> = OPERATIONS.iter().map(|op| op.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for op in OPERATIONS {
            println!("{op}");
        }
    }
    Ok(())
}
