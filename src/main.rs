use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use pgn_replay::replay;

#[derive(Parser, Debug)]
#[command(about = "Replay a PGN game and print the final position", version)]
struct CmdArgs {
    /// PGN input file
    input: PathBuf,
}

fn main() -> Result<()> {
    let cmd_args = CmdArgs::parse();
    let file = File::open(&cmd_args.input)
        .with_context(|| format!("failed to open [{}]", cmd_args.input.display()))?;
    let board = replay(file)
        .with_context(|| format!("failed to replay [{}]", cmd_args.input.display()))?;
    print!("{board}");
    Ok(())
}
