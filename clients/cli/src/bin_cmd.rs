use cloudy_rs::Cloudy;

use crate::CliError;
use crate::input::confirm;
use crate::list;

#[derive(clap::Subcommand, Debug)]
pub enum BinCmd {
    /// list what is in the bin
    List,
    /// permanently delete everything in the bin
    Empty,
}

pub async fn bin(cloudy: &Cloudy, cmd: BinCmd) -> Result<(), CliError> {
    match cmd {
        BinCmd::List => list::list(cloudy, true, None).await,
        BinCmd::Empty => empty(cloudy).await,
    }
}

async fn empty(cloudy: &Cloudy) -> Result<(), CliError> {
    let binned = cloudy
        .list_files(cloudy_rs::model::file::FileLocation::Bin, false)
        .await?;
    if binned.is_empty() {
        println!("the bin is already empty.");
        return Ok(());
    }

    if confirm(format!("permanently delete {} file(s)?", binned.len()))? {
        cloudy.empty_bin().await?;
        println!("bin emptied.");
    }
    Ok(())
}
