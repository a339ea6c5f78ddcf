use std::path::PathBuf;

use clap::Parser;

use cloudy_rs::Cloudy;
use cloudy_rs::model::config::Config;

mod account;
mod bin_cmd;
mod download;
mod duplicate;
mod error;
mod input;
mod list;
mod move_file;
mod remove;
mod rename;
mod upload;
mod usage;

use error::CliError;
use input::FileInput;

#[derive(Parser, Debug)]
#[command(name = "cloudy", version, about = "your files, on every machine")]
enum CloudyCmd {
    /// create, access and manage your account
    #[command(subcommand)]
    Account(account::AccountCmd),

    /// list your files (pass a folder path to list its children)
    List {
        /// list the bin instead of the drive
        #[arg(long)]
        bin: bool,
        path: Option<String>,
    },

    /// send files from your computer to your cloudy
    Upload {
        files: Vec<PathBuf>,
        /// destination folder path (the root if omitted)
        #[arg(long)]
        to: Option<String>,
    },

    /// bring a file down to your computer
    Download {
        /// a path or file id
        target: FileInput,
        /// directory to download into
        #[arg(long, default_value = ".")]
        dest: PathBuf,
    },

    /// rename a file
    Rename { target: FileInput, new_name: String },

    /// make a server-side copy of a file
    Duplicate { target: FileInput },

    /// move a file into another folder ("/" for the root)
    Move { target: FileInput, new_parent: String },

    /// move a file to the bin
    Delete { target: FileInput },

    /// bring a file back out of the bin
    Restore { target: FileInput },

    /// permanently delete a binned file
    Purge { target: FileInput },

    /// the bin itself
    #[command(subcommand)]
    Bin(bin_cmd::BinCmd),

    /// show storage usage against your data cap
    Usage,
}

#[tokio::main]
async fn main() {
    let cmd = CloudyCmd::parse();

    let cloudy = match Cloudy::init(Config::cli_config("cli")).await {
        Ok(cloudy) => cloudy,
        Err(err) => {
            eprintln!("error: could not initialize: {err}");
            std::process::exit(1);
        }
    };

    let result = run(&cloudy, cmd).await;
    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(cloudy: &Cloudy, cmd: CloudyCmd) -> Result<(), CliError> {
    match cmd {
        CloudyCmd::Account(cmd) => account::account(cloudy, cmd).await,
        CloudyCmd::List { bin, path } => list::list(cloudy, bin, path).await,
        CloudyCmd::Upload { files, to } => upload::upload(cloudy, files, to).await,
        CloudyCmd::Download { target, dest } => download::download(cloudy, target, dest).await,
        CloudyCmd::Rename { target, new_name } => rename::rename(cloudy, target, &new_name).await,
        CloudyCmd::Duplicate { target } => duplicate::duplicate(cloudy, target).await,
        CloudyCmd::Move { target, new_parent } => {
            move_file::move_file(cloudy, target, &new_parent).await
        }
        CloudyCmd::Delete { target } => remove::remove(cloudy, target).await,
        CloudyCmd::Restore { target } => remove::restore(cloudy, target).await,
        CloudyCmd::Purge { target } => remove::purge(cloudy, target).await,
        CloudyCmd::Bin(cmd) => bin_cmd::bin(cloudy, cmd).await,
        CloudyCmd::Usage => usage::usage(cloudy).await,
    }
}
