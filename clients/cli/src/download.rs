use std::cell::Cell;
use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;

use cloudy_rs::Cloudy;
use cloudy_rs::model::file::FileLocation;
use cloudy_rs::service::transfer::TransferProgress;

use crate::CliError;
use crate::input::FileInput;

pub async fn download(
    cloudy: &Cloudy, target: FileInput, dest: PathBuf,
) -> Result<(), CliError> {
    let file = target.find(cloudy, FileLocation::Drive).await?;

    let total = Cell::new(0);
    let nth_file = Cell::new(0);
    let update_status = move |status: TransferProgress| match status {
        TransferProgress::CalculatedTotal(n_files) => total.set(n_files),
        TransferProgress::StartingItem(name) => {
            nth_file.set(nth_file.get() + 1);
            print!("({}/{}) downloading: {}... ", nth_file.get(), total.get(), name);
            let _ = io::stdout().flush();
        }
        TransferProgress::FinishedItem(_name) => println!("done."),
        TransferProgress::FailedItem(_name, message) => println!("{}: {message}", "failed".red()),
    };

    let report = cloudy
        .download_files(&[file], &dest, &Some(update_status))
        .await?;

    if !report.all_succeeded() {
        return Err(CliError::new("download failed"));
    }
    Ok(())
}
