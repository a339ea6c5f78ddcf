use std::cell::Cell;
use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;

use cloudy_rs::Cloudy;
use cloudy_rs::service::transfer::TransferProgress;

use crate::CliError;

pub async fn upload(
    cloudy: &Cloudy, files: Vec<PathBuf>, to: Option<String>,
) -> Result<(), CliError> {
    if files.is_empty() {
        return Err(CliError::new("nothing to upload"));
    }

    let dest = match to {
        Some(path) => {
            let folder = cloudy
                .resolve_path(&path, cloudy_rs::model::file::FileLocation::Drive)
                .await?;
            if !folder.is_folder() {
                return Err(CliError::new(format!("'{path}' is not a folder")));
            }
            Some(folder.id)
        }
        None => None,
    };

    let total = Cell::new(0);
    let nth_file = Cell::new(0);
    let update_status = move |status: TransferProgress| match status {
        TransferProgress::CalculatedTotal(n_files) => total.set(n_files),
        TransferProgress::StartingItem(name) => {
            nth_file.set(nth_file.get() + 1);
            print!("({}/{}) uploading: {}... ", nth_file.get(), total.get(), name);
            let _ = io::stdout().flush();
        }
        TransferProgress::FinishedItem(_name) => println!("done."),
        TransferProgress::FailedItem(_name, message) => println!("{}: {message}", "failed".red()),
    };

    let report = cloudy
        .upload_files(&files, dest, &Some(update_status))
        .await?;

    println!("{} of {} uploaded.", report.completed(), report.items.len());
    if !report.all_succeeded() {
        let failed: Vec<String> = report
            .failed()
            .into_iter()
            .map(|item| item.name.clone())
            .collect();
        return Err(CliError::new(format!("failed: {}", failed.join(", "))));
    }
    Ok(())
}
