use colored::Colorize;

use cloudy_rs::Cloudy;
use cloudy_rs::model::file::{FileItem, FileLocation};
use cloudy_rs::model::usage::bytes_to_human;

use crate::CliError;

pub async fn list(cloudy: &Cloudy, bin: bool, path: Option<String>) -> Result<(), CliError> {
    let location = if bin { FileLocation::Bin } else { FileLocation::Drive };

    let files = match path {
        Some(path) => {
            let folder = cloudy.resolve_path(&path, location).await?;
            cloudy.children_of(Some(folder.id), location).await?
        }
        None => cloudy.list_files(location, false).await?,
    };

    if files.is_empty() {
        println!("nothing here.");
        return Ok(());
    }

    let mut files = files;
    files.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    for file in files {
        print_row(&file);
    }
    Ok(())
}

fn print_row(file: &FileItem) {
    let size = file
        .size
        .map(bytes_to_human)
        .unwrap_or_else(|| "-".to_string());
    let when = file.updated_at.format("%Y-%m-%d %H:%M");

    if file.is_folder() {
        println!("{:>10}  {}  {}/", size, when, file.name.blue().bold());
    } else {
        println!("{:>10}  {}  {}", size, when, file.name);
    }
}
