use cloudy_rs::Cloudy;
use cloudy_rs::model::file::FileLocation;

use crate::CliError;
use crate::input::{FileInput, confirm};

/// Soft delete: the file goes to the bin and can be restored from there.
pub async fn remove(cloudy: &Cloudy, target: FileInput) -> Result<(), CliError> {
    let file = target.find(cloudy, FileLocation::Drive).await?;

    cloudy.move_to_bin(file.id).await?;
    println!("moved '{}' to the bin", file.name);
    Ok(())
}

pub async fn restore(cloudy: &Cloudy, target: FileInput) -> Result<(), CliError> {
    let file = target.find(cloudy, FileLocation::Bin).await?;

    cloudy.restore_file(file.id).await?;
    println!("restored '{}'", file.name);
    Ok(())
}

/// Hard delete of a binned file. Asks first, there is no undo.
pub async fn purge(cloudy: &Cloudy, target: FileInput) -> Result<(), CliError> {
    let file = target.find(cloudy, FileLocation::Bin).await?;

    if confirm(format!("permanently delete '{}'?", file.name))? {
        cloudy.delete_permanent(file.id).await?;
        println!("'{}' is gone.", file.name);
    }
    Ok(())
}
