use cloudy_rs::Cloudy;
use cloudy_rs::model::file::FileLocation;

use crate::CliError;
use crate::input::FileInput;

pub async fn rename(cloudy: &Cloudy, target: FileInput, new_name: &str) -> Result<(), CliError> {
    let file = target.find(cloudy, FileLocation::Drive).await?;

    if file.name == new_name {
        println!("'{new_name}' is already this file's name, nothing to do.");
        return Ok(());
    }

    let renamed = cloudy.rename_file(file.id, new_name).await?;
    println!("renamed '{}' to '{}'", file.name, renamed.name);
    Ok(())
}
