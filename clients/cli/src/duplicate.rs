use cloudy_rs::Cloudy;
use cloudy_rs::model::file::FileLocation;

use crate::CliError;
use crate::input::FileInput;

pub async fn duplicate(cloudy: &Cloudy, target: FileInput) -> Result<(), CliError> {
    let file = target.find(cloudy, FileLocation::Drive).await?;

    let copy = cloudy.duplicate_file(file.id).await?;
    println!("duplicated '{}' as '{}'", file.name, copy.name);
    Ok(())
}
