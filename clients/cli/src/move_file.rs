use cloudy_rs::Cloudy;
use cloudy_rs::model::file::FileLocation;

use crate::CliError;
use crate::input::FileInput;

pub async fn move_file(
    cloudy: &Cloudy, target: FileInput, new_parent: &str,
) -> Result<(), CliError> {
    let file = target.find(cloudy, FileLocation::Drive).await?;

    let dest = if new_parent == "/" {
        None
    } else {
        let folder = cloudy.resolve_path(new_parent, FileLocation::Drive).await?;
        if !folder.is_folder() {
            return Err(CliError::new(format!("'{new_parent}' is not a folder")));
        }
        Some(folder.id)
    };

    cloudy.move_file(file.id, dest).await?;
    println!("moved '{}' to '{}'", file.name, new_parent);
    Ok(())
}
