use std::fmt::{Debug, Display};
use std::io::{self, Write};
use std::str::FromStr;

use cloudy_rs::model::errors::CloudResult;
use cloudy_rs::model::file::{FileItem, FileLocation};
use cloudy_rs::{Cloudy, Uuid};

use crate::CliError;

/// A file named on the command line, either by server path or by id.
#[derive(Clone, Debug)]
pub enum FileInput {
    Id(Uuid),
    Path(String),
}

impl FileInput {
    pub async fn find(&self, cloudy: &Cloudy, location: FileLocation) -> CloudResult<FileItem> {
        match self {
            FileInput::Id(id) => {
                let files = cloudy.list_files(location, false).await?;
                files
                    .into_iter()
                    .find(|file| file.id == *id)
                    .ok_or_else(|| cloudy_rs::CloudErrKind::FileNonexistent.into())
            }
            FileInput::Path(path) => cloudy.resolve_path(path, location).await,
        }
    }
}

impl FromStr for FileInput {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Uuid::from_str(s) {
            Ok(id) => Ok(FileInput::Id(id)),
            Err(_) => Ok(FileInput::Path(s.to_string())),
        }
    }
}

pub fn std_in<T>(prompt: impl Display) -> Result<T, CliError>
where
    T: FromStr,
    <T as FromStr>::Err: Debug,
{
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    answer.retain(|c| c != '\n' && c != '\r');

    answer
        .parse::<T>()
        .map_err(|err| CliError::new(format!("{err:?}")))
}

/// Prompts with `[y/n]` and is only true on an explicit yes.
pub fn confirm(prompt: impl Display) -> Result<bool, CliError> {
    let answer: String = std_in(format!("{prompt} [y/n]: "))?;
    Ok(answer == "y" || answer == "Y")
}
