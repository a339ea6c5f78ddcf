use crate::model::errors::{CloudErrKind, CloudResult};

pub const MAX_FILENAME_LENGTH: usize = 230;

/// Coarse classification of a file by its extension, used for display and as
/// a mime fallback when the server did not record one. The browser client did
/// the same pattern matching to pick icons and preview behavior.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FileKind {
    Image,
    Video,
    Audio,
    Document,
    Archive,
    Code,
    Other,
}

// todo: be more exhaustive
impl FileKind {
    pub fn from_name(name: &str) -> FileKind {
        let ext = name
            .rsplit('.')
            .next()
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp" | "svg" | "ico" => FileKind::Image,
            "mp4" | "mov" | "mkv" | "webm" | "avi" => FileKind::Video,
            "mp3" | "wav" | "flac" | "ogg" | "m4a" => FileKind::Audio,
            "pdf" | "doc" | "docx" | "txt" | "md" | "rtf" | "odt" | "xls" | "xlsx" | "csv"
            | "ppt" | "pptx" => FileKind::Document,
            "zip" | "tar" | "gz" | "bz2" | "xz" | "rar" | "7z" => FileKind::Archive,
            "rs" | "js" | "ts" | "py" | "java" | "c" | "cpp" | "go" | "rb" | "sh" | "html"
            | "css" | "json" | "yaml" | "yml" | "toml" => FileKind::Code,
            _ => FileKind::Other,
        }
    }

    /// A usable content type for uploads when none is known.
    pub fn fallback_mime(&self) -> &'static str {
        match self {
            FileKind::Image => "image/*",
            FileKind::Video => "video/*",
            FileKind::Audio => "audio/*",
            FileKind::Document => "application/pdf",
            FileKind::Archive => "application/zip",
            FileKind::Code | FileKind::Other => "application/octet-stream",
        }
    }
}

pub fn validate_name(name: &str) -> CloudResult<()> {
    if name.is_empty() {
        return Err(CloudErrKind::FileNameEmpty.into());
    }
    if name.contains('/') {
        return Err(CloudErrKind::FileNameContainsSlash.into());
    }
    if name.len() > MAX_FILENAME_LENGTH {
        return Err(CloudErrKind::FileNameTooLong.into());
    }
    Ok(())
}

#[derive(PartialEq, Eq, Debug, Clone)]
pub struct NameComponents {
    pub name: String,
    pub variant: Option<usize>,
    pub extension: Option<String>,
}

impl NameComponents {
    pub fn from(file_name: &str) -> NameComponents {
        let extension_location = file_name.rfind('.').and_then(|location| {
            if location == file_name.len() - 1 { None } else { Some(location) }
        });

        let name_with_variant = match extension_location {
            Some(location) => &file_name[..location],
            None => file_name,
        };

        let mut variant_location = name_with_variant.rfind('-');

        let variant = variant_location
            .map(|location| name_with_variant[location + 1..].to_string())
            .and_then(|maybe_variant| maybe_variant.parse::<usize>().ok());

        if variant.is_none() {
            variant_location = None
        }

        let name = {
            let name_right_bound =
                variant_location.unwrap_or_else(|| extension_location.unwrap_or(file_name.len()));
            file_name[0..name_right_bound].to_string()
        };

        let extension = extension_location.map(|location| file_name[location + 1..].to_string());

        NameComponents { name, variant, extension }
    }

    pub fn generate_next(&self) -> NameComponents {
        let mut next = self.clone();
        next.variant = Some(self.variant.unwrap_or(0) + 1);
        next
    }

    /// Bumps the variant until the name collides with none of `taken`, e.g.
    /// `report.pdf` becomes `report-1.pdf` when a sibling already holds the
    /// plain name.
    pub fn next_available(mut self, taken: &[String]) -> NameComponents {
        while taken.contains(&self.to_name()) {
            self = self.generate_next();
        }
        self
    }

    pub fn to_name(&self) -> String {
        match (&self.variant, &self.extension) {
            (Some(variant), Some(extension)) => format!("{}-{}.{}", self.name, variant, extension),
            (Some(variant), None) => format!("{}-{}", self.name, variant),
            (None, Some(extension)) => format!("{}.{}", self.name, extension),
            (None, None) => self.name.to_string(),
        }
    }
}

#[cfg(test)]
mod unit_tests {
    use crate::model::errors::CloudErrKind;
    use crate::model::filename::{FileKind, NameComponents, validate_name, MAX_FILENAME_LENGTH};

    fn from_components(
        name: &str, variant: Option<usize>, extension: Option<&str>,
    ) -> NameComponents {
        NameComponents {
            name: name.to_string(),
            variant,
            extension: extension.map(|str| str.to_string()),
        }
    }

    #[test]
    fn test_name_components() {
        assert_eq!(NameComponents::from("test-1.md"), from_components("test", Some(1), Some("md")));
        assert_eq!(NameComponents::from("test-.md"), from_components("test-", None, Some("md")));
        assert_eq!(NameComponents::from(".md"), from_components("", None, Some("md")));
        assert_eq!(NameComponents::from(""), from_components("", None, None));
        assert_eq!(
            NameComponents::from("test-file.md"),
            from_components("test-file", None, Some("md"))
        );
        assert_eq!(
            NameComponents::from("test-file-1.md"),
            from_components("test-file", Some(1), Some("md"))
        );
        assert_eq!(NameComponents::from("test"), from_components("test", None, None));
        assert_eq!(NameComponents::from("test-32"), from_components("test", Some(32), None));
    }

    fn assert_symmetry(name: &str) {
        assert_eq!(NameComponents::from(name).to_name(), name);
    }

    #[test]
    fn test_back_to_name() {
        assert_symmetry("test-1.md");
        assert_symmetry("test-.md");
        assert_symmetry(".md");
        assert_symmetry("");
        assert_symmetry("test-file.md");
        assert_symmetry("test-file-1.md");
        assert_symmetry("test");
        assert_symmetry("test-32");
    }

    #[test]
    fn test_next_variant() {
        assert_eq!(NameComponents::from("test.md").generate_next().to_name(), "test-1.md");
        assert_eq!(NameComponents::from("test-2.md").generate_next().to_name(), "test-3.md");
    }

    #[test]
    fn test_next_available() {
        let taken =
            vec!["report.pdf".to_string(), "report-1.pdf".to_string(), "notes.md".to_string()];
        assert_eq!(
            NameComponents::from("report.pdf").next_available(&taken).to_name(),
            "report-2.pdf"
        );
        assert_eq!(NameComponents::from("other.pdf").next_available(&taken).to_name(), "other.pdf");
    }

    #[test]
    fn test_file_kind() {
        assert_eq!(FileKind::from_name("vacation.JPG"), FileKind::Image);
        assert_eq!(FileKind::from_name("report.pdf"), FileKind::Document);
        assert_eq!(FileKind::from_name("backup.tar"), FileKind::Archive);
        assert_eq!(FileKind::from_name("main.rs"), FileKind::Code);
        assert_eq!(FileKind::from_name("mystery"), FileKind::Other);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("report.pdf").is_ok());
        assert_eq!(validate_name("").unwrap_err().kind, CloudErrKind::FileNameEmpty);
        assert_eq!(validate_name("a/b").unwrap_err().kind, CloudErrKind::FileNameContainsSlash);
        let long = "x".repeat(MAX_FILENAME_LENGTH + 1);
        assert_eq!(validate_name(&long).unwrap_err().kind, CloudErrKind::FileNameTooLong);
    }
}
