use std::path::{Path, PathBuf};

/// Inputs and destination of one dataset build
#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub geo_path: PathBuf,
    pub timetable_path: PathBuf,
    pub output_db: PathBuf,
    /// Replace an existing dataset at `output_db` instead of refusing
    pub overwrite: bool,
}

impl BuildConfig {
    pub fn new(
        geo_path: impl Into<PathBuf>,
        timetable_path: impl Into<PathBuf>,
        output_db: impl Into<PathBuf>,
    ) -> Self {
        Self {
            geo_path: geo_path.into(),
            timetable_path: timetable_path.into(),
            output_db: output_db.into(),
            overwrite: false,
        }
    }

    pub fn overwrite(self, overwrite: bool) -> Self {
        Self { overwrite, ..self }
    }

    /// Whether the run may write to `output_db`
    pub fn destination_clear(&self) -> bool {
        self.overwrite || !Path::new(&self.output_db).exists()
    }
}
