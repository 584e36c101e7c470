use std::error::Error as StdError;
use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MachineError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to load '{path}' into memory")]
    FileLoad {
        path: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, MachineError>;

/// A guest machine driven one cycle at a time by an outside pacer.
pub trait Machine {
    type Outcome;
    type Error: StdError + Send + Sync + 'static;

    fn reset(&mut self);
    fn load(&mut self, program: &[u8]) -> std::result::Result<(), Self::Error>;
    fn step(&mut self) -> std::result::Result<Self::Outcome, Self::Error>;

    /// `(width, height, rgb)` snapshot of the current screen contents.
    fn frame(&self) -> (usize, usize, Vec<u8>);

    fn load_file(&mut self, path: &Path) -> Result<()> {
        let program = fs::read(path)?;
        tracing::debug!(length = program.len(), path = %path.display(), "read program file");
        self.load(&program).map_err(|err| MachineError::FileLoad {
            path: path.display().to_string(),
            source: Box::new(err),
        })
    }
}
