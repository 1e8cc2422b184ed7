use std::io;
use std::path::PathBuf;

use isola_ir::IrError;
use isola_wasm::DecodeError;

/// Failure to load a module from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot decode '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
}

/// Failure to isolate a function body.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IsolateError {
    #[error("function index {index} is out of range (module has {count} functions)")]
    OutOfRange { index: usize, count: usize },
    #[error("function {index} is imported and has no body")]
    Bodyless { index: usize },
    #[error("cannot allocate the isolated module: {0}")]
    ResourceExhaustion(#[source] IrError),
    #[error("source module is malformed: {0}")]
    Malformed(#[source] IrError),
}

impl From<IrError> for IsolateError {
    fn from(err: IrError) -> Self {
        match err {
            IrError::Exhausted { .. } | IrError::IndexOverflow { .. } => {
                IsolateError::ResourceExhaustion(err)
            }
            IrError::DanglingExpr(_)
            | IrError::DanglingRange { .. }
            | IrError::DanglingSig(_)
            | IrError::NotATree { .. } => IsolateError::Malformed(err),
        }
    }
}
