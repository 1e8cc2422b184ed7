use isola_ir::IrError;
use isola_print::PrintError;

/// Failure to turn bytes or text into a module, or a module into bytes.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed binary: {0}")]
    Binary(#[from] wasmparser::BinaryReaderError),

    #[error("malformed text: {0}")]
    Text(#[from] wat::Error),

    /// Well-formed input using a feature the IR cannot represent.
    #[error("unsupported {feature} at offset {offset:#x}")]
    Unsupported { feature: String, offset: usize },

    /// Input the binary reader accepts but that cannot describe a module,
    /// e.g. an index into a section that does not exist.
    #[error("malformed module at offset {offset:#x}: {message}")]
    Malformed { message: &'static str, offset: usize },

    #[error("cannot build module: {0}")]
    Ir(#[from] IrError),

    #[error("cannot print module: {0}")]
    Print(#[from] PrintError),
}

impl DecodeError {
    pub(crate) fn unsupported(feature: impl Into<String>, offset: usize) -> Self {
        DecodeError::Unsupported {
            feature: feature.into(),
            offset,
        }
    }

    pub(crate) fn malformed(message: &'static str, offset: usize) -> Self {
        DecodeError::Malformed { message, offset }
    }
}
