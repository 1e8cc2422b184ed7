use isola_ir::{IrError, ValType};

/// A module that cannot be printed as valid text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrintError {
    #[error("malformed expression tree: {0}")]
    Malformed(#[from] IrError),
    #[error("global {index} is defined without an initializer")]
    MissingInitializer { index: usize },
    #[error("`{0}` is not a reference type")]
    NotARefType(ValType),
    #[error("alignment exponent {0} is out of range")]
    Alignment(u8),
}
