//! Normalization of the primitives and contractions of parsed basis shells.

pub mod shells;

use basis_parse::BasisError;

pub use shells::{NormalizedShell, ShellSet, ShellSetBuilder, gaussian_int, gto_norm, normalize};

#[derive(Debug, thiserror::Error)]
pub enum NormError {
    #[error(transparent)]
    Basis(#[from] BasisError),

    #[error("{0} entries must be split before normalization")]
    Combined(String),

    #[error("contraction {k} of a {symb} shell has no positive self-overlap")]
    Degenerate { symb: String, k: usize },

    #[error("no basis selected")]
    NoBasis,

    #[error("It appears your element list is no good: {0}")]
    Elements(String),
}

pub type Result<T> = std::result::Result<T, NormError>;
