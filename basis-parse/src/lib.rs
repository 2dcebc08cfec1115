//! Loader, writer and integrity checks for NWChem-format Gaussian basis files.
//!
//! The 6-311G(2df,2pd) polarization set ships with the crate, both on disk
//! under `basis_files/` and embedded in the library:
//!
//! ```
//! let basis = basis_parse::builtin("6-311G(2df,2pd)").unwrap();
//! let li = basis.shells("Li", "D");
//! assert_eq!(li.len(), 2);
//! assert!(li[0].exponents()[0] > li[1].exponents()[0]);
//! ```

pub mod check;
pub mod parse_nwchem;
pub mod write_nwchem;

use std::path::PathBuf;

use phf::{phf_map, Map};

pub use parse_nwchem::{Atom, BasisFile, GTO, parse, parse_str};
pub use write_nwchem::write_string;

/// Error types for loading and validating basis files
#[derive(Debug, thiserror::Error)]
pub enum BasisError {
    #[error("line {line}: {msg}")]
    Format { line: usize, msg: String },

    #[error("line {line}: unknown element symbol `{symb}`")]
    UnknownElement { line: usize, symb: String },

    #[error("line {line}: unknown shell label `{label}`")]
    UnknownShell { line: usize, label: String },

    #[error("missing `{0}` marker")]
    MissingMarker(&'static str),

    #[error("invalid shell: {0}")]
    InvalidShell(String),

    #[error("element {0} is not present in the basis")]
    MissingAtom(String),

    #[error("basis `{0}` is not included in std library")]
    UnknownBasis(String),

    #[error("integrity check failed for {symb}: {msg}")]
    Integrity { symb: String, msg: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BasisError>;

/// Normalized basis name -> file under `basis_files/`
pub static BASIS_MAP: Map<&'static str, &'static str> = phf_map! {
    "6311g2df2pd" => "6-311g_2df_2pd.dat",
};

/// Element symbol -> atomic number (H through Kr)
pub static ELEMENT_MAP: Map<&'static str, i32> = phf_map! {
    "H" => 1, "He" => 2,
    "Li" => 3, "Be" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9, "Ne" => 10,
    "Na" => 11, "Mg" => 12, "Al" => 13, "Si" => 14, "P" => 15, "S" => 16, "Cl" => 17, "Ar" => 18,
    "K" => 19, "Ca" => 20, "Sc" => 21, "Ti" => 22, "V" => 23, "Cr" => 24, "Mn" => 25, "Fe" => 26,
    "Co" => 27, "Ni" => 28, "Cu" => 29, "Zn" => 30, "Ga" => 31, "Ge" => 32, "As" => 33, "Se" => 34,
    "Br" => 35, "Kr" => 36,
};

pub const POLARIZATION_2DF_2PD: &str = include_str!("../basis_files/6-311g_2df_2pd.dat");

const BASIS_EXCEPTIONS: [char; 2] = ['*', '+'];

/// Reduces a user-facing basis name to its `BASIS_MAP` key, so that
/// "6-311G(2df,2pd)" and "6311g2df2pd" name the same set.
pub fn normalize_basis_name(basis_name: &str) -> String {
    basis_name
        .trim()
        .to_lowercase()
        .chars()
        .filter(|x| x.is_alphanumeric() | BASIS_EXCEPTIONS.contains(x))
        .collect::<String>()
}

fn lookup(b_name: &str) -> Result<&'static str> {
    BASIS_MAP
        .get(normalize_basis_name(b_name).as_str())
        .copied()
        .ok_or_else(|| BasisError::UnknownBasis(b_name.to_string()))
}

pub fn basis_path(b_name: &str) -> Result<PathBuf> {
    let file = lookup(b_name)?;
    Ok(PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/basis_files/")).join(file))
}

/// Reads a registered basis from `basis_files/`.
pub fn get_basis_info(b_name: &str) -> Result<BasisFile> {
    let path = basis_path(b_name)?;
    parse(&path)
}

/// Parses the copy of a registered basis compiled into the library.
pub fn builtin(b_name: &str) -> Result<BasisFile> {
    match lookup(b_name)? {
        "6-311g_2df_2pd.dat" => parse_str(POLARIZATION_2DF_2PD),
        _ => Err(BasisError::UnknownBasis(b_name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_name_success() {
        for name in ["6-311G(2df,2pd)", "6311g2df2pd", "  6-311g(2DF,2PD) ", "6-311G_2df_2pd"] {
            assert!(BASIS_MAP.contains_key(normalize_basis_name(name).as_str()), "{name}");
        }
    }

    #[test]
    fn basis_name_fails() {
        assert!(matches!(builtin("6-311G(2df,2pd)*"), Err(BasisError::UnknownBasis(_))));
        assert!(matches!(builtin("6-311++G(2df,2pd)"), Err(BasisError::UnknownBasis(_))));
        assert!(matches!(get_basis_info("sto-3g"), Err(BasisError::UnknownBasis(_))));
    }

    #[test]
    fn disk_and_builtin_agree() {
        let on_disk = get_basis_info("6-311G(2df,2pd)").unwrap();
        let embedded = builtin("6-311G(2df,2pd)").unwrap();
        assert_eq!(on_disk, embedded);
    }

    #[test]
    fn element_map_covers_first_row() {
        assert_eq!(ELEMENT_MAP.get("Li"), Some(&3));
        assert_eq!(ELEMENT_MAP.get("Ne"), Some(&10));
        assert_eq!(ELEMENT_MAP.get("Kr"), Some(&36));
        assert!(ELEMENT_MAP.get("Xx").is_none());
    }
}
