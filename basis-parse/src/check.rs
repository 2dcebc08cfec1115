//! Integrity checks that guard the shipped data against accidental edits.
//!
//! Each check returns the first violation it finds as
//! [`BasisError::Integrity`], naming the offending element.

use crate::{BasisError, BasisFile, Result};

/// Elements covered by the 6-311G(2df,2pd) polarization set, in file order.
pub const POLARIZATION_ELEMENTS: [&str; 8] = ["Li", "Be", "B", "C", "N", "O", "F", "Ne"];

fn violation(symb: &str, msg: String) -> BasisError {
    BasisError::Integrity { symb: symb.to_string(), msg }
}

pub fn check_exponents_positive(basis: &BasisFile) -> Result<()> {
    for atom in basis.get_atoms() {
        for gto in atom.get_gtos() {
            if let Some(e) = gto.exponents().into_iter().find(|e| *e <= 0.0) {
                return Err(violation(atom.get_symb(), format!("non-positive exponent {e}")));
            }
        }
    }
    Ok(())
}

/// Every element carries exactly `n` entries with the given label.
pub fn check_shell_count(basis: &BasisFile, label: &str, n: usize) -> Result<()> {
    for atom in basis.get_atoms() {
        let found = basis.shells(atom.get_symb(), label).len();
        if found != n {
            return Err(violation(
                atom.get_symb(),
                format!("expected {n} {label} entries, found {found}"),
            ));
        }
    }
    Ok(())
}

/// Exponents decrease strictly, both down the rows of an entry and from
/// one entry of the label to the next (tight functions first).
pub fn check_descending(basis: &BasisFile, label: &str) -> Result<()> {
    for atom in basis.get_atoms() {
        let exps = basis
            .shells(atom.get_symb(), label)
            .iter()
            .flat_map(|gto| gto.exponents())
            .collect::<Vec<f64>>();
        if let Some(pair) = exps.windows(2).find(|pair| pair[0] <= pair[1]) {
            return Err(violation(
                atom.get_symb(),
                format!("{label} exponent {} does not exceed the following {}", pair[0], pair[1]),
            ));
        }
    }
    Ok(())
}

/// Every entry is a single primitive carrying exactly `coef`.
pub fn check_uncontracted(basis: &BasisFile, coef: f64) -> Result<()> {
    for atom in basis.get_atoms() {
        for gto in atom.get_gtos() {
            if gto.get_num_prim() != 1 || gto.get_num_cont() != 1 {
                return Err(violation(
                    atom.get_symb(),
                    format!(
                        "{} entry is {} primitives x {} contractions",
                        gto.get_label(),
                        gto.get_num_prim(),
                        gto.get_num_cont()
                    ),
                ));
            }
            let c = gto.get_orbs()[0][1];
            if c != coef {
                return Err(violation(atom.get_symb(), format!("coefficient {c} != {coef}")));
            }
        }
    }
    Ok(())
}

pub fn check_elements(basis: &BasisFile, expected: &[&str]) -> Result<()> {
    let found = basis.symbols();
    if found != expected {
        let symb = found
            .iter()
            .zip(expected)
            .find(|(a, b)| a != b)
            .map(|(a, _)| *a)
            .unwrap_or("-");
        return Err(violation(symb, format!("expected elements {expected:?}, found {found:?}")));
    }
    Ok(())
}

/// All properties of the 6-311G(2df,2pd) d polarization data.
pub fn check_polarization_2df_2pd(basis: &BasisFile) -> Result<()> {
    if basis.get_name() != "ao basis" {
        log::warn!("unexpected block name \"{}\"", basis.get_name());
    }
    check_elements(basis, &POLARIZATION_ELEMENTS)?;
    check_exponents_positive(basis)?;
    check_shell_count(basis, "D", 2)?;
    check_uncontracted(basis, 1.0)?;
    check_descending(basis, "D")?;
    log::debug!("{} passed the 6-311G(2df,2pd) checks", basis.get_name());
    Ok(())
}
