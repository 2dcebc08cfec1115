use std::cmp::Ordering;

use basis_parse::{BASIS_MAP, BasisError, ELEMENT_MAP, GTO, builtin, normalize_basis_name};
use itertools::iproduct;
use ndarray::{Array1, Array2};
use statrs::function::gamma::gamma;

use crate::{NormError, Result};

/// Radial integral of r^n exp(-alpha r^2) over [0, inf)
pub fn gaussian_int(n: f64, alpha: f64) -> f64 {
    let n1 = (n + 1_f64) / 2_f64;
    gamma(n1) / (2_f64 * alpha.powf(n1))
}

pub fn gto_norm(ang_mom: i32, expnt: f64) -> f64 {
    1_f64 / gaussian_int((ang_mom as f64) * 2_f64 + 2_f64, 2_f64 * expnt).sqrt()
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedShell {
    symb: String,
    ang_mom: i32,
    exps: Array1<f64>,
    /// (num_prim, num_cont); column k is the kth contracted function
    coeffs: Array2<f64>,
}

impl NormalizedShell {
    pub fn get_symb(&self) -> &str {
        self.symb.as_str()
    }
    pub fn get_ang_mom(&self) -> i32 {
        self.ang_mom
    }
    pub fn get_exps(&self) -> &Array1<f64> {
        &self.exps
    }
    pub fn get_coeffs(&self) -> &Array2<f64> {
        &self.coeffs
    }
    pub fn get_num_cont(&self) -> usize {
        self.coeffs.ncols()
    }
    /// Spherical functions spanned by this shell
    pub fn get_nao(&self) -> usize {
        (2 * self.ang_mom as usize + 1) * self.get_num_cont()
    }

    /// Overlap between the contracted radial functions of the shell.
    pub fn overlap(&self) -> Array2<f64> {
        let n = (self.ang_mom * 2 + 2) as f64;
        let nprim = self.exps.len();
        let ncont = self.get_num_cont();
        Array2::from_shape_fn((ncont, ncont), |(k, l)| {
            iproduct!(0..nprim, 0..nprim).fold(0_f64, |acc, (i, j)| {
                acc + gaussian_int(n, self.exps[i] + self.exps[j]) * self.coeffs[[i, k]] * self.coeffs[[j, l]]
            })
        })
    }
}

/// Scales every primitive by its normalization constant, then rescales each
/// contraction to unit self-overlap.
pub fn normalize(symb: &str, gto: &GTO) -> Result<NormalizedShell> {
    let ang_mom = gto
        .get_ang_mom()
        .ok_or_else(|| NormError::Combined(gto.get_label().to_string()))?;
    let es = gto.exponents();
    let orbs = gto.get_orbs();
    let nprim = es.len();
    let ncont = gto.get_num_cont() as usize;

    let mut cs = Array2::from_shape_fn((nprim, ncont), |(i, k)| orbs[i][k + 1] * gto_norm(ang_mom, es[i]));

    let s1 = (0..ncont)
        .map(|k| {
            iproduct!(0..nprim, 0..nprim).fold(0_f64, |acc, (i, j)| {
                acc + gaussian_int((ang_mom * 2 + 2).into(), es[i] + es[j]) * cs[[j, k]] * cs[[i, k]]
            })
        })
        .collect::<Vec<f64>>();

    if let Some(k) = s1.iter().position(|s| s.partial_cmp(&0_f64) != Some(Ordering::Greater)) {
        return Err(NormError::Degenerate { symb: symb.to_string(), k });
    }
    for (k, mut col) in cs.columns_mut().into_iter().enumerate() {
        let scale = s1[k].sqrt();
        col.mapv_inplace(|x| x / scale);
    }

    Ok(NormalizedShell {
        symb: symb.to_string(),
        ang_mom,
        exps: Array1::from(es),
        coeffs: cs,
    })
}

pub struct ShellSetBuilder {
    /// Requested element symbols, first occurrence wins
    elements: Vec<String>,
    /// Normalized basis name (a key of BASIS_MAP)
    basis: String,
}

impl Default for ShellSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ShellSetBuilder {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            basis: String::new(),
        }
    }

    pub fn set_basis(&mut self, basis_name: &str) -> Result<()> {
        let temp = normalize_basis_name(basis_name);
        if BASIS_MAP.contains_key(temp.as_str()) {
            self.basis = temp;
            Ok(())
        } else {
            Err(BasisError::UnknownBasis(basis_name.to_string()).into())
        }
    }

    /// Format = "Li Be; C ..." (whitespace or `;` separated)
    pub fn set_elements_str(&mut self, elements: &str) -> Result<()> {
        let mut out: Vec<String> = Vec::new();
        for symb in elements.split(|c: char| c.is_whitespace() || c == ';').filter(|s| !s.is_empty()) {
            if !ELEMENT_MAP.contains_key(symb) {
                return Err(NormError::Elements(format!("unknown element `{symb}`")));
            }
            if out.iter().any(|s| s == symb) {
                log::warn!("element {} requested twice, keeping the first", symb);
                continue;
            }
            out.push(symb.to_string());
        }
        if out.is_empty() {
            return Err(NormError::Elements(String::from("no elements given")));
        }
        self.elements = out;
        Ok(())
    }

    pub fn build(&self) -> Result<ShellSet> {
        if self.basis.is_empty() {
            return Err(NormError::NoBasis);
        }
        let atoms = builtin(&self.basis)?.select(&self.elements)?;
        let shells = atoms
            .iter()
            .flat_map(|atom| atom.get_gtos().iter().map(move |gto| normalize(atom.get_symb(), gto)))
            .collect::<Result<Vec<NormalizedShell>>>()?;
        log::debug!(
            "built {} shells ({} functions) for {} elements in {}",
            shells.len(),
            shells.iter().map(|s| s.get_nao()).sum::<usize>(),
            atoms.len(),
            self.basis
        );
        Ok(ShellSet {
            basis: self.basis.clone(),
            shells,
        })
    }
}

pub struct ShellSet {
    basis: String,
    shells: Vec<NormalizedShell>,
}

impl ShellSet {
    pub fn get_basis(&self) -> &str {
        self.basis.as_str()
    }
    pub fn get_shells(&self) -> &Vec<NormalizedShell> {
        &self.shells
    }
    pub fn get_nbas(&self) -> usize {
        self.shells.len()
    }
    pub fn get_nao(&self) -> usize {
        self.shells.iter().map(|s| s.get_nao()).sum()
    }
    pub fn overlap(&self, i: usize) -> Option<Array2<f64>> {
        self.shells.get(i).map(|s| s.overlap())
    }
}
