use std::fs;
use std::path::Path;

use nom::bytes::complete::{tag, take_until};
use nom::character::complete::{alpha1, char, space0, space1};
use nom::combinator::all_consuming;
use nom::multi::{many0, separated_list1};
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, separated_pair, terminated, tuple};
use nom::IResult;

use crate::{BasisError, ELEMENT_MAP, Result};

pub const ANG_ARRAY: [&str; 7] = ["S", "P", "D", "F", "G", "H", "I"];

/// Angular momentum of a single-letter shell label.
pub fn ang_mom_of(label: &str) -> Option<i32> {
    ANG_ARRAY.iter().position(|x| *x == label).map(|l| l as i32)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    //Atomic symbol (e.g. Li for Lithium)
    symb: String,
    //The associated basis entries in the order they appear in the file
    gtos: Vec<GTO>,
}

impl Atom {
    pub fn get_symb(&self) -> &str {
        self.symb.as_str()
    }
    pub fn get_gtos(&self) -> &Vec<GTO> {
        &self.gtos
    }
}

/// One basis entry: a shell label and its primitive rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GTO {
    //Shell label as written (S, P, D, ..., or the combined SP)
    label: String,
    //Each row is [exponent, c_1, ..., c_ncont]
    orbs: Vec<Vec<f64>>,
}

impl GTO {
    pub fn new(label: &str, orbs: Vec<Vec<f64>>) -> Result<Self> {
        let label = label.to_ascii_uppercase();
        validate_rows(&label, &orbs).map_err(BasisError::InvalidShell)?;
        Ok(GTO { label, orbs })
    }

    pub fn get_label(&self) -> &str {
        self.label.as_str()
    }
    /// `None` for combined labels such as SP; see [`GTO::split`].
    pub fn get_ang_mom(&self) -> Option<i32> {
        ang_mom_of(&self.label)
    }
    pub fn get_num_prim(&self) -> i32 {
        self.orbs.len() as i32
    }
    pub fn get_num_cont(&self) -> i32 {
        (self.orbs[0].len() - 1) as i32
    }
    pub fn get_orbs(&self) -> &[Vec<f64>] {
        &self.orbs
    }

    pub fn exponents(&self) -> Vec<f64> {
        self.orbs.iter().map(|row| row[0]).collect()
    }

    /// Coefficients of the kth contracted function
    pub fn coefficients(&self, k: usize) -> Vec<f64> {
        self.orbs.iter().filter_map(|row| row.get(k + 1).copied()).collect()
    }

    /// Splits an SP entry into its S and P parts; any other entry is
    /// returned unchanged.
    pub fn split(&self) -> Vec<GTO> {
        if self.label == "SP" {
            //SP rows are always [exponent, c_s, c_p]
            return Vec::from([
                GTO {
                    label: String::from("S"),
                    orbs: self.orbs.iter().map(|vec| Vec::from([vec[0], vec[1]])).collect(),
                },
                GTO {
                    label: String::from("P"),
                    orbs: self.orbs.iter().map(|vec| Vec::from([vec[0], vec[2]])).collect(),
                },
            ]);
        }
        vec![self.clone()]
    }
}

fn validate_rows(label: &str, orbs: &[Vec<f64>]) -> std::result::Result<(), String> {
    if label != "SP" && ang_mom_of(label).is_none() {
        return Err(format!("unknown shell label `{label}`"));
    }
    let Some(first) = orbs.first() else {
        return Err(format!("{label} entry has no primitives"));
    };
    if first.len() < 2 {
        return Err(format!("{label} entry needs an exponent and at least one coefficient"));
    }
    if label == "SP" && first.len() != 3 {
        return Err(format!("SP entry needs 3 columns, found {}", first.len()));
    }
    if orbs.iter().flatten().any(|x| !x.is_finite()) {
        return Err(format!("{label} entry holds a non-finite value"));
    }
    if let Some(row) = orbs.iter().find(|row| row.len() != first.len()) {
        return Err(format!(
            "{label} entry mixes rows of {} and {} columns",
            first.len(),
            row.len()
        ));
    }
    Ok(())
}

/// A parsed `BASIS ... END` block together with the citation comments
/// that precede it.
#[derive(Debug, Clone, PartialEq)]
pub struct BasisFile {
    comments: Vec<String>,
    name: String,
    keywords: Vec<String>,
    atoms: Vec<Atom>,
}

impl BasisFile {
    pub fn get_comments(&self) -> &Vec<String> {
        &self.comments
    }
    pub fn get_name(&self) -> &str {
        self.name.as_str()
    }
    pub fn get_keywords(&self) -> &Vec<String> {
        &self.keywords
    }
    pub fn get_atoms(&self) -> &Vec<Atom> {
        &self.atoms
    }
    pub fn get_atom(&self, symb: &str) -> Option<&Atom> {
        self.atoms.iter().find(|atom| atom.symb == symb)
    }
    pub fn symbols(&self) -> Vec<&str> {
        self.atoms.iter().map(|atom| atom.get_symb()).collect()
    }
    pub fn num_shells(&self) -> usize {
        self.atoms.iter().map(|atom| atom.gtos.len()).sum()
    }

    /// All entries for (element, shell label), in file order. Labels match
    /// in any case.
    pub fn shells(&self, symb: &str, label: &str) -> Vec<&GTO> {
        let label = label.to_ascii_uppercase();
        self.get_atom(symb)
            .map(|atom| atom.gtos.iter().filter(|gto| gto.label == label).collect())
            .unwrap_or_default()
    }

    /// Atoms in the requested order with their entries sorted by angular
    /// momentum. SP entries are split.
    pub fn select(&self, atom_list: &[String]) -> Result<Vec<Atom>> {
        atom_list
            .iter()
            .map(|symb| {
                let atom = self
                    .get_atom(symb)
                    .ok_or_else(|| BasisError::MissingAtom(symb.clone()))?;
                let mut t_atom = Atom {
                    symb: symb.clone(),
                    gtos: atom.gtos.iter().flat_map(|gto| gto.split()).collect(),
                };
                t_atom.gtos.sort_by_key(|gto| gto.get_ang_mom());
                Ok(t_atom)
            })
            .collect()
    }
}

// `BASIS "ao basis" PRINT`
fn block_open(input: &str) -> IResult<&str, (&str, Vec<&str>)> {
    preceded(
        tuple((tag("BASIS"), space1)),
        tuple((
            delimited(char('"'), take_until("\""), char('"')),
            many0(preceded(space1, alpha1)),
        )),
    )(input)
}

// `Li    D`
fn shell_header(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(alpha1, space1, alpha1)(input)
}

// `      0.4000000              1.0000000`
fn data_row(input: &str) -> IResult<&str, Vec<f64>> {
    preceded(space0, separated_list1(space1, double))(input)
}

fn parse_line<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    line: &'a str,
) -> Option<O> {
    all_consuming(terminated(parser, space0))(line).ok().map(|(_, out)| out)
}

fn format_err(line: usize, msg: impl Into<String>) -> BasisError {
    BasisError::Format { line, msg: msg.into() }
}

struct PendingShell {
    line: usize,
    symb: String,
    label: String,
    orbs: Vec<Vec<f64>>,
}

fn push_shell(atoms: &mut Vec<Atom>, pending: PendingShell) -> Result<()> {
    validate_rows(&pending.label, &pending.orbs).map_err(|msg| format_err(pending.line, msg))?;
    let gto = GTO { label: pending.label, orbs: pending.orbs };
    match atoms.iter_mut().find(|atom| atom.symb == pending.symb) {
        Some(atom) => atom.gtos.push(gto),
        None => atoms.push(Atom { symb: pending.symb, gtos: vec![gto] }),
    }
    Ok(())
}

/// Parses the text of an NWChem basis file holding one `BASIS ... END` block.
pub fn parse_str(input: &str) -> Result<BasisFile> {
    let mut comments: Vec<String> = Vec::new();
    let mut block: Option<(String, Vec<String>)> = None;
    let mut atoms: Vec<Atom> = Vec::new();
    let mut current: Option<PendingShell> = None;
    let mut closed = false;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            //Only the citation block ahead of BASIS is kept
            if block.is_none() {
                comments.push(raw.trim_end().to_string());
            }
            continue;
        }
        if closed {
            return Err(format_err(line_no, "unexpected content after END"));
        }
        if block.is_none() {
            let (name, keywords) = parse_line(block_open, line)
                .ok_or_else(|| format_err(line_no, "expected `BASIS \"<name>\"` line"))?;
            block = Some((name.to_string(), keywords.into_iter().map(String::from).collect()));
            continue;
        }
        if line.eq_ignore_ascii_case("END") {
            if let Some(pending) = current.take() {
                push_shell(&mut atoms, pending)?;
            }
            closed = true;
            continue;
        }
        if line.starts_with(|c: char| c.is_ascii_alphabetic()) {
            let (symb, label) = parse_line(shell_header, line).ok_or_else(|| {
                format_err(line_no, format!("malformed entry header `{line}`"))
            })?;
            if !ELEMENT_MAP.contains_key(symb) {
                return Err(BasisError::UnknownElement { line: line_no, symb: symb.to_string() });
            }
            let label = label.to_ascii_uppercase();
            if label != "SP" && ang_mom_of(&label).is_none() {
                return Err(BasisError::UnknownShell { line: line_no, label });
            }
            if let Some(pending) = current.take() {
                push_shell(&mut atoms, pending)?;
            }
            current = Some(PendingShell {
                line: line_no,
                symb: symb.to_string(),
                label,
                orbs: Vec::new(),
            });
            continue;
        }
        let row = parse_line(data_row, line)
            .ok_or_else(|| format_err(line_no, format!("malformed data line `{line}`")))?;
        if row.iter().any(|x| !x.is_finite()) {
            return Err(format_err(line_no, "non-finite value"));
        }
        if row.len() < 2 {
            return Err(format_err(line_no, "expected an exponent and a coefficient"));
        }
        match current.as_mut() {
            Some(pending) => pending.orbs.push(row),
            None => return Err(format_err(line_no, "data line before any entry header")),
        }
    }

    let Some((name, keywords)) = block else {
        return Err(BasisError::MissingMarker("BASIS"));
    };
    if !closed {
        return Err(BasisError::MissingMarker("END"));
    }
    if comments.is_empty() {
        log::warn!("basis block \"{}\" has no citation comments", name);
    }
    let basis = BasisFile { comments, name, keywords, atoms };
    log::debug!(
        "parsed {} shells for {} atoms from block \"{}\"",
        basis.num_shells(),
        basis.atoms.len(),
        basis.name
    );
    Ok(basis)
}

pub fn parse(path: &Path) -> Result<BasisFile> {
    log::debug!("reading basis file {}", path.display());
    let file = fs::read_to_string(path)?;
    parse_str(file.as_str())
}
