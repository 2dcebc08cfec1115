use std::fmt::{self, Display, Formatter};

use crate::BasisFile;

/// Formats a value the way the Basis Set Exchange writes it (seven decimals)
/// when that loses nothing, otherwise the shortest form that parses back
/// to the same f64. Long decimal expansions switch to exponent notation.
pub fn format_value(x: f64) -> String {
    let fixed = format!("{:.7}", x);
    match fixed.parse::<f64>() {
        Ok(back) if back == x => fixed,
        _ => {
            let short = format!("{}", x);
            if short.len() > MAX_DECIMAL_WIDTH {
                format!("{:e}", x)
            } else if short.contains('.') {
                short
            } else {
                format!("{short}.0")
            }
        }
    }
}

const MAX_DECIMAL_WIDTH: usize = 16;

impl Display for BasisFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for comment in self.get_comments() {
            writeln!(f, "{comment}")?;
        }
        if !self.get_comments().is_empty() {
            writeln!(f)?;
        }
        write!(f, "BASIS \"{}\"", self.get_name())?;
        for keyword in self.get_keywords() {
            write!(f, " {keyword}")?;
        }
        writeln!(f)?;
        for atom in self.get_atoms() {
            for gto in atom.get_gtos() {
                writeln!(f, "{:<2}    {}", atom.get_symb(), gto.get_label())?;
                for row in gto.get_orbs() {
                    write!(f, " {:>14}", format_value(row[0]))?;
                    for c in &row[1..] {
                        //Columns always keep at least one separating space
                        write!(f, " {:>22}", format_value(*c))?;
                    }
                    writeln!(f)?;
                }
            }
        }
        writeln!(f, "END")
    }
}

pub fn write_string(basis: &BasisFile) -> String {
    basis.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    fn data_lines(text: &str) -> Vec<Vec<&str>> {
        text.lines()
            .map(str::trim)
            .filter(|line| line.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.'))
            .map(|line| line.split_whitespace().collect())
            .collect()
    }

    #[test]
    fn value_formatting() {
        assert_eq!(format_value(0.4), "0.4000000");
        assert_eq!(format_value(4.608), "4.6080000");
        assert_eq!(format_value(1.0), "1.0000000");
        assert_eq!(format_value(3.42525091), "3.42525091");
        assert_eq!(format_value(-0.09996723), "-0.09996723");
        assert_eq!(format_value(1172.0), "1172.0000000");
        for x in [1.2345678901234567e-8, -0.1234567890123456, 0.000000123456789] {
            let text = format_value(x);
            assert!(text.contains('e'), "{text}");
            assert_eq!(text.parse::<f64>().unwrap(), x);
        }
    }

    #[test]
    fn round_trip_builtin() {
        let basis = parse_str(crate::POLARIZATION_2DF_2PD).unwrap();
        let text = write_string(&basis);
        assert_eq!(parse_str(&text).unwrap(), basis);
        assert_eq!(data_lines(&text), data_lines(crate::POLARIZATION_2DF_2PD));
        assert!(text.lines().any(|line| line == "BASIS \"ao basis\" PRINT"));
        assert_eq!(text.lines().last(), Some("END"));
    }

    #[test]
    fn round_trip_contracted() {
        let input = "\
BASIS \"ao basis\" PRINT
H    S
  3.42525091  0.15432897
  0.62391373  0.53532814
Li    SP
  0.6362897  -0.09996723  0.15591627
END
";
        let basis = parse_str(input).unwrap();
        let text = basis.to_string();
        assert_eq!(parse_str(&text).unwrap(), basis);
        assert_eq!(parse_str(&text).unwrap().to_string(), text);
        let sp_row = format!(
            "{}0.6362897{}-0.09996723{}0.15591627",
            " ".repeat(6),
            " ".repeat(12),
            " ".repeat(13)
        );
        assert!(text.lines().any(|line| line == sp_row), "{text}");
        assert!(text.lines().any(|line| line == "H     S"));
    }

    #[test]
    fn round_trip_wide_values() {
        let input = "\
BASIS \"ao basis\" PRINT
H    S
 1.0 1.2345678901234567e-8
 123456789012.345678 -0.1234567890123456 
 0.000000123456789 3.0e-12
END
";
        let basis = parse_str(input).unwrap();
        let text = write_string(&basis);
        assert_eq!(parse_str(&text).unwrap(), basis, "{text}");
        for line in data_lines(&text) {
            assert_eq!(line.len(), 2, "{text}");
        }
    }
}
