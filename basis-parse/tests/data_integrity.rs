use basis_parse::check::POLARIZATION_ELEMENTS;
use basis_parse::{POLARIZATION_2DF_2PD, builtin, get_basis_info, parse_str, write_string};

const EXPONENTS: [(&str, f64, f64); 8] = [
    ("Li", 0.4, 0.1),
    ("Be", 0.51, 0.1275),
    ("B", 0.802, 0.2005),
    ("C", 1.252, 0.313),
    ("N", 1.826, 0.4565),
    ("O", 2.584, 0.646),
    ("F", 3.5, 0.875),
    ("Ne", 4.608, 1.152),
];

#[test]
fn two_d_shells_per_element() {
    let basis = builtin("6-311G(2df,2pd)").unwrap();
    assert_eq!(basis.symbols(), POLARIZATION_ELEMENTS.to_vec());
    for symb in POLARIZATION_ELEMENTS {
        let shells = basis.shells(symb, "D");
        assert_eq!(shells.len(), 2, "{symb}");
        assert_eq!(basis.get_atom(symb).unwrap().get_gtos().len(), 2, "{symb}");
        for gto in shells {
            assert_eq!(gto.get_num_prim(), 1);
            assert_eq!(gto.get_ang_mom(), Some(2));
        }
    }
}

#[test]
fn tight_precedes_diffuse() {
    let basis = builtin("6-311G(2df,2pd)").unwrap();
    for (symb, tight, diffuse) in EXPONENTS {
        let shells = basis.shells(symb, "D");
        assert_eq!(shells[0].exponents(), vec![tight], "{symb}");
        assert_eq!(shells[1].exponents(), vec![diffuse], "{symb}");
        assert!(shells[0].exponents()[0] > shells[1].exponents()[0]);
    }
}

#[test]
fn every_coefficient_is_one() {
    let basis = builtin("6-311G(2df,2pd)").unwrap();
    for atom in basis.get_atoms() {
        for gto in atom.get_gtos() {
            assert_eq!(gto.coefficients(0), vec![1.0]);
        }
    }
}

#[test]
fn block_markers() {
    let significant = POLARIZATION_2DF_2PD
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect::<Vec<&str>>();
    assert_eq!(significant.first(), Some(&"BASIS \"ao basis\" PRINT"));
    assert_eq!(significant.last(), Some(&"END"));
    assert!(POLARIZATION_2DF_2PD.starts_with('#'));
}

#[test]
fn round_trip_preserves_numbers() {
    let basis = get_basis_info("6-311G(2df,2pd)").unwrap();
    let text = write_string(&basis);
    let again = parse_str(&text).unwrap();
    assert_eq!(again, basis);
    assert_eq!(again.get_comments(), basis.get_comments());

    let numbers = |text: &str| {
        text.lines()
            .map(str::trim)
            .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()))
            .flat_map(|line| line.split_whitespace().map(String::from).collect::<Vec<String>>())
            .collect::<Vec<String>>()
    };
    assert_eq!(numbers(&text), numbers(POLARIZATION_2DF_2PD));
}

#[test]
fn full_check_passes() {
    let basis = builtin("6-311g(2df,2pd)").unwrap();
    basis_parse::check::check_polarization_2df_2pd(&basis).unwrap();
}
