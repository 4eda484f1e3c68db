//! Particle identity codes and nucleus composition helpers.
//!
//! Particle types are signed integer codes. The sign encodes
//! matter/antimatter; the magnitude encodes the species. Nuclei use the
//! Monte Carlo `10LZZZAAAI` convention: a nucleus with mass number `A`
//! and charge number `Z` has the code `1_000_000_000 + Z*10_000 + A*10`.
//! Codes below one billion in magnitude are treated as opaque
//! non-nucleus species by these helpers.

/// Build the identity code for a nucleus with mass number `a` and
/// charge number `z`.
///
/// `nucleus_id(1, 1)` is the proton.
pub fn nucleus_id(a: u32, z: u32) -> i32 {
    1_000_000_000 + (z as i32) * 10_000 + (a as i32) * 10
}

/// Whether an identity code denotes a nucleus (or anti-nucleus).
pub fn is_nucleus(id: i32) -> bool {
    id.unsigned_abs() >= 1_000_000_000
}

/// Mass number `A` of a nucleus code. Zero for non-nucleus codes.
pub fn mass_number(id: i32) -> u32 {
    if !is_nucleus(id) {
        return 0;
    }
    (id.unsigned_abs() % 10_000) / 10
}

/// Signed charge number of a nucleus code: `Z` for matter, `-Z` for
/// antimatter. Zero for non-nucleus codes.
pub fn charge_number(id: i32) -> i32 {
    if !is_nucleus(id) {
        return 0;
    }
    let z = ((id.unsigned_abs() % 10_000_000) / 10_000) as i32;
    if id < 0 {
        -z
    } else {
        z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proton_round_trip() {
        let p = nucleus_id(1, 1);
        assert_eq!(p, 1_000_010_010);
        assert!(is_nucleus(p));
        assert_eq!(mass_number(p), 1);
        assert_eq!(charge_number(p), 1);
    }

    #[test]
    fn iron56() {
        let fe = nucleus_id(56, 26);
        assert_eq!(mass_number(fe), 56);
        assert_eq!(charge_number(fe), 26);
    }

    #[test]
    fn antinucleus_has_negative_charge() {
        let anti = -nucleus_id(4, 2);
        assert!(is_nucleus(anti));
        assert_eq!(mass_number(anti), 4);
        assert_eq!(charge_number(anti), -2);
    }

    #[test]
    fn small_codes_are_not_nuclei() {
        for id in [-19, -1, 1, 6, 9, 23, 100_010_001] {
            assert!(!is_nucleus(id));
            assert_eq!(mass_number(id), 0);
            assert_eq!(charge_number(id), 0);
        }
    }

    proptest::proptest! {
        #[test]
        fn composition_round_trips(a in 1u32..300, z in 0u32..120) {
            let id = nucleus_id(a, z);
            proptest::prop_assert!(is_nucleus(id));
            proptest::prop_assert_eq!(mass_number(id), a);
            proptest::prop_assert_eq!(charge_number(id), z as i32);
            proptest::prop_assert_eq!(charge_number(-id), -(z as i32));
        }
    }
}
