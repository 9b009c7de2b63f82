//! Lookup tables: bias signal labels by bitmask position and the
//! text of enumerated field values.

use super::FieldId;

/// Label of a bias bitmask position with no assigned signal
pub const SPARE_SIGNAL: &str = "spare";

pub(crate) const GPS_PHASE_BIAS: &[&str] = &["L1C", "L2W", "L2L", "L5Q"];
pub(crate) const GLO_PHASE_BIAS: &[&str] = &["L1C", "L2C"];
pub(crate) const GAL_PHASE_BIAS: &[&str] = &["L1C", "L5Q", "L7Q"];
pub(crate) const BDS_PHASE_BIAS: &[&str] = &["L2I", "L5P", "L7I", "L6I", "L1P", "L7P", "L8P"];
pub(crate) const QZS_PHASE_BIAS: &[&str] = &["L1C", "L2L", "L5Q"];

pub(crate) const GPS_CODE_BIAS: &[&str] = &["C1C", "C2W", "C2L", "C5Q"];
pub(crate) const GLO_CODE_BIAS: &[&str] = &["C1C", "C2C"];
pub(crate) const GAL_CODE_BIAS: &[&str] = &["C1C", "C5Q", "C7Q"];
pub(crate) const BDS_CODE_BIAS: &[&str] = &["C2I", "C5P", "C7I", "C6I", "C1P", "C7P", "C8P"];
pub(crate) const QZS_CODE_BIAS: &[&str] = &["C1C", "C2L", "C5Q"];

/// Signal label of bitmask position `position`, counted from the most
/// significant bit of the mask
pub(crate) fn signal_label(labels: &'static [&'static str], position: u16) -> &'static str {
    labels
        .get(usize::from(position))
        .copied()
        .unwrap_or(SPARE_SIGNAL)
}

const CONTINUITY: &[&str] = &[
    "0 secs", "1 secs", "5 secs", "10 secs", "30 secs", "60 secs", "120 secs", "320 secs",
];

const USER_RANGE_ERROR: &[&str] = &[
    "unknown", "0.01 m", "0.02 m", "0.05 m", "0.1 m", "0.3 m", "1.0 m", "> 1.0 m",
];

const TROPO_QUALITY: &[&str] = &[
    "unknown",
    "<= 0.010 m",
    "<= 0.020 m",
    "<= 0.040 m",
    "<= 0.080 m",
    "<= 0.160 m",
    "<= 0.320 m",
    "> 0.320 m",
];

const TROPO_COEFF_SIZE: &[&str] = &[
    "Troposphere small coefficient block",
    "Troposphere large coefficient block",
];

const TROPO_RESIDUAL_SIZE: &[&str] = &["Troposphere small residual", "Troposphere large residual"];

const IONO_QUALITY: &[&str] = &[
    "unknown",
    "<= 0.03 TECU",
    "<= 0.05 TECU",
    "<= 0.07 TECU",
    "<= 0.14 TECU",
    "<= 0.28 TECU",
    "<= 0.56 TECU",
    "<= 1.12 TECU",
    "<= 2.24 TECU",
    "<= 4.48 TECU",
    "<= 8.96 TECU",
    "<= 17.92 TECU",
    "<= 35.84 TECU",
    "<= 71.68 TECU",
    "<= 143.36 TECU",
    "> 143.36 TECU",
];

const IONO_COEFF_SIZE: &[&str] = &[
    "Ionosphere small coefficient block",
    "Ionosphere large coefficient block",
];

const IONO_RESIDUAL_SIZE: &[&str] = &[
    "Ionosphere small residual",
    "Ionosphere medium residual",
    "Ionosphere large residual",
    "Ionosphere extra large residual",
];

const SHELL_HEIGHT: &[&str] = &["350 km", "400 km", "450 km", "500 km"];

const BPAC_GRID_SPACING: &[&str] = &["2.5 deg", "5.0 deg", "10.0 deg", "15.0 deg"];

const VTEC_SIZE: &[&str] = &["small VTEC residual", "large VTEC residual"];

const ENCRYPTION_TYPE: &[&str] = &["AES", "ChaCha12", "ChaCha20"];

const KEY_LENGTH: &[&str] = &["96 bits", "128 bits", "192 bits", "256 bits", "512 bits"];

pub(crate) const KEY_LENGTH_BITS: &[u16] = &[96, 128, 192, 256, 512];

const GROUP_AUTH_TYPE: &[&str] = &["none", "Ed25519", "SHA-2", "SHA-3"];

const CAD_LENGTH: &[&str] = &[
    "32 bits", "64 bits", "96 bits", "128 bits", "192 bits", "256 bits", "512 bits",
];

const GAL_EPHEMERIS: &[&str] = &["Galileo F/NAV", "Galileo I/NAV", "Galileo C/NAV"];

const BDS_EPHEMERIS: &[&str] = &[
    "D1 Nav (B1I)",
    "D2 Nav (B1I)",
    "D1 Nav (B3I)",
    "D2 Nav (B3I)",
    "B-CNAV1",
    "B-CNAV2",
];

const QZS_EPHEMERIS: &[&str] = &["LNAV (L1C/A)", "CNAV2 (L1C)", "CNAV (L2C,L5)"];

fn labels(field: FieldId) -> Option<&'static [&'static str]> {
    use FieldId::*;
    Some(match field {
        Sf015 | Sf022 => CONTINUITY,
        Sf024 => USER_RANGE_ERROR,
        Sf042 => TROPO_QUALITY,
        Sf044 => TROPO_COEFF_SIZE,
        Sf051 => TROPO_RESIDUAL_SIZE,
        Sf055 => IONO_QUALITY,
        Sf056 => IONO_COEFF_SIZE,
        Sf063 => IONO_RESIDUAL_SIZE,
        Sf070 => SHELL_HEIGHT,
        Sf077 | Sf078 => BPAC_GRID_SPACING,
        Sf081 => VTEC_SIZE,
        Sf085 | Sf085a => ENCRYPTION_TYPE,
        Sf087 => KEY_LENGTH,
        Sf090 => GROUP_AUTH_TYPE,
        Sf091 => CAD_LENGTH,
        Sf096 => GAL_EPHEMERIS,
        Sf097 => BDS_EPHEMERIS,
        Sf098 => QZS_EPHEMERIS,
        _ => return None,
    })
}

impl FieldId {
    /// Text of an enumerated value, `None` for fields without an
    /// enumeration or values outside it
    pub fn enum_label(self, value: u64) -> Option<&'static str> {
        let labels = labels(self)?;
        usize::try_from(value)
            .ok()
            .and_then(|i| labels.get(i))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_label() {
        assert_eq!(signal_label(GPS_PHASE_BIAS, 0), "L1C");
        assert_eq!(signal_label(GPS_PHASE_BIAS, 3), "L5Q");
        assert_eq!(signal_label(GPS_PHASE_BIAS, 4), SPARE_SIGNAL);
        assert_eq!(signal_label(BDS_CODE_BIAS, 6), "C8P");
    }

    #[test]
    fn test_enum_label() {
        assert_eq!(FieldId::Sf015.enum_label(7), Some("320 secs"));
        assert_eq!(FieldId::Sf022.enum_label(2), Some("5 secs"));
        assert_eq!(FieldId::Sf070.enum_label(1), Some("400 km"));
        assert_eq!(FieldId::Sf085a.enum_label(0), Some("AES"));
        assert_eq!(FieldId::Sf098.enum_label(3), None);
        assert_eq!(FieldId::Sf032.enum_label(0), None);
    }

    #[test]
    fn test_phase_and_code_tables_align() {
        for (phase, code) in [
            (GPS_PHASE_BIAS, GPS_CODE_BIAS),
            (GLO_PHASE_BIAS, GLO_CODE_BIAS),
            (GAL_PHASE_BIAS, GAL_CODE_BIAS),
            (BDS_PHASE_BIAS, BDS_CODE_BIAS),
            (QZS_PHASE_BIAS, QZS_CODE_BIAS),
        ] {
            assert_eq!(phase.len(), code.len());
            for (p, c) in phase.iter().zip(code.iter()) {
                assert_eq!(p[1..], c[1..]);
            }
        }
    }
}
