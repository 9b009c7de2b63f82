//! SPARTN field (SF) definitions: bit width, value kind and description

use super::{
    tables::{
        BDS_CODE_BIAS, BDS_PHASE_BIAS, GAL_CODE_BIAS, GAL_PHASE_BIAS, GLO_CODE_BIAS,
        GLO_PHASE_BIAS, GPS_CODE_BIAS, GPS_PHASE_BIAS, KEY_LENGTH_BITS, QZS_CODE_BIAS,
        QZS_PHASE_BIAS,
    },
    Expansion, FieldDef, FieldKind, Lookup, Width,
};

macro_rules! spartn_fields {
    ($($variant:ident = $name:literal, $width:expr, $kind:expr, $desc:literal;)+) => {
        /// Identifier of a SPARTN payload field
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum FieldId {
            $($variant,)+
        }

        impl FieldId {
            pub const ALL: &'static [FieldId] = &[$(FieldId::$variant,)+];

            /// Wire name, e.g. `SF032`
            pub const fn name(self) -> &'static str {
                match self {
                    $(FieldId::$variant => $name,)+
                }
            }

            pub const fn description(self) -> &'static str {
                match self {
                    $(FieldId::$variant => $desc,)+
                }
            }

            pub const fn definition(self) -> FieldDef {
                match self {
                    $(FieldId::$variant => FieldDef { width: $width, kind: $kind },)+
                }
            }
        }
    };
}

use FieldKind::{Enumeration as EN, Integer as IN};

const fn fixed(bits: u16) -> Width {
    Width::Fixed(bits)
}

const fn scaled(resolution: f64, min: f64) -> FieldKind {
    FieldKind::Scaled { resolution, min }
}

const fn bitmask(expansion: Expansion) -> FieldKind {
    FieldKind::Bitmask(Some(expansion))
}

const FLAG: FieldKind = FieldKind::Bitmask(None);
const SATELLITES: FieldKind = bitmask(Expansion::Satellite);

const fn sat_mask(widths: &'static [u16]) -> Width {
    Width::Selected {
        selector: FieldId::SatBitmaskLen,
        widths,
    }
}

const fn phase_mask(widths: &'static [u16]) -> Width {
    Width::Selected {
        selector: FieldId::PhaseBiasBitmaskLen,
        widths,
    }
}

const fn code_mask(widths: &'static [u16]) -> Width {
    Width::Selected {
        selector: FieldId::CodeBiasBitmaskLen,
        widths,
    }
}

const ORBIT: FieldKind = scaled(0.002, -16.382);

spartn_fields! {
    Sf005 = "SF005", fixed(9), IN, "Solution issue of update (SIOU)";
    Sf008 = "SF008", fixed(1), EN, "Yaw present flag";
    Sf009 = "SF009", fixed(1), IN, "Satellite reference datum";
    Sf010 = "SF010", fixed(1), IN, "End of OCB set (EOS)";
    SatBitmaskLen = "SatBitmaskLen", fixed(2), IN, "Length of satellite bitmask";
    Sf011 = "SF011", sat_mask(&[32, 44, 56, 64]), SATELLITES, "GPS satellite mask";
    Sf012 = "SF012", sat_mask(&[24, 36, 48, 63]), SATELLITES, "GLONASS satellite mask";
    Sf013 = "SF013", fixed(1), IN, "Do not use (DNU)";
    Sf014O = "SF014O", fixed(1), FLAG, "Orbit data present flag";
    Sf014C = "SF014C", fixed(1), FLAG, "Clock data present flag";
    Sf014B = "SF014B", fixed(1), FLAG, "Bias data present flag";
    Sf015 = "SF015", fixed(3), IN, "Continuity indicator";
    Sf016 = "SF016", fixed(2), EN, "GPS ephemeris type";
    Sf017 = "SF017", fixed(2), EN, "GLONASS ephemeris type";
    Sf018 = "SF018", fixed(8), IN, "GPS IODE";
    Sf019 = "SF019", fixed(7), IN, "GLONASS IODE";
    Sf020R = "SF020R", fixed(14), ORBIT, "Satellite radial correction";
    Sf020A = "SF020A", fixed(14), ORBIT, "Satellite along-track correction";
    Sf020C = "SF020C", fixed(14), ORBIT, "Satellite cross-track correction";
    Sf020Ck = "SF020CK", fixed(14), ORBIT, "Satellite clock correction";
    Sf020Pb = "SF020PB", fixed(14), ORBIT, "Phase bias correction";
    Sf021 = "SF021", fixed(6), scaled(6.0, 0.0), "Satellite yaw";
    Sf022 = "SF022", fixed(3), IN, "IODE continuity";
    Sf023 = "SF023", fixed(1), EN, "Fix flag";
    Sf024 = "SF024", fixed(3), IN, "User range error (URE)";
    PhaseBiasBitmaskLen = "PhaseBiasBitmaskLen", fixed(1), IN, "Length of phase bias bitmask";
    Sf025 = "SF025", phase_mask(&[6, 11]), bitmask(Expansion::PhaseBias(GPS_PHASE_BIAS)), "GPS phase bias mask";
    Sf026 = "SF026", phase_mask(&[5, 9]), bitmask(Expansion::PhaseBias(GLO_PHASE_BIAS)), "GLONASS phase bias mask";
    CodeBiasBitmaskLen = "CodeBiasBitmaskLen", fixed(1), IN, "Length of code bias bitmask";
    Sf027 = "SF027", code_mask(&[6, 11]), bitmask(Expansion::CodeBias(GPS_CODE_BIAS)), "GPS code bias mask";
    Sf028 = "SF028", code_mask(&[5, 9]), bitmask(Expansion::CodeBias(GLO_CODE_BIAS)), "GLONASS code bias mask";
    Sf029 = "SF029", fixed(11), scaled(0.02, -20.46), "Code bias correction";
    Sf030 = "SF030", fixed(5), IN, "Area count";
    Sf031 = "SF031", fixed(8), IN, "Area ID";
    Sf032 = "SF032", fixed(11), scaled(0.1, -90.0), "Area reference latitude";
    Sf033 = "SF033", fixed(12), scaled(0.1, -180.0), "Area reference longitude";
    Sf034 = "SF034", fixed(3), IN, "Area latitude grid node count";
    Sf035 = "SF035", fixed(3), IN, "Area longitude grid node count";
    Sf036 = "SF036", fixed(5), scaled(0.1, 0.1), "Area latitude grid node spacing";
    Sf037 = "SF037", fixed(5), scaled(0.1, 0.1), "Area longitude grid node spacing";
    Sf039 = "SF039", fixed(7), IN, "Number of grid points present";
    Sf040T = "SF040T", fixed(2), IN, "Troposphere poly/grid block present indicator";
    Sf040I = "SF040I", fixed(2), IN, "Ionosphere poly/grid block present indicator";
    Sf041 = "SF041", fixed(3), EN, "Troposphere equation type";
    Sf042 = "SF042", fixed(3), IN, "Troposphere quality";
    Sf043 = "SF043", fixed(8), scaled(0.004, -0.508), "Area average vertical hydrostatic delay";
    Sf044 = "SF044", fixed(1), IN, "Troposphere polynomial coefficient size indicator";
    Sf045 = "SF045", fixed(7), scaled(0.004, -0.252), "Small troposphere coefficient T00";
    Sf046a = "SF046a", fixed(7), scaled(0.001, -0.063), "Small troposphere coefficient T01";
    Sf046b = "SF046b", fixed(7), scaled(0.001, -0.063), "Small troposphere coefficient T10";
    Sf047 = "SF047", fixed(9), scaled(0.0002, -0.051), "Small troposphere coefficient T11";
    Sf048 = "SF048", fixed(9), scaled(0.004, -1.020), "Large troposphere coefficient T00";
    Sf049a = "SF049a", fixed(9), scaled(0.001, -0.255), "Large troposphere coefficient T01";
    Sf049b = "SF049b", fixed(9), scaled(0.001, -0.255), "Large troposphere coefficient T10";
    Sf050 = "SF050", fixed(11), scaled(0.0002, -0.2046), "Large troposphere coefficient T11";
    Sf051 = "SF051", fixed(1), IN, "Troposphere residual field size";
    Sf052 = "SF052", fixed(6), scaled(0.004, -0.124), "Small troposphere residual zenith delay";
    Sf053 = "SF053", fixed(8), scaled(0.004, -0.508), "Large troposphere residual zenith delay";
    Sf054 = "SF054", fixed(3), EN, "Ionosphere equation type";
    Sf055 = "SF055", fixed(4), IN, "Ionosphere quality";
    Sf056 = "SF056", fixed(1), IN, "Ionosphere polynomial coefficient size indicator";
    Sf057 = "SF057", fixed(12), scaled(0.04, -81.88), "Small ionosphere coefficient C00";
    Sf058a = "SF058a", fixed(12), scaled(0.008, -16.376), "Small ionosphere coefficient C01";
    Sf058b = "SF058b", fixed(12), scaled(0.008, -16.376), "Small ionosphere coefficient C10";
    Sf059 = "SF059", fixed(13), scaled(0.002, -8.190), "Small ionosphere coefficient C11";
    Sf060 = "SF060", fixed(14), scaled(0.04, -327.64), "Large ionosphere coefficient C00";
    Sf061a = "SF061a", fixed(14), scaled(0.008, -65.528), "Large ionosphere coefficient C01";
    Sf061b = "SF061b", fixed(14), scaled(0.008, -65.528), "Large ionosphere coefficient C10";
    Sf062 = "SF062", fixed(15), scaled(0.002, -32.766), "Large ionosphere coefficient C11";
    Sf063 = "SF063", fixed(2), IN, "Ionosphere residual field size";
    Sf064 = "SF064", fixed(4), scaled(0.04, -0.28), "Small ionosphere residual slant delay";
    Sf065 = "SF065", fixed(7), scaled(0.04, -2.52), "Medium ionosphere residual slant delay";
    Sf066 = "SF066", fixed(10), scaled(0.04, -20.44), "Large ionosphere residual slant delay";
    Sf067 = "SF067", fixed(14), scaled(0.04, -327.64), "Extra large ionosphere residual slant delay";
    Sf068 = "SF068", fixed(4), IN, "Area issue of update (AIOU)";
    Sf069 = "SF069", fixed(1), IN, "Reserved";
    Sf070 = "SF070", fixed(2), IN, "Ionosphere shell height";
    Sf071 = "SF071", fixed(2), IN, "BPAC area count";
    Sf072 = "SF072", fixed(2), IN, "BPAC area ID";
    Sf073 = "SF073", fixed(8), scaled(1.0, -85.0), "BPAC area reference latitude";
    Sf074 = "SF074", fixed(9), scaled(1.0, -180.0), "BPAC area reference longitude";
    Sf075 = "SF075", fixed(4), IN, "BPAC area latitude grid node count";
    Sf076 = "SF076", fixed(4), IN, "BPAC area longitude grid node count";
    Sf077 = "SF077", fixed(2), IN, "BPAC area latitude grid node spacing";
    Sf078 = "SF078", fixed(2), IN, "BPAC area longitude grid node spacing";
    Sf079 = "SF079", Width::GridNodes { lat: FieldId::Sf075, lon: FieldId::Sf076 }, FLAG, "Grid node present mask";
    Sf080 = "SF080", fixed(12), scaled(0.25, -511.75), "Area average VTEC";
    Sf081 = "SF081", fixed(1), IN, "VTEC size indicator";
    Sf082 = "SF082", fixed(7), scaled(0.25, -15.75), "Small VTEC residual";
    Sf083 = "SF083", fixed(11), scaled(0.25, -255.75), "Large VTEC residual";
    Sf084 = "SF084", fixed(20), IN, "Customer key ID";
    Sf085 = "SF085", fixed(4), EN, "Dynamic key encryption type";
    Sf086 = "SF086", fixed(6), IN, "Week of applicability";
    Sf085a = "SF085a", fixed(4), EN, "Payload encryption type";
    Sf087 = "SF087", fixed(4), IN, "Dynamic key length";
    Sf088 = "SF088", Width::Selected { selector: FieldId::Sf087, widths: KEY_LENGTH_BITS }, IN, "Dynamic key";
    Sf089 = "SF089", fixed(5), IN, "Count of message IDs";
    Sf090 = "SF090", fixed(4), EN, "Group authentication type";
    Sf091 = "SF091", fixed(4), IN, "Computed authentication data (CAD) length";
    Sf092 = "SF092", Width::ValueOf(FieldId::Sf091), IN, "Computed authentication data (CAD)";
    Sf093 = "SF093", sat_mask(&[36, 45, 54, 64]), SATELLITES, "Galileo satellite mask";
    Sf094 = "SF094", sat_mask(&[37, 46, 55, 64]), SATELLITES, "BDS satellite mask";
    Sf095 = "SF095", sat_mask(&[10, 40, 48, 64]), SATELLITES, "QZSS satellite mask";
    Sf096 = "SF096", fixed(3), EN, "Galileo ephemeris type";
    Sf097 = "SF097", fixed(4), EN, "BDS ephemeris type";
    Sf098 = "SF098", fixed(3), EN, "QZSS ephemeris type";
    Sf099 = "SF099", fixed(10), IN, "Galileo IODnav";
    Sf100 = "SF100", fixed(8), IN, "BDS IODE/IODC";
    Sf101 = "SF101", fixed(8), IN, "QZSS IODE";
    Sf102 = "SF102", phase_mask(&[8, 15]), bitmask(Expansion::PhaseBias(GAL_PHASE_BIAS)), "Galileo phase bias mask";
    Sf103 = "SF103", phase_mask(&[8, 15]), bitmask(Expansion::PhaseBias(BDS_PHASE_BIAS)), "BDS phase bias mask";
    Sf104 = "SF104", phase_mask(&[6, 11]), bitmask(Expansion::PhaseBias(QZS_PHASE_BIAS)), "QZSS phase bias mask";
    Sf105 = "SF105", code_mask(&[8, 15]), bitmask(Expansion::CodeBias(GAL_CODE_BIAS)), "Galileo code bias mask";
    Sf106 = "SF106", code_mask(&[8, 15]), bitmask(Expansion::CodeBias(BDS_CODE_BIAS)), "BDS code bias mask";
    Sf107 = "SF107", code_mask(&[6, 11]), bitmask(Expansion::CodeBias(QZS_CODE_BIAS)), "QZSS code bias mask";
    Prn = "PRN", fixed(0), FieldKind::Derived(Lookup::Prn), "Satellite PRN";
    PhaseBias = "PhaseBias", fixed(0), FieldKind::Derived(Lookup::PhaseBias), "Phase bias type";
    CodeBias = "CodeBias", fixed(0), FieldKind::Derived(Lookup::CodeBias), "Code bias type";
}

impl FieldId {
    /// Look a field up by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }
}
