use std::fmt;

use crate::schema::{payloads, Schema};

macro_rules! identities {
    ($($variant:ident = ($msg_type:literal, $msg_subtype:literal), $name:literal, $schema:expr;)+) => {
        /// Message identity, derived from `(msgType, msgSubtype)`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Identity {
            $($variant,)+
            /// Unmapped `(msgType, msgSubtype)` pair, never payload decoded
            Unknown,
        }

        impl Identity {
            pub const ALL: &'static [Identity] = &[$(Identity::$variant,)+];

            pub const fn from_ids(msg_type: u8, msg_subtype: u8) -> Self {
                match (msg_type, msg_subtype) {
                    $(($msg_type, $msg_subtype) => Identity::$variant,)+
                    _ => Identity::Unknown,
                }
            }

            /// Protocol name, e.g. `SPARTN-1X-GAD`
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Identity::$variant => $name,)+
                    Identity::Unknown => "UNKNOWN",
                }
            }

            /// `(msgType, msgSubtype)` of a mapped identity
            pub const fn ids(self) -> Option<(u8, u8)> {
                match self {
                    $(Identity::$variant => Some(($msg_type, $msg_subtype)),)+
                    Identity::Unknown => None,
                }
            }

            /// Payload schema, `None` for identities whose payload is left undecoded
            pub fn schema(self) -> Option<Schema> {
                match self {
                    $(Identity::$variant => $schema,)+
                    Identity::Unknown => None,
                }
            }
        }
    };
}

identities! {
    OcbGps = (0, 0), "SPARTN-1X-OCB-GPS", Some(payloads::OCB_GPS);
    OcbGlo = (0, 1), "SPARTN-1X-OCB-GLO", Some(payloads::OCB_GLO);
    OcbGal = (0, 2), "SPARTN-1X-OCB-GAL", Some(payloads::OCB_GAL);
    OcbBei = (0, 3), "SPARTN-1X-OCB-BEI", Some(payloads::OCB_BDS);
    OcbQzs = (0, 4), "SPARTN-1X-OCB-QZS", Some(payloads::OCB_QZS);
    HpacGps = (1, 0), "SPARTN-1X-HPAC-GPS", Some(payloads::HPAC_GPS);
    HpacGlo = (1, 1), "SPARTN-1X-HPAC-GLO", Some(payloads::HPAC_GLO);
    HpacGal = (1, 2), "SPARTN-1X-HPAC-GAL", Some(payloads::HPAC_GAL);
    HpacBei = (1, 3), "SPARTN-1X-HPAC-BEI", Some(payloads::HPAC_BDS);
    HpacQzs = (1, 4), "SPARTN-1X-HPAC-QZS", Some(payloads::HPAC_QZS);
    Gad = (2, 0), "SPARTN-1X-GAD", Some(payloads::GAD);
    Bpac = (3, 0), "SPARTN-1X-BPAC", Some(payloads::BPAC);
    EasDyn = (4, 0), "SPARTN-1X-EAS-DYN", Some(payloads::EAS_DYN);
    EasGrp = (4, 1), "SPARTN-1X-EAS-GRP", None;
    PropTest = (120, 0), "SPARTN-1X-PROP-TEST", None;
    PropUblox = (120, 1), "SPARTN-1X-PROP-UBLOX", None;
    PropSwift = (120, 2), "SPARTN-1X-PROP-SWIFT", None;
}

impl Identity {
    pub fn is_unknown(self) -> bool {
        self == Identity::Unknown
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Identity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
