//! Payload schemas of the decodable message identities

use super::{Count, FieldId, Node, Predicate, Schema};

macro_rules! f {
    ($id:ident) => {
        Node::Field(FieldId::$id)
    };
}

macro_rules! repeat {
    (set_bits($id:ident) { $($node:expr),* $(,)? }) => {
        Node::Group {
            count: Count::SetBits(FieldId::$id),
            children: &[$($node),*],
        }
    };
    (plus_one($id:ident) { $($node:expr),* $(,)? }) => {
        Node::Group {
            count: Count::ValueOfPlusOne(FieldId::$id),
            children: &[$($node),*],
        }
    };
}

macro_rules! when {
    ($id:ident == $value:literal { $($node:expr),* $(,)? }) => {
        Node::Conditional {
            predicate: Predicate::Equals {
                field: FieldId::$id,
                value: $value,
            },
            children: &[$($node),*],
        }
    };
    ($id:ident in [$($value:literal),+] { $($node:expr),* $(,)? }) => {
        Node::Conditional {
            predicate: Predicate::OneOf {
                field: FieldId::$id,
                values: &[$($value),+],
            },
            children: &[$($node),*],
        }
    };
}

/// Orbit, clock and bias corrections for one constellation
macro_rules! ocb_schema {
    (
        ephemeris: $eph:ident,
        satellites: $sats:ident,
        iode: $iode:ident,
        phase_bias: $pb:ident,
        code_bias: $cb:ident $(,)?
    ) => {
        &[
            f!(Sf005),
            f!(Sf010),
            f!(Sf069),
            f!(Sf008),
            f!(Sf009),
            f!($eph),
            f!(SatBitmaskLen),
            f!($sats),
            repeat!(set_bits($sats) {
                f!(Sf013),
                when!(Sf013 == 0 {
                    f!(Prn),
                    f!(Sf014O),
                    f!(Sf014C),
                    f!(Sf014B),
                    f!(Sf015),
                    when!(Sf014O == 1 {
                        f!($iode),
                        f!(Sf020R),
                        f!(Sf020A),
                        f!(Sf020C),
                        when!(Sf008 == 1 { f!(Sf021) }),
                    }),
                    when!(Sf014C == 1 {
                        f!(Sf022),
                        f!(Sf020Ck),
                        f!(Sf024),
                    }),
                    when!(Sf014B == 1 {
                        f!(PhaseBiasBitmaskLen),
                        f!($pb),
                        repeat!(set_bits($pb) {
                            f!(PhaseBias),
                            f!(Sf023),
                            f!(Sf015),
                            f!(Sf020Pb),
                        }),
                        f!(CodeBiasBitmaskLen),
                        f!($cb),
                        repeat!(set_bits($cb) {
                            f!(CodeBias),
                            f!(Sf029),
                        }),
                    }),
                }),
            }),
        ]
    };
}

/// High precision atmosphere corrections for one constellation
macro_rules! hpac_schema {
    (satellites: $sats:ident $(,)?) => {
        &[
            f!(Sf005),
            f!(Sf068),
            f!(Sf069),
            f!(Sf030),
            repeat!(plus_one(Sf030) {
                // area data block
                f!(Sf031),
                f!(Sf039),
                f!(Sf040T),
                f!(Sf040I),
                // troposphere data block
                when!(Sf040T in [1, 2] {
                    f!(Sf041),
                    f!(Sf042),
                    f!(Sf043),
                    f!(Sf044),
                    when!(Sf044 == 0 {
                        f!(Sf045),
                        when!(Sf041 in [1, 2] { f!(Sf046a), f!(Sf046b) }),
                        when!(Sf041 == 2 { f!(Sf047) }),
                    }),
                    when!(Sf044 == 1 {
                        f!(Sf048),
                        when!(Sf041 in [1, 2] { f!(Sf049a), f!(Sf049b) }),
                        when!(Sf041 == 2 { f!(Sf050) }),
                    }),
                }),
                when!(Sf040T == 2 {
                    f!(Sf051),
                    when!(Sf051 == 0 { f!(Sf052) }),
                    when!(Sf051 == 1 { f!(Sf053) }),
                }),
                // ionosphere data block
                when!(Sf040I in [1, 2] {
                    f!(Sf054),
                    f!(SatBitmaskLen),
                    f!($sats),
                    repeat!(set_bits($sats) {
                        f!(Prn),
                        f!(Sf055),
                        f!(Sf056),
                        when!(Sf056 == 0 {
                            f!(Sf057),
                            when!(Sf054 in [1, 2] { f!(Sf058a), f!(Sf058b) }),
                            when!(Sf054 == 2 { f!(Sf059) }),
                        }),
                        when!(Sf056 == 1 {
                            f!(Sf060),
                            when!(Sf054 in [1, 2] { f!(Sf061a), f!(Sf061b) }),
                            when!(Sf054 == 2 { f!(Sf062) }),
                        }),
                        when!(Sf040I == 2 {
                            f!(Sf063),
                            when!(Sf063 == 0 { f!(Sf064) }),
                            when!(Sf063 == 1 { f!(Sf065) }),
                            when!(Sf063 == 2 { f!(Sf066) }),
                            when!(Sf063 == 3 { f!(Sf067) }),
                        }),
                    }),
                }),
            }),
        ]
    };
}

pub(crate) static OCB_GPS: Schema = ocb_schema!(
    ephemeris: Sf016,
    satellites: Sf011,
    iode: Sf018,
    phase_bias: Sf025,
    code_bias: Sf027,
);

pub(crate) static OCB_GLO: Schema = ocb_schema!(
    ephemeris: Sf017,
    satellites: Sf012,
    iode: Sf019,
    phase_bias: Sf026,
    code_bias: Sf028,
);

pub(crate) static OCB_GAL: Schema = ocb_schema!(
    ephemeris: Sf096,
    satellites: Sf093,
    iode: Sf099,
    phase_bias: Sf102,
    code_bias: Sf105,
);

pub(crate) static OCB_BDS: Schema = ocb_schema!(
    ephemeris: Sf097,
    satellites: Sf094,
    iode: Sf100,
    phase_bias: Sf103,
    code_bias: Sf106,
);

pub(crate) static OCB_QZS: Schema = ocb_schema!(
    ephemeris: Sf098,
    satellites: Sf095,
    iode: Sf101,
    phase_bias: Sf104,
    code_bias: Sf107,
);

pub(crate) static HPAC_GPS: Schema = hpac_schema!(satellites: Sf011);
pub(crate) static HPAC_GLO: Schema = hpac_schema!(satellites: Sf012);
pub(crate) static HPAC_GAL: Schema = hpac_schema!(satellites: Sf093);
pub(crate) static HPAC_BDS: Schema = hpac_schema!(satellites: Sf094);
pub(crate) static HPAC_QZS: Schema = hpac_schema!(satellites: Sf095);

/// Geographic area definitions
pub(crate) static GAD: Schema = &[
    f!(Sf005),
    f!(Sf068),
    f!(Sf069),
    f!(Sf030),
    repeat!(plus_one(Sf030) {
        f!(Sf031),
        f!(Sf032),
        f!(Sf033),
        f!(Sf034),
        f!(Sf035),
        f!(Sf036),
        f!(Sf037),
    }),
];

/// Basic precision atmosphere corrections
pub(crate) static BPAC: Schema = &[
    f!(Sf005),
    f!(Sf069),
    f!(Sf070),
    f!(Sf071),
    repeat!(plus_one(Sf071) {
        f!(Sf072),
        f!(Sf073),
        f!(Sf074),
        f!(Sf075),
        f!(Sf076),
        f!(Sf077),
        f!(Sf078),
        f!(Sf080),
        f!(Sf079),
        repeat!(set_bits(Sf079) {
            f!(Sf055),
            f!(Sf081),
            when!(Sf081 == 0 { f!(Sf082) }),
            when!(Sf081 == 1 { f!(Sf083) }),
        }),
    }),
];

/// Dynamic key
pub(crate) static EAS_DYN: Schema = &[
    f!(Sf084),
    f!(Sf085),
    f!(Sf086),
    f!(Sf085a),
    f!(Sf087),
    f!(Sf088),
];

#[cfg(test)]
mod tests {
    use super::*;

    /// Every field named by a count or predicate must appear earlier in the
    /// same scope or an enclosing one
    fn check_references(nodes: &[Node], seen: &mut Vec<FieldId>) {
        let depth = seen.len();
        for node in nodes {
            match node {
                Node::Field(id) => seen.push(*id),
                Node::Group { count, children } => {
                    match count {
                        Count::ValueOf(id) | Count::ValueOfPlusOne(id) | Count::SetBits(id) => {
                            assert!(seen.contains(id), "{id} counted before decode");
                        },
                        Count::Fixed(_) => {},
                    }
                    check_references(children, seen);
                },
                Node::Conditional {
                    predicate,
                    children,
                } => {
                    let id = predicate.field();
                    assert!(seen.contains(&id), "{id} tested before decode");
                    check_references(children, seen);
                },
            }
        }
        // fields of a closed scope are invisible to later siblings
        seen.truncate(depth);
    }

    #[test]
    fn test_schema_references_resolve() {
        for schema in [
            OCB_GPS, OCB_GLO, OCB_GAL, OCB_BDS, OCB_QZS, HPAC_GPS, HPAC_GLO, HPAC_GAL, HPAC_BDS,
            HPAC_QZS, GAD, BPAC, EAS_DYN,
        ] {
            check_references(schema, &mut Vec::new());
        }
    }

    #[test]
    fn test_ocb_satellite_mask() {
        assert_eq!(OCB_GLO[7], Node::Field(FieldId::Sf012));
        match OCB_GLO[8] {
            Node::Group {
                count: Count::SetBits(FieldId::Sf012),
                children,
            } => assert_eq!(children[0], Node::Field(FieldId::Sf013)),
            other => panic!("unexpected {other:?}"),
        }
    }
}
