#![cfg(feature = "crypto")]

mod common;

use chrono::{TimeZone, Utc};
use common::{bytes, gad_basedate, GAD_FRAME, KEY};
use spartn::{
    Basedate, DecodeError, DecodeOptions, Error, FieldId, FieldValue, Identity, SpartnMessage,
    Timetags,
};

const GAD_DISPLAY: &str = "<SPARTN(SPARTN-1X-GAD, msgType=2, nData=50, eaf=1, crcType=2, frameCrc=2, msgSubtype=0, timeTagtype=0, gnssTimeTag=32580, solutionId=5, solutionProcId=11, encryptionId=1, encryptionSeq=63, authInd=1, embAuthLen=0, crc=7925223, SF005=37, SF068=1, SF069=0, SF030=7, SF031_01=32, SF032_01=1332, SF033_01=1987, SF034_01=6, SF035_01=2, SF036_01=5, SF037_01=22, SF031_02=33, SF032_02=1332, SF033_02=2033, SF034_02=6, SF035_02=3, SF036_02=5, SF037_02=16, SF031_03=34, SF032_03=1301, SF033_03=1921, SF034_03=2, SF035_03=6, SF036_03=18, SF037_03=10, SF031_04=35, SF032_04=1297, SF033_04=1987, SF034_04=3, SF035_04=3, SF036_04=12, SF037_04=22, SF031_05=36, SF032_05=1448, SF033_05=1768, SF034_05=6, SF035_05=2, SF036_05=5, SF037_05=30, SF031_06=37, SF032_06=1391, SF033_06=1745, SF034_06=4, SF035_06=7, SF036_06=7, SF037_06=10, SF031_07=38, SF032_07=1360, SF033_07=1906, SF034_07=3, SF035_07=2, SF036_07=8, SF037_07=22, SF031_08=39, SF032_08=1400, SF033_08=1800, SF034_08=5, SF035_08=5, SF036_08=10, SF037_08=10)>";

fn options(key: &str, basedate: Basedate) -> DecodeOptions {
    DecodeOptions {
        decode: true,
        key: Some(key.parse().unwrap()),
        basedate,
        ..DecodeOptions::default()
    }
}

fn decode(options: &DecodeOptions) -> Result<SpartnMessage, Error> {
    SpartnMessage::parse(&bytes(GAD_FRAME), options, &Timetags::new())
}

#[test]
fn test_gad_decode() {
    let msg = decode(&options(KEY, gad_basedate().into())).unwrap();

    assert_eq!(msg.identity(), Identity::Gad);
    assert_eq!(msg.identity().as_str(), "SPARTN-1X-GAD");
    assert!(msg.is_decoded());
    assert_eq!(msg.resolved_timetag(), Some(425595780));
    assert_eq!(msg.padding(), Some(5));
    assert_eq!(msg.payload().len(), 50);

    assert_eq!(msg.get(FieldId::Sf005, &[]), Some(&FieldValue::Int(37)));
    assert_eq!(msg.get(FieldId::Sf030, &[]).and_then(FieldValue::as_u64), Some(7));
    assert_eq!(msg.attributes().group_count(FieldId::Sf031, &[]), 8);

    assert_eq!(msg.get(FieldId::Sf031, &[1]), Some(&FieldValue::Int(32)));
    let lat = msg.get(FieldId::Sf032, &[1]).unwrap();
    assert_eq!(lat.as_u64(), Some(1332));
    assert!((lat.as_f64().unwrap() - 43.2).abs() < 1e-9);
    let lon = msg.get(FieldId::Sf033, &[1]).and_then(FieldValue::as_f64).unwrap();
    assert!((lon - 18.7).abs() < 1e-9);
    let spacing = msg.get(FieldId::Sf036, &[1]).and_then(FieldValue::as_f64).unwrap();
    assert!((spacing - 0.6).abs() < 1e-9);

    assert_eq!(msg.get(FieldId::Sf031, &[8]), Some(&FieldValue::Int(39)));
    assert_eq!(msg.get(FieldId::Sf031, &[9]), None);
    assert_eq!(msg.get(FieldId::Sf032, &[]), None);
}

#[test]
fn test_gad_display() {
    let msg = decode(&options(KEY, gad_basedate().into())).unwrap();
    assert_eq!(msg.to_string(), GAD_DISPLAY);
}

#[test]
fn test_gad_decode_is_deterministic() {
    let first = decode(&options(KEY, gad_basedate().into())).unwrap();
    let second = decode(&options(KEY, Basedate::Timetag(425595780))).unwrap();
    assert_eq!(first.attributes(), second.attributes());
    assert_eq!(first.payload(), second.payload());
}

#[test]
fn test_gad_basedate_within_half_day() {
    // an hour earlier still resolves to the same full time tag
    let basedate = Utc.with_ymd_and_hms(2023, 6, 27, 20, 50, 0).unwrap();
    let msg = decode(&options(KEY, basedate.into())).unwrap();
    assert_eq!(msg.resolved_timetag(), Some(425595780));
}

#[test]
fn test_gad_undecoded() {
    let raw = bytes(GAD_FRAME);
    let msg = SpartnMessage::parse(&raw, &DecodeOptions::default(), &Timetags::new()).unwrap();
    assert!(!msg.is_decoded());
    assert!(msg.attributes().is_empty());
    assert_eq!(msg.padding(), None);
    assert_eq!(msg.payload(), &raw[10..60]);
    assert_eq!(msg.serialize(), &raw[..]);
    assert!(msg.to_string().ends_with("embAuthLen=0, crc=7925223)>"));
}

#[test]
fn test_gad_wrong_key() {
    match decode(&options("00000000000000000000000000000000", gad_basedate().into())) {
        Err(Error::PayloadDecode { identity, source }) => {
            assert_eq!(identity, "SPARTN-1X-GAD");
            assert_eq!(source, DecodeError::InvalidPadding { padding: 193 });
        },
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_gad_wrong_basedate() {
    let basedate = Utc.with_ymd_and_hms(2023, 6, 26, 22, 3, 0).unwrap();
    let err = decode(&options(KEY, basedate.into())).unwrap_err();
    assert!(matches!(err, Error::PayloadDecode { .. }), "{err}");
    assert!(!err.is_transport());
}

#[test]
fn test_gad_missing_key() {
    let options = DecodeOptions {
        decode: true,
        ..DecodeOptions::default()
    };
    assert!(matches!(decode(&options), Err(Error::MissingKey)));
}

#[test]
fn test_gad_stream_basedate_unresolved() {
    let err = decode(&options(KEY, Basedate::Stream)).unwrap_err();
    assert!(matches!(
        err,
        Error::AmbiguousTimetagUnresolved {
            msg_subtype: 0,
            timetag: 32580,
        }
    ));
}
