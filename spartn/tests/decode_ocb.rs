mod common;

use common::{bytes, OCB_FRAME};
use spartn::{
    CrcType, DecodeOptions, FieldId, FieldValue, Identity, SpartnMessage, TimeTagType, Timetags,
};

fn decoded() -> SpartnMessage {
    let options = DecodeOptions {
        decode: true,
        ..DecodeOptions::default()
    };
    SpartnMessage::parse(&bytes(OCB_FRAME), &options, &Timetags::new()).unwrap()
}

fn scaled(msg: &SpartnMessage, field: FieldId, ordinals: &[u16]) -> f64 {
    msg.get(field, ordinals)
        .and_then(FieldValue::as_f64)
        .unwrap_or_else(|| panic!("{field} at {ordinals:?} missing"))
}

#[test]
fn test_ocb_header() {
    let msg = decoded();
    let header = msg.header();
    assert_eq!(msg.identity(), Identity::OcbGps);
    assert_eq!(header.crc_type, CrcType::Crc16);
    assert_eq!(header.frame_crc, 3);
    assert_eq!(header.time_tag_type, TimeTagType::Full);
    assert_eq!(header.gnss_time_tag, 425595000);
    assert!(!header.eaf());
    assert_eq!(msg.resolved_timetag(), Some(425595000));
    assert_eq!(msg.crc(), 47780);
    assert_eq!(msg.padding(), Some(1));
}

#[test]
fn test_ocb_satellites() {
    let msg = decoded();
    assert_eq!(msg.get(FieldId::Sf005, &[]), Some(&FieldValue::Int(100)));
    assert_eq!(msg.get(FieldId::Sf010, &[]), Some(&FieldValue::Int(1)));
    assert_eq!(
        msg.get(FieldId::Sf011, &[]),
        Some(&FieldValue::Int((1 << 30) | (1 << 27) | (1 << 25)))
    );
    assert_eq!(msg.attributes().group_count(FieldId::Sf013, &[]), 3);

    assert_eq!(msg.get(FieldId::Prn, &[1]), Some(&FieldValue::Prn(2)));
    // do-not-use satellite carries nothing past its flag
    assert_eq!(msg.get(FieldId::Sf013, &[2]), Some(&FieldValue::Int(1)));
    assert_eq!(msg.get(FieldId::Prn, &[2]), None);
    assert_eq!(msg.get(FieldId::Sf014O, &[2]), None);
    assert_eq!(msg.get(FieldId::Prn, &[3]), Some(&FieldValue::Prn(7)));
}

#[test]
fn test_ocb_orbit_and_clock() {
    let msg = decoded();
    assert_eq!(msg.get(FieldId::Sf018, &[1]), Some(&FieldValue::Int(45)));
    assert!(scaled(&msg, FieldId::Sf020R, &[1]).abs() < 1e-9);
    assert!((scaled(&msg, FieldId::Sf020A, &[1]) - 0.018).abs() < 1e-9);
    assert!((scaled(&msg, FieldId::Sf020C, &[1]) + 0.022).abs() < 1e-9);
    assert!((scaled(&msg, FieldId::Sf021, &[1]) - 60.0).abs() < 1e-9);
    assert!((scaled(&msg, FieldId::Sf020Ck, &[1]) - 1.618).abs() < 1e-9);

    let ure = msg.get(FieldId::Sf024, &[1]).and_then(FieldValue::as_u64).unwrap();
    assert_eq!(FieldId::Sf024.enum_label(ure), Some("0.05 m"));
    assert_eq!(msg.get(FieldId::Sf015, &[1]), Some(&FieldValue::Int(2)));

    // clock only
    assert_eq!(msg.get(FieldId::Sf014O, &[3]), Some(&FieldValue::Int(0)));
    assert_eq!(msg.get(FieldId::Sf018, &[3]), None);
    assert_eq!(
        msg.get(FieldId::Sf020Ck, &[3]).and_then(FieldValue::as_u64),
        Some(8191)
    );
    assert_eq!(msg.get(FieldId::Sf024, &[3]), Some(&FieldValue::Int(7)));
    assert_eq!(msg.get(FieldId::Sf025, &[3]), None);
}

#[test]
fn test_ocb_biases() {
    let msg = decoded();
    let attrs = msg.attributes();
    assert_eq!(attrs.group_count(FieldId::PhaseBias, &[1]), 3);
    let signals: Vec<_> = (1..=3)
        .map(|i| msg.get(FieldId::PhaseBias, &[1, i]).and_then(FieldValue::as_signal))
        .collect();
    assert_eq!(signals, [Some("L1C"), Some("L5Q"), Some(spartn::schema::SPARE_SIGNAL)]);

    assert_eq!(msg.get(FieldId::Sf023, &[1, 1]), Some(&FieldValue::Int(1)));
    assert_eq!(msg.get(FieldId::Sf015, &[1, 2]), Some(&FieldValue::Int(1)));
    assert_eq!(
        msg.get(FieldId::Sf020Pb, &[1, 3]).and_then(FieldValue::as_u64),
        Some(8192)
    );

    assert_eq!(attrs.group_count(FieldId::CodeBias, &[1]), 1);
    assert_eq!(
        msg.get(FieldId::CodeBias, &[1, 1]),
        Some(&FieldValue::Signal("C2W"))
    );
    assert!(scaled(&msg, FieldId::Sf029, &[1, 1]).abs() < 1e-9);
}

#[test]
fn test_ocb_display() {
    let text = decoded().to_string();
    assert!(text.starts_with(
        "<SPARTN(SPARTN-1X-OCB-GPS, msgType=0, nData=30, eaf=0, crcType=1, frameCrc=3, msgSubtype=0, timeTagtype=1, gnssTimeTag=425595000, solutionId=5, solutionProcId=11, crc=47780, SF005=100, SF010=1,"
    ));
    assert!(text.contains(", SF013_01=0, PRN_01=2, SF014O_01=1,"));
    assert!(text.contains(", PhaseBias_01_03=spare, SF023_01_03=1, SF015_01_03=2, SF020PB_01_03=8192,"));
    assert!(text.contains(", SF013_02=1, SF013_03=0, PRN_03=7,"));
    assert!(text.ends_with(", SF024_03=7)>"));
}
