//! End-to-end envelope decoding tests.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use claim_ingest::{IngestError, decode_envelope, list_items};
use claim_model::{GroupType, XmlValue};

fn encode(text: &str) -> String {
    STANDARD.encode(text)
}

fn subfile(tag: &str, payload: &str) -> String {
    format!("<FILEHOSO><LOAIHOSO>{tag}</LOAIHOSO><NOIDUNGFILE>{payload}</NOIDUNGFILE></FILEHOSO>")
}

fn envelope(claims: &[String]) -> String {
    let body: String = claims
        .iter()
        .map(|files| format!("<HOSO>{files}</HOSO>"))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <GIAMDINHHS><THONGTINHOSO><NGAYLAP>20230105</NGAYLAP>\
         <DANHSACHHOSO>{body}</DANHSACHHOSO></THONGTINHOSO></GIAMDINHHS>"
    )
}

fn summary_payload(key: &str) -> String {
    encode(&format!(
        "<TONG_HOP><MA_LK>{key}</MA_LK><NGAY_VAO>202301020800</NGAY_VAO></TONG_HOP>"
    ))
}

fn services_payload(rows: &[&str]) -> String {
    let rows: String = rows
        .iter()
        .map(|code| format!("<CHI_TIET_DVKT><MA_DICH_VU>{code}</MA_DICH_VU></CHI_TIET_DVKT>"))
        .collect();
    encode(&format!(
        "<CHITIEU_CHITIET_DVKT_VTYT><DSACH_CHI_TIET_DVKT>{rows}</DSACH_CHI_TIET_DVKT></CHITIEU_CHITIET_DVKT_VTYT>"
    ))
}

#[test]
fn decodes_claims_groups_and_summary() {
    let text = envelope(&[
        format!(
            "{}{}",
            subfile("XML1", &summary_payload("LK01")),
            subfile("XML3", &services_payload(&["A", "B", "C"]))
        ),
        subfile("XML1", &summary_payload("LK02")),
    ]);

    let records = decode_envelope(&text).expect("decode envelope");
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.id, "LK01");
    assert_eq!(first.groups.len(), 2);
    assert_eq!(first.groups[0].group_type, GroupType::Xml1);
    assert_eq!(first.summary_field("NGAY_VAO"), Some("202301020800"));
    assert!(first.validation_results.is_empty());
    assert!(first.source_file.is_none());

    let services = first.group(&GroupType::Xml3).expect("XML3 group");
    assert_eq!(list_items(services).len(), 3);

    assert_eq!(records[1].id, "LK02");
    assert_eq!(records[1].groups.len(), 1);
}

#[test]
fn missing_claim_list_is_structural() {
    let text = "<GIAMDINHHS><THONGTINHOSO><DANHSACHHOSO/></THONGTINHOSO></GIAMDINHHS>";
    let err = decode_envelope(text).unwrap_err();
    assert!(matches!(err, IngestError::Structural { .. }));
    assert!(err.is_structural());

    let err = decode_envelope("<OTHER><HOSO/></OTHER>").unwrap_err();
    assert!(matches!(err, IngestError::Structural { .. }));
}

#[test]
fn malformed_outer_xml_fails_the_envelope() {
    let err = decode_envelope("<GIAMDINHHS><THONGTINHOSO>").unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn undecodable_payloads_are_kept_raw() {
    let not_xml = encode("plain text, not markup");
    let text = envelope(&[format!(
        "{}{}{}{}",
        subfile("XML1", &summary_payload("LK09")),
        subfile("XML2", &not_xml),
        subfile("XML4", "%%not-base64%%"),
        subfile("XML3", &services_payload(&["A"]))
    )]);

    let records = decode_envelope(&text).expect("decode envelope");
    let record = &records[0];
    assert_eq!(record.groups.len(), 4);
    assert_eq!(record.groups[1].data, XmlValue::Text(not_xml));
    assert_eq!(record.groups[2].data, XmlValue::text("%%not-base64%%"));
    assert!(list_items(&record.groups[1]).is_empty());
    assert_eq!(list_items(&record.groups[3]).len(), 1);
    assert_eq!(record.id, "LK09");
}

#[test]
fn inline_payload_is_used_as_is() {
    let inline = "<FILEHOSO><LOAIHOSO>XML1</LOAIHOSO>\
                  <NOIDUNGFILE><TONG_HOP><MA_LK>INLINE</MA_LK></TONG_HOP></NOIDUNGFILE></FILEHOSO>";
    let records = decode_envelope(&envelope(&[inline.to_string()])).expect("decode envelope");
    assert_eq!(records[0].id, "INLINE");
}

#[test]
fn missing_claim_key_gets_generated_id() {
    let payload = encode("<TONG_HOP><HO_TEN>X</HO_TEN></TONG_HOP>");
    let text = envelope(&[
        subfile("XML1", &payload),
        subfile("XML1", &payload),
    ]);
    let records = decode_envelope(&text).expect("decode envelope");
    assert!(!records[0].id.is_empty());
    assert_ne!(records[0].id, records[1].id);
    assert!(records[0].summary.is_some());
}

#[test]
fn claim_without_summary_has_no_summary() {
    let text = envelope(&[subfile("XML3", &services_payload(&["A"]))]);
    let records = decode_envelope(&text).expect("decode envelope");
    assert!(records[0].summary.is_none());
    assert!(!records[0].id.is_empty());
}

#[test]
fn duplicate_subfiles_are_retained_in_order() {
    let text = envelope(&[format!(
        "{}{}{}",
        subfile("XML3", &services_payload(&["A"])),
        subfile("xml3", &services_payload(&["B", "C"])),
        subfile("XML99", &encode("<X/>"))
    )]);
    let records = decode_envelope(&text).expect("decode envelope");
    let groups = &records[0].groups;
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[1].group_type, GroupType::Xml3);
    assert_eq!(groups[2].group_type, GroupType::Other("XML99".to_string()));
    assert_eq!(list_items(records[0].group(&GroupType::Xml3).unwrap()).len(), 1);
}

#[test]
fn claim_without_subfiles_has_no_groups() {
    let text = envelope(&["<GHI_CHU>empty</GHI_CHU>".to_string()]);
    let records = decode_envelope(&text).expect("decode envelope");
    assert_eq!(records.len(), 1);
    assert!(records[0].groups.is_empty());
}
