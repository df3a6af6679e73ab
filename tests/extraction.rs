use xml2xlsx::conversion::{extract_records, extract_records_bytes};
use xml2xlsx::types::Value;
use xml2xlsx::ExtractError;

const NS: &str = "http://schemas.datacontract.org/2004/07/E1212_ServiceAPI.Models";

fn namespaced_doc() -> String {
    format!(
        r#"<Response xmlns="{NS}" xmlns:i="http://www.w3.org/2001/XMLSchema-instance">
  <DataList>
    <TN_DT>
      <CODE>976</CODE>
      <SCR_ENG>Total population</SCR_ENG>
      <Period>2020</Period>
      <DTVAL_CO>3296.9</DTVAL_CO>
    </TN_DT>
    <TN_DT>
      <CODE>976</CODE>
      <SCR_ENG>Total population</SCR_ENG>
      <Period>2021</Period>
      <DTVAL_CO i:nil="true"/>
    </TN_DT>
  </DataList>
</Response>"#
    )
}

fn plain_doc() -> String {
    namespaced_doc()
        .replace(&format!(r#" xmlns="{NS}""#), "")
}

#[test]
fn extract_happy_path() {
    let extraction = extract_records(&namespaced_doc()).unwrap();

    assert_eq!(extraction.message, "Successfully parsed 2 records");
    assert_eq!(
        extraction.table.columns,
        vec!["CODE", "SCR_ENG", "Period", "DTVAL_CO"]
    );
    assert_eq!(
        extraction.table.rows[0],
        vec![
            Value::Number(976.0),
            Value::Text("Total population".to_string()),
            Value::Number(2020.0),
            Value::Number(3296.9),
        ]
    );
}

#[test]
fn namespaced_and_plain_documents_extract_identically() {
    let with_ns = extract_records(&namespaced_doc()).unwrap();
    let without_ns = extract_records(&plain_doc()).unwrap();
    assert_eq!(with_ns.table, without_ns.table);
}

#[test]
fn empty_self_closing_and_absent_fields_normalize_to_missing() {
    let xml = r#"<Root><DataList>
        <TN_DT><CODE>1</CODE><SCR_ENG></SCR_ENG><NOTE/></TN_DT>
        <TN_DT><CODE>2</CODE></TN_DT>
    </DataList></Root>"#;

    let extraction = extract_records(xml).unwrap();
    assert_eq!(extraction.table.columns, vec!["CODE", "SCR_ENG", "NOTE"]);

    // Present-but-empty and self-closing both normalize to missing, not "".
    assert_eq!(extraction.table.rows[0][1], Value::Missing);
    assert_eq!(extraction.table.rows[0][2], Value::Missing);

    // Absent fields in the second record align as missing.
    assert_eq!(extraction.table.rows[1][1], Value::Missing);
    assert_eq!(extraction.table.rows[1][2], Value::Missing);
}

#[test]
fn columns_union_in_first_seen_order() {
    let xml = r#"<Root><DataList>
        <TN_DT><A>1</A><B>2</B></TN_DT>
        <TN_DT><B>3</B><C>4</C></TN_DT>
    </DataList></Root>"#;

    let extraction = extract_records(xml).unwrap();
    assert_eq!(extraction.table.columns, vec!["A", "B", "C"]);
    assert_eq!(
        extraction.table.rows[1],
        vec![
            Value::Missing,
            Value::Text("3".to_string()),
            Value::Text("4".to_string()),
        ]
    );
}

#[test]
fn numeric_coercion_is_per_cell() {
    let xml = r#"<Root><DataList>
        <TN_DT><CODE>1</CODE><DTVAL_CO>5.5</DTVAL_CO></TN_DT>
        <TN_DT><CODE>2</CODE><DTVAL_CO>not a number</DTVAL_CO></TN_DT>
        <TN_DT><CODE>3</CODE><DTVAL_CO>7</DTVAL_CO></TN_DT>
    </DataList></Root>"#;

    let extraction = extract_records(xml).unwrap();
    assert_eq!(extraction.table.rows[0][1], Value::Number(5.5));
    assert_eq!(extraction.table.rows[1][1], Value::Missing);
    assert_eq!(extraction.table.rows[2][1], Value::Number(7.0));

    // The garbage cell does not disturb its row's other columns.
    assert_eq!(extraction.table.rows[1][0], Value::Number(2.0));
}

#[test]
fn non_numeric_columns_stay_text() {
    let xml = r#"<Root><DataList>
        <TN_DT><SCR_MN>Хүн ам</SCR_MN><CODE>10</CODE></TN_DT>
    </DataList></Root>"#;

    let extraction = extract_records(xml).unwrap();
    assert_eq!(
        extraction.table.rows[0][0],
        Value::Text("Хүн ам".to_string())
    );
    assert_eq!(extraction.table.rows[0][1], Value::Number(10.0));
}

#[test]
fn malformed_xml_is_rejected_with_parser_detail() {
    let err = extract_records("<Root><DataList>").unwrap_err();
    assert!(matches!(err, ExtractError::Malformed(_)));
    assert!(err.to_string().starts_with("malformed XML:"));
}

#[test]
fn missing_container_is_rejected() {
    let err = extract_records("<Root><Other/></Root>").unwrap_err();
    assert!(matches!(err, ExtractError::MissingContainer));
    assert_eq!(err.to_string(), "No DataList found in XML");
}

#[test]
fn empty_container_is_rejected() {
    let err = extract_records("<Root><DataList></DataList></Root>").unwrap_err();
    assert!(matches!(err, ExtractError::NoRecords));
    assert_eq!(err.to_string(), "No data records found");
}

#[test]
fn invalid_utf8_bytes_are_rejected_as_other() {
    let err = extract_records_bytes(&[0x3c, 0xff, 0xfe, 0x3e]).unwrap_err();
    assert!(matches!(err, ExtractError::Other(_)));
    assert!(err.to_string().contains("not valid UTF-8"));
}

#[test]
fn duplicate_field_in_one_record_keeps_last_occurrence() {
    let xml = r#"<Root><DataList>
        <TN_DT><SCR_ENG>first</SCR_ENG><SCR_ENG>second</SCR_ENG></TN_DT>
    </DataList></Root>"#;

    let extraction = extract_records(xml).unwrap();
    assert_eq!(extraction.table.columns, vec!["SCR_ENG"]);
    assert_eq!(
        extraction.table.rows[0][0],
        Value::Text("second".to_string())
    );
}
