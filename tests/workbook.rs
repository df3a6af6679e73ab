use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use xml2xlsx::conversion::{convert_str, Conversion, ConversionOptions};
use xml2xlsx::workbook::{workbook_to_bytes, DATA_SHEET, METADATA_SHEET, ORIGINAL_DATA_SHEET};

const PANEL_XML: &str = r#"<Root><DataList>
    <TN_DT><CODE>10</CODE><SCR_ENG>Alpha</SCR_ENG><Period>2020</Period><DTVAL_CO>5</DTVAL_CO></TN_DT>
    <TN_DT><CODE>10</CODE><SCR_ENG>Alpha</SCR_ENG><Period>2021</Period><DTVAL_CO>7</DTVAL_CO></TN_DT>
    <TN_DT><CODE>10</CODE><SCR_ENG>Alpha</SCR_ENG><Period>2022</Period><DTVAL_CO>9</DTVAL_CO></TN_DT>
    <TN_DT><CODE>20</CODE><SCR_ENG>Beta</SCR_ENG><Period>2020</Period><DTVAL_CO>3</DTVAL_CO></TN_DT>
</DataList></Root>"#;

const SINGLE_PERIOD_XML: &str = r#"<Root><DataList>
    <TN_DT><CODE>10</CODE><Period>2020</Period><DTVAL_CO>5</DTVAL_CO></TN_DT>
    <TN_DT><CODE>20</CODE><Period>2020</Period><DTVAL_CO>3</DTVAL_CO></TN_DT>
</DataList></Root>"#;

fn convert(xml: &str) -> Conversion {
    convert_str(xml, &ConversionOptions::default()).unwrap()
}

fn open_workbook(bytes: Vec<u8>) -> Xlsx<Cursor<Vec<u8>>> {
    Xlsx::new(Cursor::new(bytes)).unwrap()
}

#[test]
fn pivoted_workbook_has_three_sheets() {
    let conversion = convert(PANEL_XML);
    assert!(conversion.was_pivoted());

    let mut workbook = open_workbook(workbook_to_bytes(&conversion, None).unwrap());
    assert_eq!(
        workbook.sheet_names().to_vec(),
        vec![DATA_SHEET, METADATA_SHEET, ORIGINAL_DATA_SHEET]
    );

    // Original_Data carries the long table untouched.
    let original = workbook.worksheet_range(ORIGINAL_DATA_SHEET).unwrap();
    let header: Vec<String> = original.rows().next().unwrap().iter().map(|c| c.to_string()).collect();
    assert_eq!(header, vec!["CODE", "SCR_ENG", "Period", "DTVAL_CO"]);
    assert_eq!(original.rows().count(), 5);
}

#[test]
fn data_sheet_contains_wide_table_with_blank_missing_cells() {
    let conversion = convert(PANEL_XML);
    let mut workbook = open_workbook(workbook_to_bytes(&conversion, None).unwrap());

    let data = workbook.worksheet_range(DATA_SHEET).unwrap();
    let rows: Vec<&[Data]> = data.rows().collect();

    let header: Vec<String> = rows[0].iter().map(|c| c.to_string()).collect();
    assert_eq!(header, vec!["CODE", "SCR_ENG", "2020", "2021", "2022"]);

    assert_eq!(rows[1][0], Data::Float(10.0));
    assert_eq!(rows[1][1], Data::String("Alpha".to_string()));
    assert_eq!(rows[1][2], Data::Float(5.0));
    assert_eq!(rows[1][4], Data::Float(9.0));

    // Beta has no 2021/2022 values; those cells stay blank.
    assert_eq!(rows[2][0], Data::Float(20.0));
    assert_eq!(rows[2][3], Data::Empty);
    assert_eq!(rows[2][4], Data::Empty);
}

#[test]
fn passthrough_workbook_omits_original_data_sheet() {
    let conversion = convert(SINGLE_PERIOD_XML);
    assert!(!conversion.was_pivoted());
    assert_eq!(conversion.reshape_message, "No pivot - only one period found");

    let mut workbook = open_workbook(workbook_to_bytes(&conversion, None).unwrap());
    assert_eq!(
        workbook.sheet_names().to_vec(),
        vec![DATA_SHEET, METADATA_SHEET]
    );
}

#[test]
fn pivot_with_unchanged_column_count_omits_original_data_sheet() {
    // Two identifier columns + two periods reshape into exactly four columns again, so
    // the inclusion rule (column counts differ) leaves Original_Data out.
    let xml = r#"<Root><DataList>
        <TN_DT><CODE>10</CODE><SCR_ENG>Alpha</SCR_ENG><Period>2020</Period><DTVAL_CO>5</DTVAL_CO></TN_DT>
        <TN_DT><CODE>10</CODE><SCR_ENG>Alpha</SCR_ENG><Period>2021</Period><DTVAL_CO>7</DTVAL_CO></TN_DT>
    </DataList></Root>"#;

    let conversion = convert(xml);
    assert_eq!(
        conversion.reshape_message,
        "Pivoted data: 1 categories across 2 periods"
    );
    assert!(!conversion.was_pivoted());

    let mut workbook = open_workbook(workbook_to_bytes(&conversion, None).unwrap());
    assert_eq!(
        workbook.sheet_names().to_vec(),
        vec![DATA_SHEET, METADATA_SHEET]
    );
}

#[test]
fn metadata_sheet_records_conversion_properties() {
    let conversion = convert(PANEL_XML);
    let mut workbook =
        open_workbook(workbook_to_bytes(&conversion, Some("population.xml")).unwrap());

    let metadata = workbook.worksheet_range(METADATA_SHEET).unwrap();
    let rows: Vec<Vec<String>> = metadata
        .rows()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect();

    assert_eq!(rows[0], vec!["Property", "Value"]);
    assert_eq!(rows[1], vec!["Source File", "population.xml"]);
    assert_eq!(rows[2][0], "Total Records");
    assert_eq!(rows[3], vec!["Conversion Status", "Success"]);
    assert_eq!(
        rows[4],
        vec![
            "Processing Notes".to_string(),
            "Pivoted data: 2 categories across 3 periods".to_string()
        ]
    );

    let records = metadata.get_value((2, 1)).unwrap();
    assert_eq!(*records, Data::Float(4.0));
}

#[test]
fn metadata_sheet_without_source_file_starts_at_record_count() {
    let conversion = convert(PANEL_XML);
    let mut workbook = open_workbook(workbook_to_bytes(&conversion, None).unwrap());

    let metadata = workbook.worksheet_range(METADATA_SHEET).unwrap();
    let first_property = metadata.get_value((1, 0)).unwrap();
    assert_eq!(*first_property, Data::String("Total Records".to_string()));
}
