use scraping_client::charset::{charset_from_content_type, decode_text, encoding_for_charset};
use scraping_client::{read_records, ClientConfig, CsvOptions, ScrapeError};
use serde::Deserialize;

// ============================================================================
// Charset
// ============================================================================

#[test]
fn charset_parameter_is_extracted() {
    assert_eq!(
        charset_from_content_type("text/html; charset=UTF-8").as_deref(),
        Some("utf-8")
    );
    assert_eq!(
        charset_from_content_type(r#"text/html;Charset="Shift_JIS""#).as_deref(),
        Some("shift_jis")
    );
    assert_eq!(
        charset_from_content_type("text/csv; header=present; charset=euc-jp").as_deref(),
        Some("euc-jp")
    );
    assert_eq!(charset_from_content_type("text/html"), None);
    assert_eq!(charset_from_content_type("text/html; charset="), None);
}

#[test]
fn charset_labels_resolve() {
    assert_eq!(encoding_for_charset(None).unwrap(), encoding_rs::UTF_8);
    assert_eq!(encoding_for_charset(Some("utf8")).unwrap(), encoding_rs::UTF_8);
    assert_eq!(
        encoding_for_charset(Some("windows-31j")).unwrap(),
        encoding_rs::SHIFT_JIS
    );
    assert_eq!(encoding_for_charset(Some("EUC-JP")).unwrap(), encoding_rs::EUC_JP);
    assert!(matches!(
        encoding_for_charset(Some("klingon")),
        Err(ScrapeError::Charset(_))
    ));
}

#[test]
fn decode_replaces_malformed_bytes() {
    let text = decode_text(&[b'a', 0xff, b'b'], None).unwrap();
    assert_eq!(text, "a\u{fffd}b");
}

#[test]
fn decode_honours_bom_over_header() {
    let mut bytes = vec![0xef, 0xbb, 0xbf];
    bytes.extend_from_slice("ok".as_bytes());
    assert_eq!(decode_text(&bytes, Some("shift_jis")).unwrap(), "ok");
}

#[test]
fn decode_euc_jp() {
    let (bytes, _, _) = encoding_rs::EUC_JP.encode("日本");
    assert_eq!(decode_text(&bytes, Some("euc-jp")).unwrap(), "日本");
}

// ============================================================================
// CSV
// ============================================================================

#[derive(Debug, Deserialize, PartialEq)]
struct Price {
    sku: String,
    amount: Option<f64>,
}

#[test]
fn csv_rows_map_by_header_name() {
    let rows: Vec<Price> =
        read_records("amount,sku\n1.5,A\n2,B\n", &CsvOptions::default()).unwrap();
    assert_eq!(
        rows,
        vec![
            Price { sku: "A".into(), amount: Some(1.5) },
            Price { sku: "B".into(), amount: Some(2.0) },
        ]
    );
}

#[test]
fn csv_null_literals_become_empty() {
    let rows: Vec<Price> =
        read_records("sku,amount\nnull,null\nX,\n", &CsvOptions::default()).unwrap();
    assert_eq!(
        rows,
        vec![
            Price { sku: String::new(), amount: None },
            Price { sku: "X".into(), amount: None },
        ]
    );
}

#[test]
fn csv_quoted_null_is_blanked_too() {
    let rows: Vec<Price> =
        read_records("sku,amount\n\"null\",4\n", &CsvOptions::default()).unwrap();
    assert_eq!(rows, vec![Price { sku: String::new(), amount: Some(4.0) }]);
}

#[test]
fn csv_only_whole_null_fields_are_blanked() {
    let rows: Vec<Price> =
        read_records("sku,amount\nnullable,3\n", &CsvOptions::default()).unwrap();
    assert_eq!(rows[0].sku, "nullable");
}

#[test]
fn csv_without_headers_maps_by_position() {
    let options = CsvOptions {
        has_headers: false,
        delimiter: b'\t',
        ..CsvOptions::default()
    };
    let rows: Vec<(String, u32)> = read_records("a\t1\nb\t2\n", &options).unwrap();
    assert_eq!(rows, vec![("a".to_string(), 1), ("b".to_string(), 2)]);
}

#[test]
fn csv_trim_option() {
    let options = CsvOptions {
        trim: true,
        ..CsvOptions::default()
    };
    let rows: Vec<Price> = read_records("sku , amount\n  Z ,  null \n", &options).unwrap();
    assert_eq!(rows, vec![Price { sku: "Z".into(), amount: None }]);
}

#[test]
fn csv_type_errors_are_reported() {
    let result: scraping_client::Result<Vec<Price>> =
        read_records("sku,amount\nA,lots\n", &CsvOptions::default());
    assert!(matches!(result, Err(ScrapeError::Csv(_))));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn default_config_matches_browser_profile() {
    let config = ClientConfig::default();
    let headers = config.default_headers();
    let names: Vec<&str> = headers.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["User-Agent", "Accept-Language", "Connection", "Accept"]);
    assert_eq!(headers[1].1, "ja");
    assert_eq!(headers[2].1, "Keep-Alive");
    assert_eq!(config.timeout(), None);
    assert_eq!(config.max_redirects, 10);
}

#[test]
fn json_config_overrides_only_given_fields() {
    let config = ClientConfig::from_json(
        r#"{"accept_language":"en-US","max_redirects":"3","extra_headers":[["X-A","1"]],"unused":true}"#,
    )
    .unwrap();
    assert_eq!(config.accept_language, "en-US");
    assert_eq!(config.max_redirects, 3);
    assert_eq!(config.accept, ClientConfig::default().accept);
    assert_eq!(
        config.default_headers().last(),
        Some(&("X-A".to_string(), "1".to_string()))
    );
}

#[test]
fn json_config_with_bad_shape_fails() {
    let result = ClientConfig::from_json(r#"{"extra_headers":{"X-A":"1"}}"#);
    assert!(matches!(
        result,
        Err(ScrapeError::Json(dynamic_json::JsonError::UnsupportedShape(_)))
    ));
    let result = ClientConfig::from_json(r#"{"timeout_secs":"soon"}"#);
    assert!(matches!(
        result,
        Err(ScrapeError::Json(dynamic_json::JsonError::SchemaMismatch(_)))
    ));
}
