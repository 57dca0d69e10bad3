use std::fs;
use std::path::PathBuf;

use super::pipeline::Cleaner;
use super::text::{is_accession_number, MAX_TOKEN_LEN};
use super::types::{Format, Warning};
use super::xbrl::parse_xbrl;

pub fn get_test_file_path(filename: &str) -> PathBuf {
    PathBuf::from("src/edgar/parsing/tests/data").join(filename)
}

pub fn read_test_file(filename: &str) -> String {
    fs::read_to_string(get_test_file_path(filename))
        .unwrap_or_else(|e| panic!("Failed to read test file {}: {}", filename, e))
}

#[test]
fn test_legacy_submission() {
    let content = read_test_file("aapl-10k-2020.txt");
    let result = Cleaner::default().clean_str(&content).unwrap();

    assert_eq!(result.format, Format::Html);
    assert!(result
        .cleaned_text
        .contains("Item 1. Business The Company designs, manufactures and markets smartphones"));
    assert!(result.cleaned_text.contains("0000320193-20-000096.txt"));
    assert!(result.cleaned_text.contains("0000320193-20-000096.hdr.sgml"));

    for removed in ["begin 644", "trackingId", "Helvetica", "aapl-20200926", "====="] {
        assert!(!result.cleaned_text.contains(removed), "{} survived", removed);
    }

    assert_eq!(
        result.tables_text(),
        "Segment\t2020\nAmericas\t124,556\nEurope\t68,640"
    );
    assert!(matches!(
        &result.warnings[..],
        [Warning::ParserFallback { backend, .. }] if backend == "xhtml"
    ));
}

#[test]
fn test_legacy_submission_tokens() {
    let content = read_test_file("aapl-10k-2020.txt");
    let result = Cleaner::default().clean_str(&content).unwrap();

    assert!(!result.cleaned_text.contains('\n'));
    for token in result.cleaned_text.split(' ') {
        assert!(
            token.chars().count() <= MAX_TOKEN_LEN
                || is_accession_number(token)
                || token.chars().all(|c| c.is_ascii_alphanumeric()),
            "noisy token kept: {}",
            token
        );
    }
}

#[test]
fn test_inline_xbrl_as_html() {
    let content = read_test_file("tsla-10q-2023.htm");
    let result = Cleaner::default().clean_str(&content).unwrap();

    assert_eq!(result.format, Format::Html);
    assert!(result.warnings.is_empty());
    assert!(result.cleaned_text.contains("Commission File Number: 001-34756"));
    assert!(result.cleaned_text.contains("Tesla, Inc. designs"));
    assert!(!result.cleaned_text.contains("tsla-20230930"));

    let tables: Vec<String> = result.tables.iter().map(|t| t.to_text()).collect();
    assert_eq!(
        tables,
        vec![
            "false".to_string(),
            "001-34756".to_string(),
            "Total revenues\t$\t71,606\nNet income\t$\t7,069".to_string(),
        ]
    );
}

#[test]
fn test_inline_xbrl_facts() {
    let content = read_test_file("tsla-10q-2023.htm");
    let result = parse_xbrl(&content).unwrap();

    assert_eq!(
        result.text,
        "AmendmentFlag: false EntityFileNumber: 001-34756 Revenues: 71,606 NetIncomeLoss: 7,069"
    );
    let revenues = &result.facts[2];
    assert_eq!(revenues.prefix.as_deref(), Some("us-gaap"));
    assert_eq!(revenues.unit.as_deref(), Some("iso4217:USD"));
    assert_eq!(revenues.context.end_date.as_deref(), Some("2023-09-30"));
    assert!(result.warnings.is_empty());
}

#[test]
fn test_xbrl_instance() {
    let content = read_test_file("msft-20230630.xml");
    let result = parse_xbrl(&content).unwrap();

    let tags: Vec<&str> = result.facts.iter().map(|f| f.tag.as_str()).collect();
    assert_eq!(
        tags,
        vec![
            "DocumentType",
            "EntityRegistrantName",
            "Revenues",
            "Revenues",
            "EarningsPerShareDiluted",
            "Assets",
            "CommonStockSharesOutstanding",
        ]
    );
    assert!(result.text.starts_with("DocumentType: 10-K EntityRegistrantName: MICROSOFT CORPORATION"));

    let eps = &result.facts[4];
    assert_eq!(eps.unit.as_deref(), Some("iso4217:USD/xbrli:shares"));
    assert_eq!(eps.decimals.as_deref(), Some("2"));

    let cloud = &result.facts[3];
    assert_eq!(cloud.context.dimensions[0].member, "msft:IntelligentCloudMember");

    let assets = &result.facts[5];
    assert_eq!(assets.context.instant.as_deref(), Some("2023-06-30"));
    assert_eq!(assets.context.start_date, None);

    assert_eq!(result.facts[6].unit, None);
    assert_eq!(
        result.warnings,
        vec![
            Warning::UnresolvedContext {
                tag: "Liabilities".to_string(),
                context_ref: "FY2022_End".to_string(),
            },
            Warning::UnresolvedUnit {
                tag: "CommonStockSharesOutstanding".to_string(),
                unit_ref: "shares".to_string(),
            },
        ]
    );
}

#[test]
fn test_xbrl_instance_through_cleaner() {
    let content = read_test_file("msft-20230630.xml");
    let result = Cleaner::default().clean_str(&content).unwrap();

    assert_eq!(result.format, Format::Xbrl);
    assert_eq!(result.tables.len(), 1);
    assert_eq!(result.tables[0].rows.len(), 7);
    assert_eq!(
        result.tables[0].rows[5],
        vec!["Assets", "411976000000", "2023-06-30", "", "iso4217:USD"]
    );
}
