use kanpo_downloader_core::config::RepoLocation;
use kanpo_downloader_core::contract::{NodeKind, TreeListing, TreeNode};
use kanpo_downloader_core::listing::{
    bucket_by_month, filter_pdf, group, month_of, normalize, parse, DocumentType, FileName,
    ParsedFile,
};
use kanpo_downloader_core::navigation::{available_years, month_availability};

fn blob(path: &str, size: u64) -> TreeNode {
    TreeNode {
        path: path.to_string(),
        kind: NodeKind::Blob,
        size: Some(size),
        url: Some(format!("https://api.github.com/blobs/{path}")),
    }
}

fn dir(path: &str) -> TreeNode {
    TreeNode {
        path: path.to_string(),
        kind: NodeKind::Tree,
        size: None,
        url: None,
    }
}

fn file(path: &str) -> ParsedFile {
    ParsedFile::from_node(&blob(path, 1), 2025, &RepoLocation::default())
}

#[test]
fn parse_recovers_every_field_of_a_conforming_name() {
    let name = parse("20250115/20250115h00123full00010025.pdf");
    assert_eq!(
        name,
        FileName::Parsed {
            date: "20250115".to_string(),
            document_type: DocumentType::Original,
            issue_number: 123,
            page_range: (1, 25),
        }
    );
}

#[test]
fn parse_maps_each_type_letter() {
    let cases = [
        ('h', DocumentType::Original),
        ('g', DocumentType::Extra),
        ('c', DocumentType::Procurement),
        ('t', DocumentType::SpecialExtra),
        ('m', DocumentType::Index),
    ];
    for (letter, expected) in cases {
        let path = format!("20250301/20250301{letter}00001full00010001.pdf");
        assert_eq!(parse(&path).document_type(), expected, "letter {letter}");
    }
}

#[test]
fn parse_falls_back_to_unrecognized_without_panicking() {
    let bad = [
        "20250301/20250301x00001full00010001.pdf",  // unknown type letter
        "20250301/20250301h0001full00010001.pdf",   // 4-digit issue number
        "20250301/20250301h00001part00010001.pdf",  // missing "full"
        "20250301/20250301h00001full0001000.pdf",   // short page field
        "20250301/20250301h00001full00010001.PDF",  // suffix is case-sensitive
        "20250301/20250301h١٢٣٤٥full00010025.pdf",  // Arabic-Indic issue digits
        "20250301/２０２５０３０１h00001full00010001.pdf", // fullwidth date digits
        "20250301/20250301h00001full00010001.pdf.bak",
        "20250301h00001full00010001.pdf",           // single segment
        "",
        "20250301/",
    ];
    for path in bad {
        let name = parse(path);
        assert_eq!(name, FileName::Unrecognized, "path {path:?}");
        assert_eq!(name.document_type(), DocumentType::Other);
        assert_eq!(name.issue_number(), None);
        assert_eq!(name.page_range(), None);
    }
}

#[test]
fn parse_strips_leading_zeros() {
    let name = parse("20250401/20250401g00007full00000003.pdf");
    assert_eq!(name.issue_number(), Some(7));
    assert_eq!(name.page_range(), Some((0, 3)));
}

#[test]
fn filter_pdf_keeps_only_pdf_files() {
    let entries = vec![
        dir("20250301"),
        blob("20250301/20250301h00001full00010001.pdf", 10),
        blob("20250301/readme.md", 10),
        blob("20250301/upper.PDF", 10),
        dir("weird.pdf"),
        blob("README.pdf", 5),
    ];
    let kept: Vec<String> = filter_pdf(&entries).into_iter().map(|n| n.path).collect();
    assert_eq!(
        kept,
        vec!["20250301/20250301h00001full00010001.pdf", "README.pdf"]
    );
    assert!(filter_pdf(&[]).is_empty());
}

#[test]
fn from_node_builds_download_url_and_date() {
    let parsed = file("20250301/20250301h00001full00010001.pdf");
    assert_eq!(parsed.date, "20250301");
    assert_eq!(
        parsed.download_url,
        "https://raw.githubusercontent.com/kanpo-downloader/kanpo-2025/refs/heads/main/20250301/20250301h00001full00010001.pdf"
    );
}

#[test]
fn group_preserves_order_and_drops_nothing() {
    let paths = [
        "20250301/20250301h00002full00010002.pdf",
        "20250301/20250301g00010full00010004.pdf",
        "20250301/20250301h00001full00010001.pdf",
        "20250302/20250302h00003full00010008.pdf",
        "20250301/notes.pdf",
    ];
    let files: Vec<ParsedFile> = paths.iter().map(|p| file(p)).collect();
    let grouped = group(files.clone());

    let h: Vec<&str> = grouped["20250301"][&DocumentType::Original]
        .iter()
        .map(|f| f.path.as_str())
        .collect();
    assert_eq!(h, vec![paths[0], paths[2]]);
    assert_eq!(grouped["20250301"][&DocumentType::Other].len(), 1);

    let mut out: Vec<String> = grouped
        .values()
        .flat_map(|types| types.values().flatten())
        .map(|f| f.path.clone())
        .collect();
    let mut input: Vec<String> = files.into_iter().map(|f| f.path).collect();
    out.sort();
    input.sort();
    assert_eq!(out, input);
}

#[test]
fn bucket_by_month_orders_months_and_dates_descending() {
    let grouped = group(
        [
            "20250105/20250105h00001full00010001.pdf",
            "20250312/20250312h00002full00010001.pdf",
            "20250103/20250103h00003full00010001.pdf",
            "20251201/20251201h00004full00010001.pdf",
            "20250301/20250301h00005full00010001.pdf",
            "20250131/20250131h00006full00010001.pdf",
        ]
        .iter()
        .map(|p| file(p)),
    );
    let buckets = bucket_by_month(&grouped);

    let months: Vec<u32> = buckets.iter().map(|b| b.month).collect();
    assert_eq!(months, vec![12, 3, 1]);

    let january: Vec<&str> = buckets[2].dates.iter().map(|d| d.date.as_str()).collect();
    assert_eq!(january, vec!["20250131", "20250105", "20250103"]);

    for bucket in &buckets {
        for pair in bucket.dates.windows(2) {
            assert!(pair[0].date > pair[1].date);
        }
    }
}

#[test]
fn bucket_by_month_skips_dates_without_a_month() {
    let grouped = group([file("misc/readme.pdf"), file("20250701/x.pdf")]);
    let buckets = bucket_by_month(&grouped);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].month, 7);
    assert_eq!(month_of("misc"), None);
    assert_eq!(month_of("20251301"), None);
    assert_eq!(month_of("2025+301"), None);
    assert_eq!(month_of("2025０３01"), None);
    assert_eq!(month_of("20250301"), Some(3));
}

#[test]
fn normalize_groups_conforming_and_unrecognized_under_one_date() {
    let listing = TreeListing {
        tree: vec![
            dir("20250301"),
            blob("20250301/20250301h00123full00010025.pdf", 1_500_000),
            blob("20250301/supplement.pdf", 2_000),
        ],
    };
    let grouped = normalize(2025, &listing, &RepoLocation::default());

    let types = &grouped["20250301"];
    assert_eq!(types.len(), 2);
    assert_eq!(types[&DocumentType::Original].len(), 1);
    assert_eq!(types[&DocumentType::Other].len(), 1);

    let buckets = bucket_by_month(&grouped);
    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].month, 3);
    assert_eq!(buckets[0].dates.len(), 1);
    assert_eq!(buckets[0].dates[0].date, "20250301");
}

#[test]
fn available_years_counts_down_to_first_year() {
    assert_eq!(available_years(2027, 2025), vec![2027, 2026, 2025]);
    assert_eq!(available_years(2025, 2025), vec![2025]);
    assert!(available_years(2024, 2025).is_empty());
}

#[test]
fn month_availability_flags_months_with_dates() {
    let grouped = group([
        file("20250301/20250301h00001full00010001.pdf"),
        file("20251105/20251105g00001full00010001.pdf"),
        file("20240201/20240201g00001full00010001.pdf"),
    ]);
    let enabled: Vec<u32> = month_availability(&grouped, 2025)
        .into_iter()
        .filter(|m| m.has_files)
        .map(|m| m.month)
        .collect();
    assert_eq!(enabled, vec![3, 11]);
    assert_eq!(month_availability(&grouped, 2025).len(), 12);
}
