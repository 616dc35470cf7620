//! Parser integration tests
//!
//! These tests run the XML tree parser over hand-written documents and
//! captured CMT output.

use cmtquery::{parse_document, Document, Entry, ParseError, Project, TreeBuilder, XmlTreeParser};
use std::path::PathBuf;

/// Get the path to the CMT fixtures directory
fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/cmt")
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_path().join(name)).expect("Failed to read fixture")
}

// ============================================================================
// Basic documents
// ============================================================================

#[test]
fn test_single_project() {
    let xml = "<projects><project><name>A</name><version>1</version></project></projects>";

    let projects = parse_document(xml).unwrap().into_projects().unwrap();

    assert_eq!(projects.len(), 1);
    let project = &projects[0];
    assert_eq!(project.name, "A");
    assert_eq!(project.version, "1");
    assert_eq!(project.kind().as_str(), "project");
    assert!(project.uses.is_empty());
    assert!(project.clients.is_empty());
}

#[test]
fn test_package_nested_in_uses() {
    let xml = "<projects><project><name>A</name>\
               <uses><package><name>B</name></package></uses>\
               </project></projects>";

    let projects = parse_document(xml).unwrap().into_projects().unwrap();

    let project = &projects[0];
    assert_eq!(project.uses.len(), 1);
    match &project.uses[0] {
        Entry::Package(package) => assert_eq!(package.name, "B"),
        other => panic!("Expected a package, got {:?}", other),
    }
    assert!(project.uses.iter().all(|e| e.name() != "A"), "Project must not use itself");
}

#[test]
fn test_sibling_order_is_preserved() {
    let names: Vec<String> = (0..25).map(|i| format!("P{:02}", i)).collect();
    let mut xml = String::from("<projects>");
    for name in &names {
        xml.push_str(&format!("<project><name>{}</name></project>", name));
    }
    xml.push_str("</projects>");

    let projects = parse_document(&xml).unwrap().into_projects().unwrap();

    let parsed: Vec<String> = projects.into_iter().map(|p| p.name).collect();
    assert_eq!(parsed, names);
}

#[test]
fn test_empty_projects_is_empty_sequence() {
    let document = parse_document("<projects></projects>").unwrap();

    assert_eq!(document, Document::Records(Vec::new()));
    assert!(document.into_projects().unwrap().is_empty());
}

#[test]
fn test_independent_parses_are_equal() {
    let xml = read_fixture("show_projects.xml");

    let first = XmlTreeParser::new().parse(&xml).unwrap();
    let second = XmlTreeParser::new().parse(&xml).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_concurrent_parses_do_not_interfere() {
    let projects = read_fixture("show_projects.xml");
    let uses = read_fixture("show_uses.xml");

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let xml = if i % 2 == 0 { projects.clone() } else { uses.clone() };
            std::thread::spawn(move || parse_document(&xml).unwrap().len())
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), 3, "parse {} saw another parse's state", i);
    }
}

#[test]
fn test_bare_uses_root_is_sequence() {
    let document =
        parse_document("<clients><project><name>X</name></project></clients>").unwrap();

    match document {
        Document::Records(entries) => {
            assert_eq!(entries.len(), 1);
            assert_eq!(entries[0].name(), "X");
        }
        other => panic!("Expected a sequence, got {:?}", other),
    }
}

#[test]
fn test_bare_record_root() {
    let document = parse_document("<package><name>Solo</name></package>").unwrap();

    assert!(matches!(document, Document::Record(Entry::Package(ref p)) if p.name == "Solo"));
}

#[test]
fn test_unknown_tags_are_ignored() {
    let xml = "<projects><project><name>A</name><description>text</description>\
               <extra><nested>1</nested></extra></project></projects>";

    let projects = parse_document(xml).unwrap().into_projects().unwrap();

    assert_eq!(projects, vec![Project::new("A")]);
}

// ============================================================================
// Captured CMT output
// ============================================================================

#[test]
fn test_show_projects_fixture() {
    let projects = parse_document(&read_fixture("show_projects.xml"))
        .unwrap()
        .into_projects()
        .unwrap();

    let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["CAPTAIN", "CAPTAIN_EXTERNALS", "CMT"]);

    let captain = &projects[0];
    assert_eq!(captain.cmtpath, "/work/captain/CAPTAIN/HEAD");
    assert_eq!(captain.order, "0");
    assert!(captain.clients.is_empty());
    let used: Vec<&str> = captain.uses.iter().map(|e| e.name()).collect();
    assert_eq!(used, ["CAPTAIN_EXTERNALS", "CMT"]);

    let externals = &projects[1];
    assert_eq!(externals.clients.len(), 1);
    assert_eq!(externals.clients[0].name(), "CAPTAIN");
    assert!(externals.uses.is_empty());

    assert!(projects[2].uses.is_empty());
    assert!(projects[2].clients.is_empty());
}

#[test]
fn test_show_uses_fixture() {
    let entries = parse_document(&read_fixture("show_uses.xml"))
        .unwrap()
        .into_entries();

    assert_eq!(entries.len(), 3);
    let root = entries[1].as_package().expect("ROOT should be a package");
    assert_eq!(root.name, "ROOT");
    assert_eq!(root.offset, "Externals");
    assert_eq!(root.path(), "Externals/ROOT");
    assert_eq!(root.root, "/work/captain/CAPTAIN_EXTERNALS/v2r0/Externals/ROOT");
    assert_eq!(root.order, "2");
    assert!(root.clients.is_empty());

    let policy = entries[0].as_package().unwrap();
    assert_eq!(policy.offset, "");
    assert_eq!(policy.path(), "captainPolicy");
}

// ============================================================================
// Malformed input
// ============================================================================

#[test]
fn test_end_tag_without_start_is_error() {
    let err = XmlTreeParser::new().parse("</projects>").unwrap_err();
    assert!(
        matches!(err, ParseError::Xml { .. } | ParseError::Underflow { .. }),
        "unexpected error: {:?}",
        err
    );

    let mut builder = TreeBuilder::new();
    let err = builder.end(b"uses").unwrap_err();
    assert!(matches!(err, ParseError::Underflow { tag: "uses" }));
}

#[test]
fn test_unclosed_document_is_error() {
    let err = parse_document("<projects><project><name>A</name>").unwrap_err();
    assert!(
        matches!(err, ParseError::Unclosed { .. } | ParseError::Xml { .. }),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn test_leaf_directly_in_list_is_error() {
    let err = parse_document("<uses><name>orphan</name></uses>").unwrap_err();
    assert!(matches!(
        err,
        ParseError::StrayField {
            field: "name",
            container: Some("uses")
        }
    ));
}

#[test]
fn test_uses_inside_package_is_error() {
    let err = parse_document("<uses><package><uses></uses></package></uses>").unwrap_err();
    assert!(matches!(
        err,
        ParseError::NoSuchList {
            record: "package",
            list: "uses"
        }
    ));
}

#[test]
fn test_nested_projects_is_error() {
    let err = parse_document("<uses><projects></projects></uses>").unwrap_err();
    assert!(matches!(err, ParseError::NestedProjects));
}

#[test]
fn test_list_inside_list_is_error() {
    let err = parse_document("<uses><clients></clients></uses>").unwrap_err();
    assert!(matches!(
        err,
        ParseError::ListInList {
            parent: "uses",
            list: "clients"
        }
    ));
}

#[test]
fn test_package_clients_are_kept() {
    let xml = "<uses><package><name>P</name><clients>\
               <project><name>C</name></project></clients></package></uses>";

    let entries = parse_document(xml).unwrap().into_entries();

    let package = entries[0].as_package().unwrap();
    assert_eq!(package.clients.len(), 1);
    assert_eq!(package.clients[0].name(), "C");
}

// ============================================================================
// Character data
// ============================================================================

#[test]
fn test_leaf_text_split_by_cdata_and_tags() {
    let xml = "<uses>\n  <package>\n    <name>A<b>x</b>C</name>\n    \
               <root>/opt/my <![CDATA[dir]]> x</root>\n  </package>\n</uses>";

    let entries = parse_document(xml).unwrap().into_entries();

    let package = entries[0].as_package().unwrap();
    assert_eq!(package.name, "AC");
    assert_eq!(package.root, "/opt/my dir x");
}
