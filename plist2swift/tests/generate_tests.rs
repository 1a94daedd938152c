use plist2swift::{
    Document, ErrorKind, GenerateOptions, Generator, OddKeysMode, generate, read_documents,
};
use std::{fs, path::PathBuf};
use tempfile::TempDir;

const PROD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>configurationName</key>
	<string>Prod</string>
	<key>host</key>
	<string>a.com</string>
	<key>timeout</key>
	<integer>30</integer>
</dict>
</plist>
"#;

const DEV: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
	<key>configurationName</key>
	<string>Dev</string>
	<key>host</key>
	<string>b.com</string>
</dict>
</plist>
"#;

const EXPECTED: &str = "//
// Generated by plist2swift - Swift code from plists generator
//

import Foundation

protocol ApiProtocol {
\t// Common Keys
\tvar configurationName: String { get }
\tvar host: String { get }

\t// Optional Keys
\tvar timeout: Int? { get }
}

internal enum Api {
\tcase prod
\tcase dev

\tinternal struct Prod {
\t\tinternal let configurationName: String = \"Prod\"
\t\tinternal let host: String = \"a.com\"
\t}

\tinternal struct Dev {
\t\tinternal let configurationName: String = \"Dev\"
\t\tinternal let host: String = \"b.com\"
\t}

\tvar configuration: ApiProtocol {
\t\tswitch self {
\t\tcase .prod:
\t\t\treturn Prod()
\t\tcase .dev:
\t\t\treturn Dev()
\t\t}
\t}
}

extension Api.Prod: ApiProtocol {
\tvar timeout: Int? {
\t\treturn 30
\t}
}

extension Api.Dev: ApiProtocol {
\tvar timeout: Int? {
\t\treturn nil
\t}
}
";

fn write_files(dir: &TempDir, files: &[(&str, &str)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, content)| {
            let path = dir.path().join(name);
            fs::write(&path, content).unwrap();
            path
        })
        .collect()
}

fn plist(entries: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<plist version=\"1.0\">\n<dict>\n{}\n</dict>\n</plist>\n",
        entries
    )
}

#[test]
fn test_generates_full_source_for_two_documents() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(&dir, &[("Prod.plist", PROD), ("Dev.plist", DEV)]);

    let swift = generate(&paths, &GenerateOptions::new("Api")).unwrap();
    assert_eq!(swift, EXPECTED);
}

#[test]
fn test_generation_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(&dir, &[("Prod.plist", PROD), ("Dev.plist", DEV)]);
    let options = GenerateOptions::new("Api");

    let first = generate(&paths, &options).unwrap();
    let second = generate(&paths, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cases_follow_argument_order() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(&dir, &[("Dev.plist", DEV), ("Prod.plist", PROD)]);

    let swift = generate(&paths, &GenerateOptions::new("Api")).unwrap();
    let dev = swift.find("\tcase dev\n").unwrap();
    let prod = swift.find("\tcase prod\n").unwrap();
    assert!(dev < prod);
    assert_eq!(swift.matches("\t\tcase .").count(), 2);
}

#[test]
fn test_optional_bool_is_returned_from_extension() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(
        &dir,
        &[
            (
                "a.plist",
                plist("<key>configurationName</key><string>A</string><key>debug</key><true/>").as_str(),
            ),
            ("b.plist", plist("<key>configurationName</key><string>B</string>").as_str()),
        ],
    );

    let swift = generate(&paths, &GenerateOptions::new("Env")).unwrap();
    assert!(swift.contains("\tvar debug: Bool? { get }\n"));
    assert!(swift.contains("extension Env.A: EnvProtocol {\n\tvar debug: Bool? {\n\t\treturn true\n\t}\n}\n"));
    assert!(swift.contains("extension Env.B: EnvProtocol {\n\tvar debug: Bool? {\n\t\treturn nil\n\t}\n}\n"));
}

#[test]
fn test_nested_dictionaries_are_unified() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(
        &dir,
        &[
            (
                "a.plist",
                plist(
                    "<key>configurationName</key><string>A</string>\
                     <key>analytics</key><dict><key>enabled</key><true/><key>sampleRate</key><integer>10</integer></dict>",
                ).as_str(),
            ),
            (
                "b.plist",
                plist(
                    "<key>configurationName</key><string>B</string>\
                     <key>analytics</key><dict><key>enabled</key><false/></dict>",
                ).as_str(),
            ),
        ],
    );
    let options = GenerateOptions::new("Env");
    let documents = read_documents(&paths, &options.identifier_key).unwrap();
    let generator = Generator::new(&documents, &options).unwrap();

    let nested = generator.nested().get("analytics").unwrap();
    assert!(nested.common_keys.contains("enabled"));
    assert!(nested.odd_keys.contains("sampleRate"));

    let swift = generator.generate().unwrap();
    assert!(swift.contains(
        "protocol AnalyticsProtocol {\n\t// Common Keys\n\tvar enabled: Bool { get }\n\n\t// Optional Keys\n\tvar sampleRate: Int? { get }\n}\n"
    ));
    assert!(swift.contains("\tvar analytics: AnalyticsProtocol { get }\n"));
    assert_eq!(swift.matches("protocol AnalyticsProtocol").count(), 1);
}

#[test]
fn test_missing_identifier_is_a_schema_error() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(
        &dir,
        &[
            ("Prod.plist", PROD),
            ("broken.plist", plist("<key>host</key><string>c.com</string>").as_str()),
        ],
    );

    let err = generate(&paths, &GenerateOptions::new("Api")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    let message = err.to_string();
    assert!(message.contains("broken.plist"));
    assert!(message.contains("`configurationName`"));
}

#[test]
fn test_unreadable_document_names_its_path() {
    let dir = TempDir::new().unwrap();
    let mut paths = write_files(&dir, &[("Prod.plist", PROD)]);
    paths.push(dir.path().join("missing.plist"));

    let err = generate(&paths, &GenerateOptions::new("Api")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DocumentRead);
    assert!(err.to_string().contains("missing.plist"));
}

#[test]
fn test_json_and_plist_documents_mix() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(
        &dir,
        &[
            ("Prod.plist", PROD),
            (
                "Dev.json",
                r#"{"configurationName": "Dev", "host": "b.com", "ratio": 0.5}"#,
            ),
        ],
    );

    let swift = generate(&paths, &GenerateOptions::new("Api")).unwrap();
    assert!(swift.contains("\tvar ratio: String? { get }\n"));
    assert!(swift.contains("\t\treturn \"0.5\"\n"));
}

#[test]
fn test_forced_optional_single_document() {
    let documents = vec![Document::new(
        "only.plist",
        plist2swift::Record::new()
            .with("configurationName", "Only")
            .with("host", "a.com"),
    )];
    let options = GenerateOptions::new("Env").with_odd_keys(OddKeysMode::Forced);
    let swift = Generator::new(&documents, &options)
        .unwrap()
        .generate()
        .unwrap();

    assert!(swift.contains("\t// Common Keys\n\tvar configurationName: String { get }\n"));
    assert!(swift.contains("\t// Optional Keys\n\tvar host: String? { get }\n"));
    assert!(swift.contains("extension Env.Only: EnvProtocol {\n\tvar host: String? {\n\t\treturn \"a.com\"\n\t}\n}\n"));
}

#[test]
fn test_conflicting_scalars_are_declared_as_string() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(
        &dir,
        &[
            (
                "a.plist",
                plist("<key>configurationName</key><string>A</string><key>port</key><integer>80</integer>").as_str(),
            ),
            (
                "b.plist",
                plist("<key>configurationName</key><string>B</string><key>port</key><string>eighty</string>").as_str(),
            ),
        ],
    );

    let swift = generate(&paths, &GenerateOptions::new("Api")).unwrap();
    assert!(swift.contains("\tvar port: String { get }\n"));
    assert!(swift.contains("\t\tinternal let port: String = \"80\"\n"));
    assert!(swift.contains("\t\tinternal let port: String = \"eighty\"\n"));
}

#[test]
fn test_dictionary_and_scalar_under_one_key_is_a_schema_error() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(
        &dir,
        &[
            (
                "a.plist",
                plist("<key>configurationName</key><string>A</string><key>limits</key><dict><key>max</key><integer>1</integer></dict>").as_str(),
            ),
            (
                "b.plist",
                plist("<key>configurationName</key><string>B</string><key>limits</key><integer>5</integer>").as_str(),
            ),
        ],
    );

    let err = generate(&paths, &GenerateOptions::new("Api")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    let message = err.to_string();
    assert!(message.contains("b.plist"));
    assert!(message.contains("`limits`"));
}

#[test]
fn test_enum_name_clashing_with_nested_protocol_is_a_usage_error() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(
        &dir,
        &[(
            "a.plist",
            plist("<key>configurationName</key><string>A</string><key>api</key><dict><key>url</key><string>x</string></dict>").as_str(),
        )],
    );

    let err = generate(&paths, &GenerateOptions::new("Api")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Usage);
    assert!(err.to_string().contains("ApiProtocol"));
}

#[test]
fn test_key_that_cannot_be_a_property_is_a_schema_error() {
    let dir = TempDir::new().unwrap();
    let paths = write_files(
        &dir,
        &[(
            "a.plist",
            plist("<key>configurationName</key><string>A</string><key>api-key</key><string>k</string>").as_str(),
        )],
    );

    let err = generate(&paths, &GenerateOptions::new("Env")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
    let message = err.to_string();
    assert!(message.contains("a.plist"));
    assert!(message.contains("`api-key` is not a valid Swift identifier"));
}
