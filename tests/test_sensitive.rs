use std::path::Path;
use std::sync::{Arc, Mutex};

use persist_xml::fixed::{Content, Element, Name};
use persist_xml::{
    Diagnostic, Diagnostics, Format, NameHeuristicGuard, NodeKind, XmlData, XmlOutputter,
};

#[derive(Default)]
struct Recorder(Mutex<Vec<Diagnostic>>);

impl Recorder {
    fn messages(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|diagnostic| diagnostic.to_string())
            .collect()
    }
}

impl Diagnostics for Recorder {
    fn report(&self, diagnostic: &Diagnostic) {
        self.0.lock().unwrap().push(diagnostic.clone());
    }
}

fn element(name: &str, attributes: &[(&str, &str)], children: Vec<Content>) -> Element {
    Element {
        name: Name::local(name),
        attributes: attributes
            .iter()
            .map(|(name, value)| (Name::local(name), value.to_string()))
            .collect(),
        children,
    }
}

fn render(element: &Element, guard: NameHeuristicGuard) -> String {
    let mut data = XmlData::new();
    let node = element.build(&mut data).unwrap();
    XmlOutputter::new(Format::default())
        .unwrap()
        .with_sensitive_data_guard(guard)
        .element_to_string(&data, node)
        .unwrap()
}

#[test]
fn test_option_idiom_reports_once_and_keeps_value() {
    let recorder = Arc::new(Recorder::default());
    let option = element("option", &[("name", "password"), ("value", "s3cr3t")], vec![]);
    let output = render(&option, NameHeuristicGuard::new(recorder.clone()));
    assert_eq!(output, "<option name=\"password\" value=\"s3cr3t\" />");

    let reported = recorder.0.lock().unwrap();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].kind, NodeKind::Element);
    assert_eq!(reported[0].name, "@name=password");
    assert_eq!(reported[0].parent.as_deref(), Some("option"));
}

#[test]
fn test_name_without_value_is_not_an_option() {
    let recorder = Arc::new(Recorder::default());
    let module = element("module", &[("name", "password")], vec![]);
    render(&module, NameHeuristicGuard::new(recorder.clone()));
    assert!(recorder.messages().is_empty());
}

#[test]
fn test_attributes_are_reported_before_their_element() {
    let recorder = Arc::new(Recorder::default());
    let component = element(
        "component",
        &[],
        vec![Content::Element(element(
            "credentials",
            &[("apiKey", "x")],
            vec![],
        ))],
    );
    let output = render(&component, NameHeuristicGuard::new(recorder.clone()));
    assert_eq!(
        output,
        "<component>\n  <credentials apiKey=\"x\" />\n</component>"
    );
    assert_eq!(
        recorder.messages(),
        vec![
            "Attribute apiKey probably contains sensitive information (parent: credentials)",
            "Element credentials probably contains sensitive information (parent: component)",
        ]
    );
}

#[test]
fn test_known_safe_names_are_quiet() {
    let recorder = Arc::new(Recorder::default());
    let options = element(
        "options",
        &[],
        vec![
            Content::Element(element(
                "option",
                &[("name", "rememberPassword"), ("value", "true")],
                vec![],
            )),
            Content::Element(element("showPassword", &[], vec![])),
            Content::Element(element("keymap", &[("monkey", "1")], vec![])),
        ],
    );
    render(&options, NameHeuristicGuard::new(recorder.clone()));
    assert!(recorder.messages().is_empty());
}

#[test]
fn test_debug_path_is_mentioned() {
    let recorder = Arc::new(Recorder::default());
    let guard = NameHeuristicGuard::new(recorder.clone()).with_debug_path_and_home(
        "/home/alice/.config/app/options/github.xml",
        Some(Path::new("/home/alice")),
    );
    let option = element("option", &[("name", "githubToken"), ("value", "")], vec![]);
    render(&option, guard);
    assert_eq!(
        recorder.messages(),
        vec![
            "Element @name=githubToken probably contains sensitive information (file: ~/.config/app/options/github.xml) (parent: option)"
        ]
    );
}

#[test]
fn test_guard_does_not_change_output() {
    let recorder = Arc::new(Recorder::default());
    let settings = element(
        "application",
        &[],
        vec![Content::Element(element(
            "component",
            &[("name", "PasswordSafe")],
            vec![
                Content::Element(element("option", &[("name", "PROVIDER"), ("value", "KEEPASS")], vec![])),
                Content::Element(element("secret", &[("token", "abc")], vec![])),
            ],
        ))],
    );
    let guarded = render(&settings, NameHeuristicGuard::new(recorder.clone()));
    let unguarded = {
        let mut data = XmlData::new();
        let node = settings.build(&mut data).unwrap();
        XmlOutputter::new(Format::default())
            .unwrap()
            .element_to_string(&data, node)
            .unwrap()
    };
    assert_eq!(guarded, unguarded);
    assert_eq!(recorder.messages().len(), 2);
}

#[test]
fn test_logging_guard_never_fails() {
    let option = element("option", &[("name", "password"), ("value", "x")], vec![]);
    assert_eq!(
        render(&option, NameHeuristicGuard::logging()),
        "<option name=\"password\" value=\"x\" />"
    );
}
