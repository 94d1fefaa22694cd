use std::io::{self, Write};

use insta::assert_snapshot;
use rstest::rstest;

use persist_xml::fixed::{Content, Document, DocumentContent, Element, Name, ProcessingInstruction};
use persist_xml::{
    DocType, Error, Format, Node, TextMode, ValueType, XmlData, XmlOutputter,
    DISABLE_OUTPUT_ESCAPING,
};

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

fn child(name: &str, children: Vec<Content>) -> Content {
    Content::Element(element(name, &[], children))
}

fn text(text: &str) -> Content {
    Content::Text(text.to_string())
}

fn document(document_element: Element) -> Document {
    Document {
        doctype: None,
        before: vec![],
        document_element,
        after: vec![],
    }
}

fn render_element(format: Format, element: &Element) -> String {
    let mut data = XmlData::new();
    let node = element.build(&mut data).unwrap();
    XmlOutputter::new(format)
        .unwrap()
        .element_to_string(&data, node)
        .unwrap()
}

fn render_document(format: Format, document: &Document) -> String {
    let mut data = XmlData::new();
    let node = document.build(&mut data).unwrap();
    XmlOutputter::new(format)
        .unwrap()
        .document_to_string(&data, node)
        .unwrap()
}

#[rstest]
#[case(TextMode::Trim)]
#[case(TextMode::Normalize)]
#[case(TextMode::TrimFullWhite)]
fn test_whitespace_only_element_self_closes(#[case] text_mode: TextMode) {
    let a = element("a", &[("x", "1")], vec![text("  \n  "), text("\t")]);
    assert_eq!(
        render_element(Format::default().with_text_mode(text_mode), &a),
        "<a x=\"1\" />"
    );
}

#[test]
fn test_empty_element_self_closes_in_raw_mode() {
    let a = element("a", &[], vec![]);
    assert_eq!(render_element(Format::raw(), &a), "<a />");
}

#[test]
fn test_raw_mode_keeps_whitespace_inline() {
    let a = element("a", &[], vec![text("  \n  ")]);
    assert_eq!(render_element(Format::raw(), &a), "<a>  \n  </a>");
    // indentation settings do not matter for character data
    assert_eq!(
        render_element(Format::default().with_text_mode(TextMode::Raw), &a),
        "<a>  \n  </a>"
    );
}

#[test]
fn test_mixed_content_is_indented() {
    let a = element("a", &[], vec![child("b", vec![]), text("text")]);
    assert_eq!(
        render_element(Format::default(), &a),
        "<a>\n  <b />\n  text\n</a>"
    );
}

#[test]
fn test_nested_settings_document() {
    let component = element(
        "component",
        &[("name", "ProjectRunConfigurationManager")],
        vec![
            text("\n  "),
            child(
                "configuration",
                vec![
                    Content::Element(element("option", &[("name", "MAIN_CLASS"), ("value", "Main")], vec![])),
                    Content::Element(element("module", &[("name", "app")], vec![])),
                    Content::Comment(" tasks ".to_string()),
                    child("method", vec![text("  build  ")]),
                ],
            ),
            text("\n"),
        ],
    );
    let output = render_document(Format::default(), &document(component));
    // inline snapshots drop trailing newlines
    assert!(output.ends_with("</component>\n\n"));
    assert_snapshot!(output, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<component name="ProjectRunConfigurationManager">
  <configuration>
    <option name="MAIN_CLASS" value="Main" />
    <module name="app" />
    <!-- tasks -->
    <method>build</method>
  </configuration>
</component>
"#);
}

#[rstest]
#[case(TextMode::Raw, "<a>hello</a>")]
#[case(TextMode::Trim, "<a>hello</a>")]
#[case(TextMode::Normalize, "<a>hello</a>")]
#[case(TextMode::TrimFullWhite, "<a>hello</a>")]
fn test_pure_text_is_inline(#[case] text_mode: TextMode, #[case] expected: &str) {
    let a = element("a", &[], vec![text("hello")]);
    assert_eq!(
        render_element(Format::default().with_text_mode(text_mode), &a),
        expected
    );
}

#[rstest]
#[case(TextMode::Normalize, "<a>foo bar</a>")]
#[case(TextMode::Trim, "<a>foo   bar</a>")]
#[case(TextMode::Raw, "<a>  foo   bar  </a>")]
#[case(TextMode::TrimFullWhite, "<a>  foo   bar  </a>")]
fn test_text_modes(#[case] text_mode: TextMode, #[case] expected: &str) {
    let a = element("a", &[], vec![text("  foo   bar  ")]);
    assert_eq!(
        render_element(Format::default().with_text_mode(text_mode), &a),
        expected
    );
}

#[test]
fn test_trim_full_white_keeps_text_in_mixed_content() {
    let a = element(
        "a",
        &[],
        vec![text("  "), child("b", vec![]), text("  x  ")],
    );
    assert_eq!(
        render_element(
            Format::default().with_text_mode(TextMode::TrimFullWhite),
            &a
        ),
        "<a>\n  <b />\n    x  \n</a>"
    );
}

#[test]
fn test_text_runs_are_padded() {
    // the whitespace-only node in the middle is dropped by trimming, the
    // words on either side must not be glued together
    let a = element("a", &[], vec![text("hello "), text("world")]);
    assert_eq!(render_element(Format::default(), &a), "<a>hello world</a>");
    assert_eq!(render_element(Format::compact(), &a), "<a>hello world</a>");
}

#[test]
fn test_entity_refs_and_cdata() {
    let a = element(
        "a",
        &[],
        vec![
            text("x < y"),
            Content::EntityRef("nbsp".to_string()),
            Content::CData(" <raw> ".to_string()),
        ],
    );
    assert_eq!(
        render_element(Format::default(), &a),
        "<a>x &lt; y&nbsp; <![CDATA[<raw>]]></a>"
    );
    assert_eq!(
        render_element(Format::raw(), &a),
        "<a>x &lt; y&nbsp;<![CDATA[ <raw> ]]></a>"
    );
}

#[test]
fn test_attribute_escaping() {
    let a = element("a", &[("v", "say \"hi\" <&>\n\tdone")], vec![]);
    assert_eq!(
        render_element(Format::default(), &a),
        "<a v=\"say &quot;hi&quot; &lt;&amp;&gt;&#10;&#9;done\" />"
    );
}

#[test]
fn test_text_escaping_keeps_quotes() {
    let a = element("a", &[], vec![text("\"a\" & 'b'")]);
    assert_eq!(
        render_element(Format::default(), &a),
        "<a>\"a\" &amp; 'b'</a>"
    );
}

#[test]
fn test_attribute_order_is_preserved() {
    let a = element("a", &[("z", "1"), ("a", "2"), ("m", "3")], vec![]);
    assert_eq!(
        render_element(Format::default(), &a),
        "<a z=\"1\" a=\"2\" m=\"3\" />"
    );
}

#[test]
fn test_prefixed_names() {
    let mut data = XmlData::new();
    let ns = data.add_namespace("x", "http://example.com/x");
    let name_a = data.add_name_ns("a", ns);
    let name_b = data.add_name_ns("b", ns);
    let a = data.new_element(name_a);
    data.set_attribute(a, name_b, "1").unwrap();
    data.append_text(a, "t").unwrap();
    let outputter = XmlOutputter::new(Format::default()).unwrap();
    assert_eq!(
        outputter.element_to_string(&data, a).unwrap(),
        "<x:a x:b=\"1\">t</x:a>"
    );
}

#[test]
fn test_declaration_and_trailing_separator_without_indent() {
    let a = element("a", &[], vec![]);
    assert_eq!(
        render_document(Format::default().with_indent(None::<String>), &document(a)),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a />\n"
    );
}

#[test]
fn test_omit_encoding() {
    let a = element("a", &[], vec![]);
    assert_eq!(
        render_document(Format::default().with_omit_encoding(true), &document(a)),
        "<?xml version=\"1.0\"?>\n<a />\n\n"
    );
}

#[test]
fn test_omit_declaration() {
    let a = element("a", &[], vec![]);
    assert_eq!(
        render_document(Format::default().with_omit_declaration(true), &document(a)),
        "<a />\n\n"
    );
}

#[test]
fn test_declaration_encoding_label() {
    let a = element("a", &[], vec![]);
    assert_eq!(
        render_document(
            Format::compact().with_encoding("ISO-8859-1"),
            &document(a)
        ),
        "<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<a />\n"
    );
}

#[rstest]
#[case("UTF-32")]
#[case("UTF-16")]
#[case("x-mac-roman")]
fn test_encoding_label_is_written_verbatim(#[case] label: &str) {
    let a = element("a", &[], vec![]);
    assert_eq!(
        render_document(Format::compact().with_encoding(label), &document(a)),
        format!("<?xml version=\"1.0\" encoding=\"{}\"?>\n<a />\n", label)
    );
}

#[test]
fn test_raw_format_has_no_line_separators() {
    let a = element("a", &[], vec![child("b", vec![])]);
    assert_eq!(
        render_document(Format::raw(), &document(a)),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a><b /></a>"
    );
}

#[test]
fn test_custom_indent_and_line_separator() {
    let a = element("a", &[], vec![child("b", vec![child("c", vec![])])]);
    let format = Format::default()
        .with_indent(Some("\t"))
        .with_line_separator(Some("\r\n"))
        .with_omit_declaration(true);
    assert_eq!(
        render_document(format, &document(a)),
        "<a>\r\n\t<b>\r\n\t\t<c />\r\n\t</b>\r\n</a>\r\n\r\n"
    );
}

#[rstest]
#[case(
    DocType {
        element_name: "web-app".to_string(),
        public_id: Some("-//Sun Microsystems, Inc.//DTD Web Application 2.3//EN".to_string()),
        system_id: Some("http://java.sun.com/dtd/web-app_2_3.dtd".to_string()),
        internal_subset: None,
    },
    "<!DOCTYPE web-app PUBLIC \"-//Sun Microsystems, Inc.//DTD Web Application 2.3//EN\" \"http://java.sun.com/dtd/web-app_2_3.dtd\">"
)]
#[case(
    DocType {
        element_name: "a".to_string(),
        system_id: Some("a.dtd".to_string()),
        ..Default::default()
    },
    "<!DOCTYPE a SYSTEM \"a.dtd\">"
)]
#[case(
    DocType {
        element_name: "a".to_string(),
        internal_subset: Some("<!ENTITY x \"y\">".to_string()),
        ..Default::default()
    },
    "<!DOCTYPE a [\n<!ENTITY x \"y\">]>"
)]
#[case(DocType::new("a"), "<!DOCTYPE a>")]
fn test_doctype(#[case] doctype: DocType, #[case] expected: &str) {
    let document = Document {
        doctype: Some(doctype),
        ..document(element("a", &[], vec![]))
    };
    assert_eq!(
        render_document(Format::default().with_omit_declaration(true), &document),
        format!("{}\n\n<a />\n\n", expected)
    );
}

#[test]
fn test_doctype_is_followed_by_separator_without_indent() {
    let document = Document {
        doctype: Some(DocType::new("a")),
        ..document(element("a", &[], vec![]))
    };
    assert_eq!(
        render_document(Format::compact(), &document),
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!DOCTYPE a>\n<a />\n"
    );
}

fn pi(target: &str, content: Option<&str>) -> ProcessingInstruction {
    ProcessingInstruction {
        target: target.to_string(),
        content: content.map(|content| content.to_string()),
    }
}

#[test]
fn test_processing_instructions() {
    let document = Document {
        before: vec![
            DocumentContent::ProcessingInstruction(pi("xml-stylesheet", Some("href=\"a.xsl\""))),
            DocumentContent::Comment("c".to_string()),
        ],
        after: vec![DocumentContent::ProcessingInstruction(pi("done", None))],
        ..document(element("a", &[], vec![]))
    };
    assert_eq!(
        render_document(Format::compact().with_omit_declaration(true), &document),
        "<?xml-stylesheet href=\"a.xsl\"?><!--c--><a /><?done?>\n"
    );
}

#[test]
fn test_escaping_pis_are_dropped() {
    let a = element(
        "a",
        &[],
        vec![
            Content::ProcessingInstruction(pi(DISABLE_OUTPUT_ESCAPING, None)),
            child("b", vec![]),
            Content::ProcessingInstruction(pi("javax.xml.transform.enable-output-escaping", None)),
        ],
    );
    assert_eq!(
        render_element(Format::compact(), &a),
        "<a><b /></a>"
    );
    // a dropped instruction still takes up its line
    assert_eq!(
        render_element(Format::default(), &a),
        "<a>\n  \n  <b />\n  \n</a>"
    );
}

#[test]
fn test_escaping_pis_are_kept_when_ignored() {
    let a = element(
        "a",
        &[],
        vec![Content::ProcessingInstruction(pi(DISABLE_OUTPUT_ESCAPING, Some("x")))],
    );
    assert_eq!(
        render_element(Format::compact().with_ignore_escaping_pis(true), &a),
        "<a><?javax.xml.transform.disable-output-escaping x?></a>"
    );
}

#[test]
fn test_element_filter_skips_subtree() {
    let a = element(
        "a",
        &[],
        vec![
            child("b", vec![]),
            child("skip", vec![child("c", vec![])]),
            child("d", vec![]),
        ],
    );
    let mut data = XmlData::new();
    let node = a.build(&mut data).unwrap();
    let outputter = XmlOutputter::new(Format::default())
        .unwrap()
        .with_element_filter(|data: &XmlData, element: Node, _depth: usize| {
            data.element(element)
                .map(|element| data.local_name_str(element.name()) != "skip")
                .unwrap_or(true)
        });
    // the skipped element keeps its line
    assert_eq!(
        outputter.element_to_string(&data, node).unwrap(),
        "<a>\n  <b />\n  \n  <d />\n</a>"
    );
}

#[test]
fn test_element_filter_sees_depth() {
    let a = element("a", &[], vec![child("b", vec![child("c", vec![])])]);
    let mut data = XmlData::new();
    let node = a.build(&mut data).unwrap();
    let outputter = XmlOutputter::new(Format::compact())
        .unwrap()
        .with_element_filter(|_data: &XmlData, _element: Node, depth: usize| depth < 2);
    assert_eq!(
        outputter.element_to_string(&data, node).unwrap(),
        "<a><b></b></a>"
    );

    let outputter = XmlOutputter::new(Format::compact())
        .unwrap()
        .with_element_filter(|_data: &XmlData, _element: Node, _depth: usize| false);
    assert_eq!(outputter.element_to_string(&data, node).unwrap(), "");
}

#[test]
fn test_output_is_idempotent() {
    let a = element(
        "a",
        &[("x", "1")],
        vec![text(" hi "), child("b", vec![text("there")])],
    );
    let mut data = XmlData::new();
    let node = document(a).build(&mut data).unwrap();
    let outputter = XmlOutputter::new(Format::default()).unwrap();
    let first = outputter.document_to_string(&data, node).unwrap();
    let second = outputter.document_to_string(&data, node).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_outputter_is_shared_between_threads() {
    let outputter = XmlOutputter::new(Format::default()).unwrap();
    let a = element("a", &[], vec![child("b", vec![text("x")])]);
    let outputs = std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|_| {
                let a = &a;
                let outputter = &outputter;
                scope.spawn(move || {
                    let mut data = XmlData::new();
                    let node = a.build(&mut data).unwrap();
                    outputter.element_to_string(&data, node).unwrap()
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });
    for output in outputs {
        assert_eq!(output, "<a>\n  <b>x</b>\n</a>");
    }
}

#[test]
fn test_output_element_writes_to_sink() {
    let a = element("a", &[], vec![]);
    let mut data = XmlData::new();
    let node = a.build(&mut data).unwrap();
    let outputter = XmlOutputter::new(Format::default()).unwrap();
    let mut buf = Vec::new();
    outputter.output_element(&data, node, &mut buf).unwrap();
    assert_eq!(buf, b"<a />");
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_write_failure_aborts() {
    let mut data = XmlData::new();
    let node = document(element("a", &[], vec![])).build(&mut data).unwrap();
    let outputter = XmlOutputter::new(Format::default()).unwrap();
    let err = outputter
        .output_document(&data, node, &mut FailingWriter)
        .unwrap_err();
    assert!(matches!(err, Error::Io(e) if e.kind() == io::ErrorKind::BrokenPipe));
}

#[derive(Default)]
struct CountingWriter {
    written: Vec<u8>,
    flushes: usize,
}

impl Write for CountingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[test]
fn test_only_documents_are_flushed() {
    let mut data = XmlData::new();
    let doc = document(element("a", &[], vec![])).build(&mut data).unwrap();
    let a = data.document_element(doc).unwrap();
    let outputter = XmlOutputter::new(Format::default()).unwrap();

    let mut w = CountingWriter::default();
    outputter.output_document(&data, doc, &mut w).unwrap();
    assert_eq!(w.flushes, 1);

    let mut w = CountingWriter::default();
    outputter.output_element(&data, a, &mut w).unwrap();
    assert_eq!(w.flushes, 0);
    assert_eq!(w.written, b"<a />");
}

#[test]
fn test_invalid_encoding_label() {
    let err = XmlOutputter::new(Format::default().with_encoding("UTF-8\"?><evil"))
        .err()
        .unwrap();
    assert!(matches!(err, Error::InvalidEncoding(label) if label == "UTF-8\"?><evil"));
    assert!(matches!(
        XmlOutputter::new(Format::default().with_encoding("")),
        Err(Error::InvalidEncoding(_))
    ));
}

#[test]
fn test_wrong_node_kinds() {
    let mut data = XmlData::new();
    let doc = document(element("a", &[], vec![text("t")]))
        .build(&mut data)
        .unwrap();
    let a = data.document_element(doc).unwrap();
    let t = data.first_child(a).unwrap();
    let outputter = XmlOutputter::new(Format::default()).unwrap();
    assert!(matches!(
        outputter.document_to_string(&data, a),
        Err(Error::NotDocument(node)) if node == a
    ));
    assert!(matches!(
        outputter.element_to_string(&data, t),
        Err(Error::NotElement(node)) if node == t
    ));
}

#[test]
fn test_character_data_cannot_reach_the_document() {
    // the document node only holds markup, so top-level text never has to
    // be written
    let mut data = XmlData::new();
    let doc = data.new_document();
    for result in [
        data.append_text(doc, "t").map(|_| ()),
        data.append_cdata(doc, "c").map(|_| ()),
        data.append_entity_ref(doc, "amp").map(|_| ()),
    ] {
        assert!(matches!(result, Err(Error::InvalidOperation(_))));
    }
    assert_eq!(data.children(doc).count(), 0);
    assert_eq!(data.value_type(doc), ValueType::Document);
}
