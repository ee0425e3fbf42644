//! Parse generated SLD back with quick-xml and check the structure the
//! rendering server depends on.

use quick_xml::events::Event;
use quick_xml::Reader;
use sld_common::{ClassValue, GeometryKind, Rgb};
use sld_protocol::{
    to_sld, ColorMap, ColorMapEntry, ColorMapType, Filter, RasterStyle, StyleBody, StyleDocument,
    StyleRule, Stroke, Symbolizer,
};

/// Flattened view of the document: element paths and text content.
#[derive(Debug, Default)]
struct Parsed {
    elements: Vec<String>,
    texts: Vec<(String, String)>,
    attrs: Vec<(String, String, String)>,
}

fn parse(xml: &str) -> Parsed {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut parsed = Parsed::default();
    let mut stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) => {
                let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                collect_attrs(&mut parsed, &name, &e);
                parsed.elements.push(name.clone());
                stack.push(name);
            }
            Event::Empty(e) => {
                let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                collect_attrs(&mut parsed, &name, &e);
                parsed.elements.push(name);
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(t) => {
                let owner = stack.last().cloned().unwrap_or_default();
                parsed.texts.push((owner, t.unescape().unwrap().into_owned()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    assert!(stack.is_empty(), "unbalanced elements: {:?}", stack);
    parsed
}

fn collect_attrs(parsed: &mut Parsed, element: &str, e: &quick_xml::events::BytesStart<'_>) {
    for attr in e.attributes() {
        let attr = attr.unwrap();
        let key = String::from_utf8(attr.key.as_ref().to_vec()).unwrap();
        let value = attr.unescape_value().unwrap().into_owned();
        parsed.attrs.push((element.to_string(), key, value));
    }
}

fn texts_of<'a>(parsed: &'a Parsed, element: &str) -> Vec<&'a str> {
    parsed
        .texts
        .iter()
        .filter(|(owner, _)| owner == element)
        .map(|(_, text)| text.as_str())
        .collect()
}

fn attrs_of<'a>(parsed: &'a Parsed, element: &str, key: &str) -> Vec<&'a str> {
    parsed
        .attrs
        .iter()
        .filter(|(owner, k, _)| owner == element && k == key)
        .map(|(_, _, v)| v.as_str())
        .collect()
}

#[test]
fn test_raster_document_parses_back() {
    let doc = StyleDocument {
        name: "elevation".to_string(),
        geometry: GeometryKind::Raster,
        body: StyleBody::Raster(RasterStyle {
            channel: 2,
            color_map: ColorMap {
                kind: ColorMapType::Intervals,
                entries: vec![
                    ColorMapEntry {
                        quantity: 0.0,
                        color: Rgb::new(0xff, 0x00, 0x00),
                        label: "0 - 5".to_string(),
                        opacity: None,
                    },
                    ColorMapEntry {
                        quantity: 5.0,
                        color: Rgb::new(0x00, 0xff, 0x00),
                        label: "5 - 10".to_string(),
                        opacity: None,
                    },
                ],
            },
        }),
    };

    let parsed = parse(&to_sld(&doc).unwrap());

    assert_eq!(parsed.elements[0], "StyledLayerDescriptor");
    assert_eq!(attrs_of(&parsed, "StyledLayerDescriptor", "version"), vec!["1.0.0"]);
    assert_eq!(texts_of(&parsed, "Name"), vec!["elevation", "elevation"]);
    assert_eq!(texts_of(&parsed, "SourceChannelName"), vec!["2"]);
    assert_eq!(attrs_of(&parsed, "ColorMap", "type"), vec!["intervals"]);
    assert_eq!(attrs_of(&parsed, "ColorMapEntry", "quantity"), vec!["0", "5"]);
    assert_eq!(
        attrs_of(&parsed, "ColorMapEntry", "color"),
        vec!["#ff0000", "#00ff00"]
    );
    assert_eq!(
        attrs_of(&parsed, "ColorMapEntry", "label"),
        vec!["0 - 5", "5 - 10"]
    );

    for element in ["NamedLayer", "UserStyle", "FeatureTypeStyle", "RasterSymbolizer"] {
        assert_eq!(
            parsed.elements.iter().filter(|e| *e == element).count(),
            1,
            "expected one {}",
            element
        );
    }
}

#[test]
fn test_feature_document_keeps_rule_order_and_filters() {
    let stroke = Stroke::new(Rgb::BLACK, 1.0).with_linejoin("bevel");
    let rules = vec![
        StyleRule {
            name: "0 - 5".to_string(),
            title: Some("0 - 5".to_string()),
            filter: Some(Filter::within("depth", 0.0, 5.0, false)),
            symbolizer: Symbolizer::Polygon {
                fill: Some(Rgb::new(0xff, 0, 0)),
                stroke: Some(stroke.clone()),
            },
        },
        StyleRule {
            name: "5 - 10".to_string(),
            title: Some("5 - 10".to_string()),
            filter: Some(Filter::within("depth", 5.0, 10.0, true)),
            symbolizer: Symbolizer::Polygon {
                fill: Some(Rgb::new(0, 0xff, 0)),
                stroke: Some(stroke),
            },
        },
    ];
    let doc = StyleDocument {
        name: "lakes".to_string(),
        geometry: GeometryKind::Polygon,
        body: StyleBody::Rules(rules),
    };

    let parsed = parse(&to_sld(&doc).unwrap());

    assert_eq!(attrs_of(&parsed, "StyledLayerDescriptor", "version"), vec!["1.1.0"]);
    assert_eq!(
        attrs_of(&parsed, "StyledLayerDescriptor", "xmlns:se"),
        vec!["http://www.opengis.net/se"]
    );
    assert_eq!(texts_of(&parsed, "se:Title"), vec!["0 - 5", "5 - 10"]);
    assert_eq!(
        parsed.elements.iter().filter(|e| *e == "se:Rule").count(),
        2
    );
    assert_eq!(
        parsed
            .elements
            .iter()
            .filter(|e| *e == "ogc:PropertyIsGreaterThanOrEqualTo")
            .count(),
        2
    );
    assert_eq!(
        parsed
            .elements
            .iter()
            .filter(|e| *e == "ogc:PropertyIsLessThan")
            .count(),
        1
    );
    assert_eq!(
        parsed
            .elements
            .iter()
            .filter(|e| *e == "ogc:PropertyIsLessThanOrEqualTo")
            .count(),
        1
    );
    assert_eq!(texts_of(&parsed, "ogc:Literal"), vec!["0", "5", "5", "10"]);
    assert_eq!(
        texts_of(&parsed, "se:SvgParameter"),
        vec!["#ff0000", "#000000", "1", "bevel", "#00ff00", "#000000", "1", "bevel"]
    );
}

#[test]
fn test_point_and_line_symbolizers() {
    let doc = StyleDocument {
        name: "wells".to_string(),
        geometry: GeometryKind::Point,
        body: StyleBody::Rules(vec![StyleRule {
            name: "Single symbol".to_string(),
            title: None,
            filter: None,
            symbolizer: Symbolizer::circle(Rgb::new(0x35, 0x79, 0xb1), 8.0),
        }]),
    };
    let parsed = parse(&to_sld(&doc).unwrap());
    assert_eq!(texts_of(&parsed, "se:WellKnownName"), vec!["circle"]);
    assert_eq!(texts_of(&parsed, "se:Size"), vec!["8"]);
    assert!(!parsed.elements.contains(&"ogc:Filter".to_string()));
    assert!(!parsed.elements.contains(&"se:Description".to_string()));

    let doc = StyleDocument {
        name: "roads".to_string(),
        geometry: GeometryKind::Line,
        body: StyleBody::Rules(vec![StyleRule {
            name: "motorway".to_string(),
            title: Some("motorway".to_string()),
            filter: Some(Filter::equal_to("class", ClassValue::Text("motorway".into()))),
            symbolizer: Symbolizer::Line {
                stroke: Stroke::new(Rgb::new(0xaa, 0xbb, 0xcc), 3.0),
            },
        }]),
    };
    let parsed = parse(&to_sld(&doc).unwrap());
    assert!(parsed.elements.contains(&"se:LineSymbolizer".to_string()));
    assert_eq!(texts_of(&parsed, "ogc:PropertyName"), vec!["class"]);
    assert_eq!(texts_of(&parsed, "ogc:Literal"), vec!["motorway"]);
    assert_eq!(attrs_of(&parsed, "se:SvgParameter", "name"), vec!["stroke", "stroke-width"]);
}
