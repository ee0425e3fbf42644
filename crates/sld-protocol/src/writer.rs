//! SLD serialization.
//!
//! Raster styles are written as SLD 1.0.0, feature styles as SLD 1.1.0 with
//! Symbology Encoding (`se:`) elements. The element layout is fixed; the
//! server parses it strictly.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use sld_common::{StyleError, StyleResult};

use crate::document::{
    ColorMap, RasterStyle, StyleBody, StyleDocument, StyleRule, Stroke, Symbolizer,
};
use crate::filter::Filter;

/// MIME type under which the catalog accepts SLD bodies.
pub const SLD_CONTENT_TYPE: &str = "application/vnd.ogc.sld+xml";

const SLD_NS: &str = "http://www.opengis.net/sld";
const OGC_NS: &str = "http://www.opengis.net/ogc";
const GML_NS: &str = "http://www.opengis.net/gml";
const SE_NS: &str = "http://www.opengis.net/se";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SLD_11_SCHEMA: &str =
    "http://www.opengis.net/sld http://schemas.opengis.net/sld/1.1.0/StyledLayerDescriptor.xsd";

/// Serialize a validated document to SLD XML.
pub fn to_sld(doc: &StyleDocument) -> StyleResult<String> {
    doc.validate()?;

    let mut w = SldWriter::new();
    w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    match &doc.body {
        StyleBody::Raster(raster) => write_raster(&mut w, &doc.name, raster)?,
        StyleBody::Rules(rules) => write_features(&mut w, &doc.name, rules)?,
    }

    w.finish()
}

fn write_raster(w: &mut SldWriter, name: &str, raster: &RasterStyle) -> StyleResult<()> {
    w.start(
        "StyledLayerDescriptor",
        &[
            ("xmlns", SLD_NS),
            ("xmlns:ogc", OGC_NS),
            ("xmlns:gml", GML_NS),
            ("version", "1.0.0"),
        ],
    )?;
    w.start("NamedLayer", &[])?;
    w.text_element("Name", name)?;
    w.start("UserStyle", &[])?;
    w.text_element("Name", name)?;
    w.start("FeatureTypeStyle", &[])?;
    w.start("Rule", &[])?;
    w.start("RasterSymbolizer", &[])?;

    w.start("ChannelSelection", &[])?;
    w.start("GrayChannel", &[])?;
    w.text_element("SourceChannelName", &raster.channel.to_string())?;
    w.end("GrayChannel")?;
    w.end("ChannelSelection")?;

    write_color_map(w, &raster.color_map)?;

    w.end("RasterSymbolizer")?;
    w.end("Rule")?;
    w.end("FeatureTypeStyle")?;
    w.end("UserStyle")?;
    w.end("NamedLayer")?;
    w.end("StyledLayerDescriptor")
}

fn write_color_map(w: &mut SldWriter, color_map: &ColorMap) -> StyleResult<()> {
    w.start("ColorMap", &[("type", color_map.kind.as_str())])?;
    for entry in &color_map.entries {
        let color = entry.color.to_hex();
        let quantity = entry.quantity.to_string();
        let opacity = entry.opacity.map(|o| o.to_string());

        let mut attrs = vec![
            ("color", color.as_str()),
            ("quantity", quantity.as_str()),
            ("label", entry.label.as_str()),
        ];
        if let Some(opacity) = &opacity {
            attrs.push(("opacity", opacity.as_str()));
        }
        w.empty("ColorMapEntry", &attrs)?;
    }
    w.end("ColorMap")
}

fn write_features(w: &mut SldWriter, name: &str, rules: &[StyleRule]) -> StyleResult<()> {
    w.start(
        "StyledLayerDescriptor",
        &[
            ("xmlns", SLD_NS),
            ("xmlns:ogc", OGC_NS),
            ("xmlns:se", SE_NS),
            ("xmlns:xlink", XLINK_NS),
            ("xmlns:xsi", XSI_NS),
            ("xsi:schemaLocation", SLD_11_SCHEMA),
            ("version", "1.1.0"),
        ],
    )?;
    w.start("NamedLayer", &[])?;
    w.text_element("se:Name", name)?;
    w.start("UserStyle", &[])?;
    w.text_element("se:Name", name)?;
    w.start("se:FeatureTypeStyle", &[])?;

    for rule in rules {
        write_rule(w, rule)?;
    }

    w.end("se:FeatureTypeStyle")?;
    w.end("UserStyle")?;
    w.end("NamedLayer")?;
    w.end("StyledLayerDescriptor")
}

fn write_rule(w: &mut SldWriter, rule: &StyleRule) -> StyleResult<()> {
    w.start("se:Rule", &[])?;
    w.text_element("se:Name", &rule.name)?;
    if let Some(title) = &rule.title {
        w.start("se:Description", &[])?;
        w.text_element("se:Title", title)?;
        w.end("se:Description")?;
    }
    if let Some(filter) = &rule.filter {
        w.start("ogc:Filter", &[])?;
        write_filter(w, filter)?;
        w.end("ogc:Filter")?;
    }
    write_symbolizer(w, &rule.symbolizer)?;
    w.end("se:Rule")
}

fn write_filter(w: &mut SldWriter, filter: &Filter) -> StyleResult<()> {
    match filter {
        Filter::Compare {
            op,
            property,
            literal,
        } => {
            w.start(op.element_name(), &[])?;
            w.text_element("ogc:PropertyName", property)?;
            w.text_element("ogc:Literal", &literal.to_string())?;
            w.end(op.element_name())
        }
        Filter::And(filters) => {
            w.start("ogc:And", &[])?;
            for f in filters {
                write_filter(w, f)?;
            }
            w.end("ogc:And")
        }
    }
}

fn write_symbolizer(w: &mut SldWriter, symbolizer: &Symbolizer) -> StyleResult<()> {
    match symbolizer {
        Symbolizer::Point { mark, fill, size } => {
            w.start("se:PointSymbolizer", &[])?;
            w.start("se:Graphic", &[])?;
            w.start("se:Mark", &[])?;
            w.text_element("se:WellKnownName", mark)?;
            write_fill(w, &fill.to_hex())?;
            w.end("se:Mark")?;
            w.text_element("se:Size", &size.to_string())?;
            w.end("se:Graphic")?;
            w.end("se:PointSymbolizer")
        }
        Symbolizer::Line { stroke } => {
            w.start("se:LineSymbolizer", &[])?;
            write_stroke(w, stroke)?;
            w.end("se:LineSymbolizer")
        }
        Symbolizer::Polygon { fill, stroke } => {
            w.start("se:PolygonSymbolizer", &[])?;
            if let Some(fill) = fill {
                write_fill(w, &fill.to_hex())?;
            }
            if let Some(stroke) = stroke {
                write_stroke(w, stroke)?;
            }
            w.end("se:PolygonSymbolizer")
        }
    }
}

fn write_fill(w: &mut SldWriter, color: &str) -> StyleResult<()> {
    w.start("se:Fill", &[])?;
    w.svg_parameter("fill", color)?;
    w.end("se:Fill")
}

fn write_stroke(w: &mut SldWriter, stroke: &Stroke) -> StyleResult<()> {
    w.start("se:Stroke", &[])?;
    w.svg_parameter("stroke", &stroke.color.to_hex())?;
    w.svg_parameter("stroke-width", &stroke.width.to_string())?;
    if let Some(linejoin) = &stroke.linejoin {
        w.svg_parameter("stroke-linejoin", linejoin)?;
    }
    w.end("se:Stroke")
}

/// Thin wrapper over an indenting `quick_xml::Writer` mapping errors into
/// `StyleError::Serialization`.
struct SldWriter {
    inner: Writer<Vec<u8>>,
}

impl SldWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> StyleResult<()> {
        self.inner
            .write_event(event)
            .map_err(|e| StyleError::Serialization(e.to_string()))
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> StyleResult<()> {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        self.event(Event::Start(elem))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> StyleResult<()> {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        self.event(Event::Empty(elem))
    }

    fn end(&mut self, name: &str) -> StyleResult<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> StyleResult<()> {
        self.start(name, &[])?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn svg_parameter(&mut self, name: &str, value: &str) -> StyleResult<()> {
        self.start("se:SvgParameter", &[("name", name)])?;
        self.event(Event::Text(BytesText::new(value)))?;
        self.end("se:SvgParameter")
    }

    fn finish(self) -> StyleResult<String> {
        String::from_utf8(self.inner.into_inner())
            .map_err(|e| StyleError::Serialization(e.to_string()))
    }
}
