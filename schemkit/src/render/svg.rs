//! SVG backend for [`Scene`]

use std::fmt::{self, Write};

use super::{Item, Layer, Primitive, Scene, TextAnchor};

/// Serialize a scene to a standalone SVG document
pub fn to_svg(scene: &Scene) -> String {
    let mut svg = String::new();
    // fmt::Write for String is infallible
    let _ = write_svg(&mut svg, scene);
    svg
}

pub fn write_svg<W: Write>(out: &mut W, scene: &Scene) -> fmt::Result {
    write!(
        out,
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}" font-family="Inter, system-ui, sans-serif">
  <rect width="100%" height="100%" fill="{}" />
"##,
        scene.width,
        scene.height,
        scene.width,
        scene.height,
        escape_xml_attr(&scene.background)
    )?;

    for item in scene.items() {
        write_item(out, item)?;
    }

    out.write_str("</svg>\n")
}

fn write_item<W: Write>(out: &mut W, item: &Item) -> fmt::Result {
    let class = layer_attrs(&item.layer);
    match &item.primitive {
        Primitive::Line {
            from,
            to,
            stroke,
            width,
            dashed,
        } => writeln!(
            out,
            "  <line{} x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"{}\"{} />",
            class,
            from.x,
            from.y,
            to.x,
            to.y,
            escape_xml_attr(stroke),
            width,
            dash_attr(*dashed)
        ),
        Primitive::Polyline {
            points,
            stroke,
            width,
        } => {
            let points = points
                .iter()
                .map(|p| format!("{:.1},{:.1}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(
                out,
                "  <polyline{} points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linejoin=\"round\" />",
                class,
                points,
                escape_xml_attr(stroke),
                width
            )
        }
        Primitive::Curve {
            from,
            ctrl1,
            ctrl2,
            to,
            stroke,
            width,
        } => writeln!(
            out,
            "  <path{} d=\"M {:.1} {:.1} C {:.1} {:.1}, {:.1} {:.1}, {:.1} {:.1}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" />",
            class,
            from.x,
            from.y,
            ctrl1.x,
            ctrl1.y,
            ctrl2.x,
            ctrl2.y,
            to.x,
            to.y,
            escape_xml_attr(stroke),
            width
        ),
        Primitive::Rect {
            rect,
            stroke,
            fill,
            radius,
            width,
            dashed,
        } => writeln!(
            out,
            "  <rect{} x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" rx=\"{}\" ry=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"{} />",
            class,
            rect.x,
            rect.y,
            rect.width,
            rect.height,
            radius,
            radius,
            fill.as_deref().map(escape_xml_attr).unwrap_or_else(|| "none".to_string()),
            escape_xml_attr(stroke),
            width,
            dash_attr(*dashed)
        ),
        Primitive::Circle {
            center,
            radius,
            stroke,
            fill,
        } => writeln!(
            out,
            "  <circle{} cx=\"{:.1}\" cy=\"{:.1}\" r=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.5\" />",
            class,
            center.x,
            center.y,
            radius,
            fill.as_deref().map(escape_xml_attr).unwrap_or_else(|| "none".to_string()),
            escape_xml_attr(stroke)
        ),
        Primitive::Text {
            at,
            text,
            size,
            color,
            anchor,
        } => writeln!(
            out,
            "  <text{} x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"{}\" text-anchor=\"{}\" dominant-baseline=\"middle\">{}</text>",
            class,
            at.x,
            at.y,
            escape_xml_attr(color),
            size,
            anchor_name(*anchor),
            escape_xml_text(text)
        ),
    }
}

fn layer_attrs(layer: &Layer) -> String {
    let (class, id) = match *layer {
        Layer::Grid => ("grid", None),
        Layer::Wire(id) => ("wire", Some(id)),
        Layer::Body(id) => ("component", Some(id)),
        Layer::Selection(id) => ("selection", Some(id)),
        Layer::Pin(id) => ("pin", Some(id)),
        Layer::PinLabel(id) => ("pin-label", Some(id)),
        Layer::Measurement(id) => ("measurement", Some(id)),
        Layer::Preview => ("preview", None),
    };
    match id {
        Some(id) => format!(" class=\"{}\" data-id=\"{}\"", class, id),
        None => format!(" class=\"{}\"", class),
    }
}

fn dash_attr(dashed: bool) -> &'static str {
    if dashed {
        " stroke-dasharray=\"6 4\""
    } else {
        ""
    }
}

fn anchor_name(anchor: TextAnchor) -> &'static str {
    match anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    }
}

/// Escape text content (inside elements)
pub fn escape_xml_text(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape a double-quoted attribute value
pub fn escape_xml_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}
