//! SVG output: path data for routed edges and a standalone document for a whole
//! [`RenderModel`](crate::model::RenderModel).

use crate::config::LayoutConfig;
use crate::model::{PanelDescription, PanelName, PathKind, PathSegment, RenderModel};
use std::fmt::Write as _;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Root element id.
    pub diagram_id: Option<String>,
    /// Horizontal gap between the graph and the info panel.
    pub panel_gap: f64,
    /// Width reserved for the info panel.
    pub panel_width: f64,
    pub font_size: f64,
    /// Changes to draw in their highlighted style.
    pub highlighted: Vec<String>,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            panel_gap: 8.0,
            panel_width: 320.0,
            font_size: 12.0,
            highlighted: Vec::new(),
        }
    }
}

/// SVG path data (`d` attribute) for a segment list.
pub fn path_data(segments: &[PathSegment]) -> String {
    let mut out = String::new();
    for seg in segments {
        if !out.is_empty() {
            out.push(' ');
        }
        match *seg {
            PathSegment::MoveTo { to } => {
                let _ = write!(&mut out, "M {} {}", fmt(to.x), fmt(to.y));
            }
            PathSegment::LineTo { to } => {
                let _ = write!(&mut out, "L {} {}", fmt(to.x), fmt(to.y));
            }
            PathSegment::Arc { radius, sweep, to } => {
                let _ = write!(
                    &mut out,
                    "A {r} {r} 0 0 {flag} {x} {y}",
                    r = fmt(radius),
                    flag = sweep.svg_flag(),
                    x = fmt(to.x),
                    y = fmt(to.y)
                );
            }
        }
    }
    out
}

fn css(config: &LayoutConfig, font_size: f64) -> String {
    format!(
        ".edge{{fill:none;stroke:{normal};stroke-width:1.5}}\
.node{{stroke-width:1.5}}\
.node.highlighted{{stroke-width:3}}\
.entry{{font-size:{fs}px;fill:{normal}}}\
.entry.clickable{{cursor:pointer}}\
.entry.highlighted{{font-weight:bold}}\
.entry.conflict{{fill:{conflict}}}\
.prefix{{font-weight:bold}}\
.suffix{{opacity:0.6}}\
.placeholder{{font-style:italic;opacity:0.5}}",
        normal = config.theme.normal,
        conflict = config.theme.conflict,
        fs = fmt(font_size),
    )
}

/// Renders the graph on the left and the info panel to its right.
pub fn render_svg(
    model: &RenderModel,
    config: &LayoutConfig,
    options: &SvgRenderOptions,
) -> String {
    let diagram_id = options.diagram_id.as_deref().unwrap_or("changeviz");
    let is_highlighted = |id: &str| options.highlighted.iter().any(|h| h == id);

    let panel_x = model.canvas.width + options.panel_gap;
    let panel_bottom = model
        .panel
        .iter()
        .map(|p| p.top + p.height)
        .fold(0.0_f64, f64::max);
    let width = panel_x + options.panel_width;
    let height = model.canvas.height.max(panel_bottom);

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="background-color: {bg};">"#,
        id = escape_attr(diagram_id),
        w = fmt(width),
        h = fmt(height),
        bg = escape_attr(&config.theme.background),
    );
    let _ = write!(
        &mut out,
        "<style>{}</style>",
        escape_xml(&css(config, options.font_size))
    );

    out.push_str(r#"<g class="edges">"#);
    for e in &model.edges {
        let kind = match e.kind {
            PathKind::Straight => "straight",
            PathKind::Orthogonal => "orthogonal",
        };
        let _ = write!(
            &mut out,
            r#"<path d="{d}" class="edge edge-{kind}" data-from="{from}" data-to="{to}"/>"#,
            d = escape_attr(&e.d),
            from = escape_attr(&e.from),
            to = escape_attr(&e.to),
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="nodes">"#);
    for n in &model.nodes {
        let mut class = String::from("node");
        if n.clickable {
            class.push_str(" clickable");
        }
        if is_highlighted(&n.id) {
            class.push_str(" highlighted");
        }
        let _ = write!(
            &mut out,
            r#"<circle cx="{x}" cy="{y}" r="{r}" fill="{fill}" stroke="{stroke}" class="{class}" data-change-id="{id}"/>"#,
            x = fmt(n.x),
            y = fmt(n.y),
            r = fmt(config.node_radius),
            fill = escape_attr(&n.style.fill),
            stroke = escape_attr(&n.style.stroke),
            id = escape_attr(&n.id),
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="panel">"#);
    for p in &model.panel {
        let mut class = String::from("entry");
        if p.clickable {
            class.push_str(" clickable");
        }
        if p.has_conflict {
            class.push_str(" conflict");
        }
        if is_highlighted(&p.id) {
            class.push_str(" highlighted");
        }
        let _ = write!(
            &mut out,
            r#"<g class="{class}" data-change-id="{id}">"#,
            id = escape_attr(&p.id),
        );
        if let Some(t) = &p.tooltip {
            let _ = write!(&mut out, "<title>{}</title>", escape_xml(t));
        }
        let _ = write!(
            &mut out,
            r#"<text x="{x}" y="{y}" dominant-baseline="middle">"#,
            x = fmt(panel_x),
            y = fmt(p.top + p.height / 2.0),
        );
        match &p.name {
            PanelName::Verbatim { text } => {
                let _ = write!(
                    &mut out,
                    r#"<tspan class="name">{}</tspan>"#,
                    escape_xml(text)
                );
            }
            PanelName::Split { prefix, suffix } => {
                let _ = write!(
                    &mut out,
                    r#"<tspan class="prefix">{}</tspan><tspan class="suffix">{}</tspan>"#,
                    escape_xml(prefix),
                    escape_xml(suffix)
                );
            }
        }
        match &p.description {
            PanelDescription::Hidden => {}
            PanelDescription::Text { text } => {
                let _ = write!(
                    &mut out,
                    r#"<tspan class="description" dx="8">{}</tspan>"#,
                    escape_xml(text)
                );
            }
            PanelDescription::Placeholder { text } => {
                let _ = write!(
                    &mut out,
                    r#"<tspan class="placeholder" dx="8">{}</tspan>"#,
                    escape_xml(text)
                );
            }
        }
        out.push_str("</text></g>");
    }
    out.push_str("</g>");

    out.push_str("</svg>");
    out
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal form without `-0` or tiny float noise.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArcSweep, Point};

    #[test]
    fn path_data_formats_lines_and_arcs() {
        let d = path_data(&[
            PathSegment::MoveTo {
                to: Point::new(16.0, 40.0),
            },
            PathSegment::LineTo {
                to: Point::new(12.0, 40.0),
            },
            PathSegment::Arc {
                radius: 4.0,
                sweep: ArcSweep::CounterClockwise,
                to: Point::new(8.0, 36.0),
            },
            PathSegment::LineTo {
                to: Point::new(8.0, 20.0),
            },
        ]);
        assert_eq!(d, "M 16 40 L 12 40 A 4 4 0 0 0 8 36 L 8 20");
    }

    #[test]
    fn fmt_drops_float_noise() {
        assert_eq!(fmt(2.0000000001), "2");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(7.25), "7.25");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn escape_xml_covers_markup_characters() {
        assert_eq!(
            escape_xml(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }
}
