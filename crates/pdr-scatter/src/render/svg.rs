use pdr_core::errors::LabError;

use super::{color_hex, project, PlotWriter};
use crate::config::OutputFormat;
use crate::spec::{PlotSpec, Point};

const MARGIN: f64 = 48.0;
const MARKER: f64 = 4.0;

/// Standalone SVG image with one marker per point.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgWriter;

struct Frame {
    width: f64,
    height: f64,
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Frame {
    fn of(spec: &PlotSpec) -> Self {
        let dpi = f64::from(spec.style.dpi);
        let (min_x, max_x, min_y, max_y) = spec.bounds();
        // Both axes share limits so the diagonal marks equal values.
        let low = min_x.min(min_y);
        let high = max_x.max(max_y);
        Self {
            width: spec.style.figsize[0] * dpi,
            height: spec.style.figsize[1] * dpi,
            min_x: low,
            max_x: high,
            min_y: low,
            max_y: high,
        }
    }

    fn place(&self, spec: &PlotSpec, point: &Point) -> (f64, f64) {
        let inner_w = (self.width - 2.0 * MARGIN).max(1.0);
        let inner_h = (self.height - 2.0 * MARGIN).max(1.0);
        let px = MARGIN + project(point.x, self.min_x, self.max_x, spec.scale) * inner_w;
        let py = self.height - MARGIN - project(point.y, self.min_y, self.max_y, spec.scale) * inner_h;
        (px, py)
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "&apos;")
}

fn marker(shape: char, x: f64, y: f64, fill: &str) -> String {
    let r = MARKER;
    match shape {
        'o' => format!("<circle cx='{x:.2}' cy='{y:.2}' r='{r:.2}' fill='#{fill}' />"),
        's' => format!(
            "<rect x='{:.2}' y='{:.2}' width='{:.2}' height='{:.2}' fill='#{fill}' />",
            x - r,
            y - r,
            2.0 * r,
            2.0 * r
        ),
        'x' => format!(
            "<path d='M{:.2} {:.2}L{:.2} {:.2}M{:.2} {:.2}L{:.2} {:.2}' stroke='#{fill}' />",
            x - r,
            y - r,
            x + r,
            y + r,
            x - r,
            y + r,
            x + r,
            y - r
        ),
        '+' => format!(
            "<path d='M{:.2} {y:.2}L{:.2} {y:.2}M{x:.2} {:.2}L{x:.2} {:.2}' stroke='#{fill}' />",
            x - r,
            x + r,
            y - r,
            y + r
        ),
        other => {
            let corners = match other {
                '^' => [(0.0, -r), (r, r), (-r, r)],
                'v' => [(0.0, r), (r, -r), (-r, -r)],
                '<' => [(-r, 0.0), (r, -r), (r, r)],
                '>' => [(r, 0.0), (-r, -r), (-r, r)],
                _ => return diamond(x, y, fill),
            };
            let points: Vec<String> = corners
                .iter()
                .map(|(dx, dy)| format!("{:.2},{:.2}", x + dx, y + dy))
                .collect();
            format!("<polygon points='{}' fill='#{fill}' />", points.join(" "))
        }
    }
}

fn diamond(x: f64, y: f64, fill: &str) -> String {
    let r = MARKER;
    format!(
        "<polygon points='{:.2},{:.2} {:.2},{:.2} {:.2},{:.2} {:.2},{:.2}' fill='#{fill}' />",
        x,
        y - r,
        x + r,
        y,
        x,
        y + r,
        x - r,
        y
    )
}

impl PlotWriter for SvgWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Svg
    }

    fn render(&self, spec: &PlotSpec) -> Result<Vec<u8>, LabError> {
        let frame = Frame::of(spec);
        let mut parts = vec![format!(
            "<svg xmlns='http://www.w3.org/2000/svg' width='{w:.0}' height='{h:.0}'>",
            w = frame.width,
            h = frame.height
        )];
        parts.push(format!(
            "<rect x='{m}' y='{m}' width='{:.2}' height='{:.2}' fill='none' stroke='#000000' />",
            frame.width - 2.0 * MARGIN,
            frame.height - 2.0 * MARGIN,
            m = MARGIN
        ));
        let (x0, y0) = frame.place(spec, &Point { x: frame.min_x, y: frame.min_y });
        let (x1, y1) = frame.place(spec, &Point { x: frame.max_x, y: frame.max_y });
        parts.push(format!(
            "<line x1='{x0:.2}' y1='{y0:.2}' x2='{x1:.2}' y2='{y1:.2}' stroke='#999999' stroke-dasharray='4 4' />"
        ));
        if !spec.title.is_empty() {
            parts.push(format!(
                "<text x='{:.2}' y='{:.2}' text-anchor='middle'>{}</text>",
                frame.width / 2.0,
                MARGIN / 2.0,
                escape(&spec.title)
            ));
        }
        parts.push(format!(
            "<text x='{:.2}' y='{:.2}' text-anchor='middle'>{}</text>",
            frame.width / 2.0,
            frame.height - MARGIN / 3.0,
            escape(&spec.x_axis.label)
        ));
        parts.push(format!(
            "<text x='{:.2}' y='{:.2}' text-anchor='middle' transform='rotate(-90 {:.2} {:.2})'>{}</text>",
            MARGIN / 3.0,
            frame.height / 2.0,
            MARGIN / 3.0,
            frame.height / 2.0,
            escape(&spec.y_axis.label)
        ));
        for series in &spec.series {
            let fill = color_hex(&series.style.color);
            parts.push(format!("<g class='{}'>", escape(&series.category.to_string())));
            for point in &series.points {
                let (px, py) = frame.place(spec, point);
                parts.push(marker(series.style.shape, px, py, fill));
            }
            parts.push("</g>".into());
        }
        if spec.has_multiple_categories() {
            for (idx, series) in spec.series.iter().enumerate() {
                let y = MARGIN + 14.0 * (idx as f64 + 1.0);
                let x = frame.width - MARGIN - 96.0;
                parts.push(marker(series.style.shape, x, y - MARKER, color_hex(&series.style.color)));
                parts.push(format!(
                    "<text x='{:.2}' y='{y:.2}' font-size='10'>{}</text>",
                    x + 8.0,
                    escape(&series.category.to_string())
                ));
            }
        }
        parts.push("</svg>".into());
        Ok(parts.join("").into_bytes())
    }
}
