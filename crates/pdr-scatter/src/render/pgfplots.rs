use std::fmt::Write as _;

use pdr_core::errors::{ErrorInfo, LabError};

use super::{color_hex, PlotWriter};
use crate::config::{OutputFormat, Scale};
use crate::spec::PlotSpec;

/// pgfplots `tikzpicture` for inclusion in LaTeX documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgfplotsWriter;

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '_' | '%' | '&' | '#' | '$' | '{' | '}' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn axis_mode(scale: Scale) -> &'static str {
    match scale {
        Scale::Log => "log",
        // pgfplots has no symmetric log mode.
        Scale::Linear | Scale::Symlog => "normal",
    }
}

fn mark(shape: char) -> &'static str {
    match shape {
        'x' => "mark=x",
        '+' => "mark=+",
        'o' => "mark=o",
        's' => "mark=square",
        '^' => "mark=triangle",
        'v' => "mark=triangle, mark options={rotate=180}",
        '<' => "mark=triangle, mark options={rotate=90}",
        '>' => "mark=triangle, mark options={rotate=270}",
        _ => "mark=diamond",
    }
}

fn render_tex(spec: &PlotSpec) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let mut colors: Vec<&str> = spec.series.iter().map(|s| s.style.color.as_str()).collect();
    colors.sort();
    colors.dedup();
    for color in colors {
        writeln!(
            out,
            "\\definecolor{{{color}}}{{HTML}}{{{}}}",
            color_hex(color).to_uppercase()
        )?;
    }
    writeln!(out, "\\begin{{tikzpicture}}")?;
    writeln!(out, "\\begin{{axis}}[")?;
    writeln!(out, "  width={}in, height={}in,", spec.style.figsize[0], spec.style.figsize[1])?;
    writeln!(out, "  xmode={mode}, ymode={mode},", mode = axis_mode(spec.scale))?;
    writeln!(out, "  xlabel={{{}}}, ylabel={{{}}},", escape(&spec.x_axis.label), escape(&spec.y_axis.label))?;
    if !spec.title.is_empty() {
        writeln!(out, "  title={{{}}},", escape(&spec.title))?;
    }
    if spec.has_multiple_categories() {
        writeln!(out, "  legend pos=outer north east,")?;
    }
    writeln!(out, "]")?;
    for series in &spec.series {
        writeln!(
            out,
            "\\addplot[only marks, color={}, {}] coordinates {{",
            series.style.color,
            mark(series.style.shape)
        )?;
        for point in &series.points {
            writeln!(out, "  ({}, {})", point.x, point.y)?;
        }
        writeln!(out, "}};")?;
        if spec.has_multiple_categories() {
            writeln!(out, "\\addlegendentry{{{}}}", escape(&series.category.to_string()))?;
        }
    }
    let (min_x, max_x, min_y, max_y) = spec.bounds();
    writeln!(
        out,
        "\\addplot[gray, dashed, domain={}:{}] {{x}};",
        min_x.min(min_y),
        max_x.max(max_y)
    )?;
    writeln!(out, "\\end{{axis}}")?;
    writeln!(out, "\\end{{tikzpicture}}")?;
    Ok(out)
}

impl PlotWriter for PgfplotsWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Tex
    }

    fn render(&self, spec: &PlotSpec) -> Result<Vec<u8>, LabError> {
        render_tex(spec)
            .map(String::into_bytes)
            .map_err(|err| LabError::Render(ErrorInfo::new("render.tex", err.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latex_specials_are_escaped() {
        assert_eq!(escape("layer_size_total"), "layer\\_size\\_total");
        assert_eq!(escape("50%"), "50\\%");
    }

    #[test]
    fn symlog_falls_back_to_normal_axes() {
        assert_eq!(axis_mode(Scale::Symlog), "normal");
        assert_eq!(axis_mode(Scale::Log), "log");
    }
}
