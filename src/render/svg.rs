//! SVG output - the same layout as the raster path, as vector rectangles

use std::fmt::{self, Write};

use super::{layout, HumanReadable, Layout, RenderOptions, Rotation};
use crate::error::RenderError;
use crate::pattern::WidthSequence;

/// Vector rendition without a human-readable text; only an alternate label is drawn.
pub fn render_svg(sequence: &WidthSequence, options: &RenderOptions) -> Result<String, RenderError> {
    render_svg_labelled(sequence, None, options)
}

pub fn render_svg_labelled(
    sequence: &WidthSequence,
    text: Option<&HumanReadable>,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let layout = layout(sequence, text, options)?;
    let mut out = String::new();
    write_document(&mut out, &layout, options)?;
    Ok(out)
}

fn write_document(out: &mut String, layout: &Layout, options: &RenderOptions) -> fmt::Result {
    let (w, h) = (layout.width, layout.height);
    let (outer_w, outer_h) = if options.rotation.swaps_axes() { (h, w) } else { (w, h) };
    let transform = match options.rotation {
        Rotation::None => String::new(),
        Rotation::Quarter => format!(" transform=\"translate({} 0) rotate(90)\"", h),
        Rotation::Half => format!(" transform=\"translate({} {}) rotate(180)\"", w, h),
        Rotation::ThreeQuarter => format!(" transform=\"translate(0 {}) rotate(270)\"", w),
    };

    writeln!(out, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>")?;
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{0}\" height=\"{1}\" viewBox=\"0 0 {0} {1}\" stroke=\"none\">",
        outer_w, outer_h
    )?;
    writeln!(out, "\t<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>", options.background)?;
    writeln!(out, "\t<g fill=\"{}\"{}>", options.foreground, transform)?;

    let mut path = String::new();
    for rect in &layout.rects {
        if !path.is_empty() {
            path.push(' ');
        }
        write!(path, "M{},{}h{}v{}h-{}z", rect.x, rect.y, rect.width, rect.height, rect.width)?;
    }
    if !path.is_empty() {
        writeln!(out, "\t\t<path d=\"{}\"/>", path)?;
    }

    if let Some(label) = &layout.label {
        for run in &label.runs {
            let run_width = label.font.text_width(&run.text);
            let clip = if run.x + run_width > w {
                format!(" textLength=\"{}\" lengthAdjust=\"spacingAndGlyphs\"", w - run.x)
            } else {
                String::new()
            };
            writeln!(
                out,
                "\t\t<text x=\"{}\" y=\"{}\" font-family=\"monospace\" font-size=\"{}\" dominant-baseline=\"hanging\"{}>{}</text>",
                run.x,
                label.y,
                label.font.char_height(),
                clip,
                escape(&run.text)
            )?;
        }
    }

    writeln!(out, "\t</g>")?;
    writeln!(out, "</svg>")
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c if c.is_control() => escaped.push(' '),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Module;
    use crate::render::{Alignment, LabelFont, LabelGroup, LabelPosition, Scale};

    fn sequence() -> WidthSequence {
        WidthSequence::from_checked(vec![Module::space(2), Module::bar(3), Module::space(2)], 2)
    }

    #[test]
    fn test_svg_header_and_bar() {
        let opts = RenderOptions { scale: Scale::BarWidth(1), height_px: 5, ..RenderOptions::default() };
        let svg = render_svg(&sequence(), &opts).unwrap();
        assert!(svg.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(svg.contains("width=\"7\" height=\"5\""));
        assert!(svg.contains("M2,0h3v5h-3z"));
        assert!(!svg.contains("<text"));
    }

    #[test]
    fn test_svg_rotation_swaps_size() {
        let opts = RenderOptions {
            scale: Scale::BarWidth(1),
            height_px: 5,
            rotation: Rotation::Quarter,
            ..RenderOptions::default()
        };
        let svg = render_svg(&sequence(), &opts).unwrap();
        assert!(svg.contains("width=\"5\" height=\"7\""));
        assert!(svg.contains("rotate(90)"));
    }

    #[test]
    fn test_svg_top_label_and_alignment() {
        let opts = RenderOptions {
            scale: Scale::BarWidth(1),
            height_px: 5,
            image_width: Some(11),
            alignment: Alignment::Right,
            label_position: LabelPosition::TopCenter,
            label: Some("X".into()),
            ..RenderOptions::default()
        };
        let svg = render_svg(&sequence(), &opts).unwrap();
        let top = LabelFont::Small.char_height() + 2;
        assert!(svg.contains(&format!("M6,{}h3v5h-3z", top)));
        assert!(svg.contains("<text x=\"4\" y=\"0\""));
    }

    #[test]
    fn test_svg_writes_each_label_group() {
        let readable = HumanReadable::Groups(vec![
            LabelGroup { text: "1".into(), start_unit: 0, end_unit: 2 },
            LabelGroup { text: "2".into(), start_unit: 5, end_unit: 7 },
        ]);
        let opts = RenderOptions { scale: Scale::BarWidth(6), height_px: 5, ..RenderOptions::default() };
        let svg = render_svg_labelled(&sequence(), Some(&readable), &opts).unwrap();
        assert_eq!(svg.matches("<text").count(), 2);
        assert!(svg.contains("<text x=\"3\""));
        assert!(svg.contains("<text x=\"33\""));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_svg_label_escaped() {
        let opts = RenderOptions { label: Some("A<B".into()), ..RenderOptions::default() };
        let svg = render_svg(&sequence(), &opts).unwrap();
        assert!(svg.contains("A&lt;B"));
    }
}
