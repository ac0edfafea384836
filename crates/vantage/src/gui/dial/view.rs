use super::{LABEL_FONT, LABEL_FONT_SIZE, LINE_WIDTH, OUTLINE_WIDTH};
use crate::gui::theme::ThemeColors;
use bearing::Point;
use bearing::scene::{DirectionLine, LabelRole, LineKind, PlacedLabel, Scene};
use cairo::Context;
use palette::Srgba;
use std::f64::consts::PI;

fn set_source(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

fn stroke_line(cr: &Context, from: Point, to: Point) -> Result<(), cairo::Error> {
    cr.move_to(from.x, from.y);
    cr.line_to(to.x, to.y);
    cr.stroke()
}

struct LineRenderer<'a> {
    line: &'a DirectionLine,
    center: Point,
}

impl<'a> LineRenderer<'a> {
    fn new(line: &'a DirectionLine, center: Point) -> Self {
        Self { line, center }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        cr.save()?;
        set_source(cr, self.color(colors));
        cr.set_line_width(LINE_WIDTH);
        cr.set_line_cap(cairo::LineCap::Round);
        if self.line.kind == LineKind::Hint {
            cr.set_dash(&[6.0, 6.0], 0.0);
        }
        stroke_line(cr, self.center, self.line.end)?;
        cr.restore()
    }

    fn color(&self, colors: &ThemeColors) -> Srgba<f64> {
        match self.line.kind {
            LineKind::Hint => colors.hint,
            LineKind::Pending => colors.pending,
            LineKind::Showcase => colors.showcase,
        }
    }
}

fn draw_circle(cr: &Context, scene: &Scene, colors: &ThemeColors) -> Result<(), cairo::Error> {
    set_source(cr, colors.outline);
    cr.set_line_width(OUTLINE_WIDTH);
    cr.new_sub_path();
    cr.arc(scene.center.x, scene.center.y, scene.radius, 0.0, 2.0 * PI);
    cr.stroke()?;

    // north reference
    stroke_line(cr, scene.center, scene.north)
}

fn draw_label(
    cr: &Context,
    label: &PlacedLabel,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_source(cr, colors.label);
    let weight = match label.role {
        LabelRole::Target => cairo::FontWeight::Bold,
        LabelRole::Origin | LabelRole::Facing => cairo::FontWeight::Normal,
    };
    cr.select_font_face(LABEL_FONT, cairo::FontSlant::Normal, weight);
    cr.set_font_size(LABEL_FONT_SIZE);

    let text = label.text.as_str();
    let ext = cr.text_extents(text)?;
    cr.move_to(
        label.position.x - (ext.width() / 2.0 + ext.x_bearing()),
        label.position.y - (ext.height() / 2.0 + ext.y_bearing()),
    );
    cr.show_text(text)
}

pub fn draw(cr: &Context, scene: &Scene, colors: &ThemeColors) -> Result<(), cairo::Error> {
    draw_circle(cr, scene, colors)?;

    for line in &scene.lines {
        LineRenderer::new(line, scene.center).draw(cr, colors)?;
    }
    for label in &scene.labels {
        draw_label(cr, label, colors)?;
    }
    Ok(())
}
