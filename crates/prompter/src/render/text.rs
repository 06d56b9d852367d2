use std::sync::Arc;

use eframe::egui::{self, Color32, FontFamily, FontId, Galley, Pos2, Rect};

use crate::theme::Theme;

/// Fraction of the viewport height where the reading guide sits.
pub const GUIDE_FRACTION: f32 = 0.33;
/// Horizontal margin as a fraction of the viewport width.
const SIDE_MARGIN: f32 = 0.08;

/// A laid-out script plus the padding that lets the first line start at, and
/// the last line finish on, the reading guide.
pub struct ScriptLayout {
    pub galley: Arc<Galley>,
    pub lead_in: f32,
    pub lead_out: f32,
    pub left: f32,
}

impl ScriptLayout {
    /// Total scrollable height. Scrolling by exactly the galley height moves
    /// the last line from below the guide up onto it.
    pub fn content_height(&self) -> f32 {
        self.lead_in + self.galley.rect.height() + self.lead_out
    }
}

pub fn script_job(
    text: &str,
    font_size: f32,
    line_spacing: f32,
    color: Color32,
    max_width: f32,
) -> egui::text::LayoutJob {
    let mut job = egui::text::LayoutJob::default();
    job.wrap.max_width = max_width;
    job.halign = egui::Align::LEFT;
    let format = egui::text::TextFormat {
        font_id: FontId::new(font_size, FontFamily::Proportional),
        color,
        line_height: Some(font_size * line_spacing),
        ..Default::default()
    };
    job.append(text, 0.0, format);
    job
}

pub fn layout_script(
    ui: &egui::Ui,
    text: &str,
    theme: &Theme,
    font_size: f32,
    rect: Rect,
    opacity: f32,
) -> ScriptLayout {
    let margin = rect.width() * SIDE_MARGIN;
    let width = (rect.width() - margin * 2.0).max(font_size);
    let color = Theme::with_opacity(theme.foreground, opacity);
    let job = script_job(text, font_size, theme.line_spacing, color, width);
    let galley = ui.painter().layout_job(job);
    ScriptLayout {
        galley,
        lead_in: rect.height() * GUIDE_FRACTION,
        lead_out: rect.height() * (1.0 - GUIDE_FRACTION),
        left: rect.left() + margin,
    }
}

/// Paint the script scrolled by `scroll_top`, clipped to `rect`.
pub fn paint_script(ui: &egui::Ui, layout: &ScriptLayout, rect: Rect, scroll_top: f32, mirrored: bool) {
    let painter = ui.painter_at(rect);
    let pos = egui::pos2(layout.left, rect.top() + layout.lead_in - scroll_top);
    if mirrored {
        paint_mirrored(&painter, &layout.galley, pos, rect.center().x);
    } else {
        painter.galley(pos, layout.galley.clone(), Color32::PLACEHOLDER);
    }
}

/// Paint a galley flipped horizontally around `axis_x`, as seen through a
/// beam-splitter glass.
fn paint_mirrored(painter: &egui::Painter, galley: &Galley, pos: Pos2, axis_x: f32) {
    let mut mesh = egui::Mesh::with_texture(egui::TextureId::default());
    for placed in &galley.rows {
        let offset = pos.to_vec2() + placed.pos.to_vec2();
        let row_mesh = &placed.row.visuals.mesh;
        let base = mesh.vertices.len() as u32;
        mesh.vertices.extend(row_mesh.vertices.iter().map(|v| {
            let p = v.pos + offset;
            egui::epaint::Vertex {
                pos: egui::pos2(2.0 * axis_x - p.x, p.y),
                uv: v.uv,
                color: v.color,
            }
        }));
        mesh.indices
            .extend(row_mesh.indices.iter().map(|i| base + i));
    }
    painter.add(egui::Shape::mesh(mesh));
}
