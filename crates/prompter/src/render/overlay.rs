use eframe::egui::{self, FontId, Rect};

use crate::theme::Theme;

pub const SHORTCUTS: &[(&str, &str)] = &[
    ("Space", "Play / pause"),
    ("Esc", "Pause / cancel countdown"),
    ("R", "Reset to top"),
    ("S", "Stop"),
    ("\u{2191} / \u{2193}", "Speed \u{00b1}10 px/s"),
    ("+ / -", "Font size \u{00b1}4 px"),
    ("PgUp / PgDn", "Previous / next script"),
    ("M", "Toggle mirror"),
    ("F", "Toggle fullscreen"),
    ("C", "Toggle controls"),
    ("D", "Toggle theme"),
    ("H", "Toggle this help"),
    ("Q", "Quit"),
];

/// Large pre-roll number centered on the reading guide.
pub fn draw_countdown(ui: &egui::Ui, theme: &Theme, rect: Rect, guide_y: f32, remaining: u32) {
    if remaining == 0 {
        return;
    }
    let size = (rect.height() * 0.35).max(48.0);
    let galley = ui.painter().layout_no_wrap(
        remaining.to_string(),
        FontId::proportional(size),
        theme.countdown,
    );
    let pos = egui::pos2(
        rect.center().x - galley.rect.width() / 2.0,
        guide_y - galley.rect.height() / 2.0,
    );
    ui.painter().galley(pos, galley, theme.countdown);
}

/// Eye-line marker: a faint band with arrow heads at both edges.
pub fn draw_guide(ui: &egui::Ui, theme: &Theme, rect: Rect, guide_y: f32, font_size: f32) {
    let band = Rect::from_min_max(
        egui::pos2(rect.left(), guide_y - font_size * 0.1),
        egui::pos2(rect.right(), guide_y + font_size * 1.3),
    );
    ui.painter()
        .rect_filled(band, 0.0, Theme::with_opacity(theme.accent, 0.08));

    let color = Theme::with_opacity(theme.accent, 0.8);
    let h = font_size * 0.35;
    let mid = guide_y + font_size * 0.6;
    for (edge, dir) in [(rect.left() + 4.0, 1.0), (rect.right() - 4.0, -1.0)] {
        ui.painter().add(egui::Shape::convex_polygon(
            vec![
                egui::pos2(edge, mid - h),
                egui::pos2(edge + dir * h * 1.2, mid),
                egui::pos2(edge, mid + h),
            ],
            color,
            egui::Stroke::NONE,
        ));
    }
}

pub fn draw_placeholder(ui: &egui::Ui, theme: &Theme, rect: Rect, message: &str) {
    let color = Theme::with_opacity(theme.foreground, 0.5);
    let galley = ui
        .painter()
        .layout_no_wrap(message.to_string(), FontId::proportional(32.0), color);
    let pos = rect.center() - galley.rect.size() / 2.0;
    ui.painter().galley(pos, galley, color);
}

/// Draw a fade gradient at the top or bottom of a rect.
pub fn draw_fade_gradient(ui: &egui::Ui, rect: Rect, fade_h: f32, theme: &Theme, top: bool) {
    let bg = theme.background;
    let transparent = egui::Color32::from_rgba_unmultiplied(bg.r(), bg.g(), bg.b(), 0);

    let fade_rect = if top {
        Rect::from_min_max(rect.left_top(), egui::pos2(rect.right(), rect.top() + fade_h))
    } else {
        Rect::from_min_max(egui::pos2(rect.left(), rect.bottom() - fade_h), rect.right_bottom())
    };

    let (top_color, bottom_color) = if top {
        (bg, transparent)
    } else {
        (transparent, bg)
    };

    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(fade_rect.left_top(), top_color);
    mesh.colored_vertex(fade_rect.right_top(), top_color);
    mesh.colored_vertex(fade_rect.left_bottom(), bottom_color);
    mesh.colored_vertex(fade_rect.right_bottom(), bottom_color);
    mesh.add_triangle(0, 2, 1);
    mesh.add_triangle(1, 2, 3);
    ui.painter().add(egui::Shape::mesh(mesh));
}

pub fn draw_help(ui: &egui::Ui, theme: &Theme, rect: Rect) {
    let bg = Theme::with_opacity(theme.panel_background, 0.92);
    let text_color = Theme::with_opacity(theme.foreground, 0.9);
    let key_color = Theme::with_opacity(theme.accent, 0.9);

    let padding = 24.0;
    let line_height = 30.0;
    let height = SHORTCUTS.len() as f32 * line_height + padding * 2.0 + 40.0;
    let hud = Rect::from_center_size(rect.center(), egui::vec2(380.0, height));
    ui.painter().rect_filled(hud, 12.0, bg);

    let title = ui.painter().layout_no_wrap(
        "Keyboard Shortcuts".to_string(),
        FontId::proportional(20.0),
        text_color,
    );
    ui.painter().galley(
        egui::pos2(hud.left() + padding, hud.top() + padding),
        title,
        text_color,
    );

    let mut y = hud.top() + padding + 40.0;
    for (key, desc) in SHORTCUTS {
        let key_galley =
            ui.painter()
                .layout_no_wrap(key.to_string(), FontId::monospace(15.0), key_color);
        ui.painter()
            .galley(egui::pos2(hud.left() + padding, y), key_galley, key_color);
        let desc_galley =
            ui.painter()
                .layout_no_wrap(desc.to_string(), FontId::proportional(15.0), text_color);
        ui.painter().galley(
            egui::pos2(hud.left() + padding + 150.0, y),
            desc_galley,
            text_color,
        );
        y += line_height;
    }
}

/// Short-lived notification at the bottom of the screen.
pub struct Toast {
    message: String,
    start: std::time::Instant,
}

impl Toast {
    const DURATION: f32 = 1.5;
    const FADE_START: f32 = 1.0;

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            start: std::time::Instant::now(),
        }
    }

    pub fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        if elapsed < Self::FADE_START {
            1.0
        } else if elapsed < Self::DURATION {
            1.0 - (elapsed - Self::FADE_START) / (Self::DURATION - Self::FADE_START)
        } else {
            0.0
        }
    }

    pub fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= Self::DURATION
    }

    pub fn draw(&self, ui: &egui::Ui, theme: &Theme, rect: Rect) {
        let opacity = self.opacity();
        if opacity <= 0.0 {
            return;
        }
        let color = Theme::with_opacity(theme.foreground, opacity * 0.9);
        let bg = Theme::with_opacity(theme.panel_background, opacity * 0.9);
        let galley =
            ui.painter()
                .layout_no_wrap(self.message.clone(), FontId::proportional(20.0), color);
        let padding = 16.0;
        let toast_rect = Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.bottom() - 80.0,
            ),
            galley.rect.size() + egui::vec2(padding * 2.0, padding * 2.0),
        );
        ui.painter().rect_filled(toast_rect, 8.0, bg);
        ui.painter().galley(
            toast_rect.min + egui::vec2(padding, padding),
            galley,
            color,
        );
    }
}
