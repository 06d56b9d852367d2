use eframe::egui::Color32;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub accent: Color32,
    pub countdown: Color32,
    pub panel_background: Color32,
    /// Line height as a multiple of the font size.
    pub line_spacing: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: Color32::BLACK,
            foreground: Color32::from_rgb(0xF2, 0xF2, 0xF2),
            accent: Color32::from_rgb(0x52, 0x94, 0xE2),
            countdown: Color32::from_rgb(0xFF, 0xC8, 0x3D),
            panel_background: Color32::from_rgb(0x2D, 0x2D, 0x2D),
            line_spacing: 1.4,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            background: Color32::WHITE,
            foreground: Color32::from_rgb(0x1A, 0x1A, 0x2E),
            accent: Color32::from_rgb(0x0F, 0x34, 0x60),
            countdown: Color32::from_rgb(0xC7, 0x3E, 0x1D),
            panel_background: Color32::from_rgb(0xF5, 0xF5, 0xF5),
            line_spacing: 1.4,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            _ => Self::light(),
        }
    }

    pub fn toggled(&self) -> Self {
        if self.name == "dark" {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0) as u8;
        Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
    }
}
