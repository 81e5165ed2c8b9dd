//! Conversão de temas para `egui::Color32`.

use egui::Color32;
use scale_core::theme::{self, ChartTheme, Palette, Rgb};

/// Tema convertido para tipos egui.
#[derive(Clone)]
pub struct EguiTheme {
    pub name: String,
    pub window_bg: Color32,
    pub plot_bg: Color32,
    pub border: Color32,
    pub grid: Color32,
    pub text: Color32,
    pub title: Color32,
    /// Cores do pipeline de renderização
    pub palette: Palette,
}

impl EguiTheme {
    /// Converte um [`ChartTheme`] do core para [`EguiTheme`].
    pub fn from_core(t: &ChartTheme) -> Self {
        Self {
            name: t.name.clone(),
            window_bg: hex_color(&t.window_bg),
            plot_bg: hex_color(&t.plot_bg),
            border: hex_color(&t.border),
            grid: hex_color(&t.grid),
            text: hex_color(&t.text),
            title: hex_color(&t.title),
            palette: Palette::from_theme(t),
        }
    }

    /// Aplica o tema aos visuals do egui.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = if self.name == "light" {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        };
        visuals.panel_fill = self.window_bg;
        visuals.window_fill = self.window_bg;
        visuals.extreme_bg_color = self.plot_bg;
        visuals.override_text_color = Some(self.text);
        visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, self.grid);
        ctx.set_visuals(visuals);
    }
}

/// Cor opaca.
pub fn color(rgb: Rgb) -> Color32 {
    Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Cor com transparência (`alpha` em 0–1).
pub fn color_alpha(rgb: Rgb, alpha: f32) -> Color32 {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(rgb.0, rgb.1, rgb.2, a)
}

fn hex_color(hex: &str) -> Color32 {
    let (r, g, b) = theme::hex_to_rgb(hex);
    Color32::from_rgb(r, g, b)
}

/// Carrega todos os temas disponíveis.
pub fn all_themes() -> Vec<EguiTheme> {
    theme::theme_names()
        .iter()
        .map(|name| EguiTheme::from_core(&theme::get_theme(name)))
        .collect()
}
