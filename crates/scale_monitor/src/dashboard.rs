//! Dashboard principal – App eframe/egui.

use crate::plot_surface::PlotSurface;
use crate::theme_egui::{self, EguiTheme};
use egui::{Color32, RichText};
use scale_core::acquisition::AcquisitionHandle;
use scale_core::config::AppConfig;
use scale_core::render::RenderPipeline;
use scale_core::store::TimeSeriesStore;
use scale_core::thresholds::WeightCategory;
use scale_core::types::BoltSensor;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Estado do dashboard.
pub struct WeightDashboard {
    theme: EguiTheme,
    theme_index: usize,
    all_themes: Vec<EguiTheme>,

    // Renderização
    pipeline: RenderPipeline,
    surface: PlotSurface,
    refresh_interval: Duration,
    last_tick: Option<Instant>,

    // Mantém o sender de shutdown vivo enquanto a janela existir
    _acquisition: AcquisitionHandle,

    port: String,
    is_fullscreen: bool,
}

impl WeightDashboard {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: &AppConfig,
        port: String,
        store: Arc<TimeSeriesStore>,
        acquisition: AcquisitionHandle,
    ) -> Self {
        // Carrega tema
        let all_themes = theme_egui::all_themes();
        let theme_index = all_themes
            .iter()
            .position(|t| t.name == config.chart.theme)
            .unwrap_or(0);
        let theme = all_themes[theme_index].clone();

        let pipeline = RenderPipeline::new(store, config.chart_settings(), theme.palette);

        Self {
            theme,
            theme_index,
            all_themes,
            pipeline,
            surface: PlotSurface::default(),
            refresh_interval: config.refresh_interval(),
            last_tick: None,
            _acquisition: acquisition,
            port,
            is_fullscreen: false,
        }
    }

    /// Roda o pipeline se o período de renderização já passou. Entre ticks o
    /// último frame gravado é redesenhado.
    fn tick_if_due(&mut self) -> Duration {
        let due = self
            .last_tick
            .is_none_or(|t| t.elapsed() >= self.refresh_interval);
        if due {
            self.pipeline.tick(&mut self.surface);
            self.last_tick = Some(Instant::now());
        }

        self.last_tick
            .map(|t| self.refresh_interval.saturating_sub(t.elapsed()))
            .unwrap_or(self.refresh_interval)
    }

    fn next_theme(&mut self) {
        self.theme_index = (self.theme_index + 1) % self.all_themes.len();
        self.theme = self.all_themes[self.theme_index].clone();
        self.pipeline.set_palette(self.theme.palette);
        // Força redesenho com as cores novas
        self.last_tick = None;
        info!("Tema: {}", self.theme.name);
    }

    /// Legenda fixa: faixas dos sensores e cores da curva.
    fn render_legend(&self, ui: &mut egui::Ui) {
        let palette = &self.theme.palette;
        let swatch = |ui: &mut egui::Ui, symbol: &str, color: Color32, label: &str| {
            ui.label(RichText::new(symbol).color(color).monospace());
            ui.label(RichText::new(label).size(11.0));
            ui.add_space(8.0);
        };

        ui.horizontal_wrapped(|ui: &mut egui::Ui| {
            for sensor in BoltSensor::ALL {
                let color = match sensor {
                    BoltSensor::Start => palette.bolt_start,
                    BoltSensor::Goal => palette.bolt_goal,
                };
                swatch(
                    ui,
                    "■",
                    theme_egui::color_alpha(color, 0.6),
                    &format!("{} active", sensor.label()),
                );
            }
            for category in [WeightCategory::Normal, WeightCategory::Warning, WeightCategory::Maxed] {
                let color = match category {
                    WeightCategory::Normal => palette.normal,
                    WeightCategory::Warning => palette.warning,
                    WeightCategory::Maxed => palette.maxed,
                };
                swatch(ui, "━", theme_egui::color(color), category.label());
            }
        });
    }
}

impl eframe::App for WeightDashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Tick do pipeline ──
        let until_next = self.tick_if_due();
        ctx.request_repaint_after(until_next);

        // ── Configurar estilo visual baseado no tema ──
        self.theme.apply(ctx);

        // ── Atalhos de teclado ──
        // Lê as teclas primeiro; comandos de viewport não podem ser enviados
        // com o lock de input aberto
        let (theme_key, quit_key, fullscreen_key) = ctx.input(|i: &egui::InputState| {
            (
                i.key_pressed(egui::Key::T),
                i.key_pressed(egui::Key::Q) || i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::F) || i.key_pressed(egui::Key::F11),
            )
        });
        if theme_key {
            self.next_theme();
        }
        if quit_key {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
        if fullscreen_key {
            self.is_fullscreen = !self.is_fullscreen;
            ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.is_fullscreen));
        }

        // ── Título + legenda ──
        egui::TopBottomPanel::top("title").show(ctx, |ui: &mut egui::Ui| {
            ui.vertical_centered(|ui: &mut egui::Ui| {
                ui.label(
                    RichText::new("Weight over Time")
                        .color(self.theme.title)
                        .size(18.0)
                        .strong(),
                );
            });
            self.render_legend(ui);
        });

        // ── Status + help bar ──
        egui::TopBottomPanel::bottom("status").show(ctx, |ui: &mut egui::Ui| {
            ui.horizontal(|ui: &mut egui::Ui| {
                ui.label(
                    RichText::new(format!("{} | [F] Fullscreen | [T] Theme | [Q/Esc] Quit", self.port))
                        .color(self.theme.grid.gamma_multiply(2.0))
                        .monospace()
                        .size(10.0),
                );
                self.surface.show_status(ui);
            });
        });

        // ── Gráfico ──
        egui::CentralPanel::default().show(ctx, |ui: &mut egui::Ui| {
            self.surface.show(ui);
        });
    }
}
