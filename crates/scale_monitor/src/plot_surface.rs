//! Implementação de [`RenderSurface`] sobre `egui_plot`.
//!
//! O pipeline desenha no tick (a cada 250 ms); o egui redesenha todo frame.
//! Por isso a superfície só grava os comandos e [`PlotSurface::show`]
//! reproduz o último conjunto gravado dentro do `Plot`.

use crate::theme_egui;
use egui::{Align2, Color32, RichText, Stroke};
use egui_plot::{HLine, Legend, Line, Plot, PlotBounds, PlotPoint, PlotPoints, Polygon, Text, VLine};
use scale_core::render::{Dash, LineStyle, RenderSurface, TextAnchor, TextPosition, TextStyle};
use scale_core::theme::Rgb;

const DASH_LENGTH: f32 = 8.0;
const DOT_SPACING: f32 = 4.0;

#[derive(Debug, Clone)]
enum PlotCommand {
    Line {
        points: Vec<[f64; 2]>,
        color: Color32,
        width: f32,
    },
    HLine {
        y: f64,
        style: LineStyle,
    },
    Band {
        x: (f64, f64),
        color: Color32,
    },
    VLine {
        x: f64,
        style: LineStyle,
    },
    Text {
        at: [f64; 2],
        anchor: Align2,
        text: String,
        style: TextStyle,
    },
}

/// Superfície gravada, reproduzida a cada frame do egui.
#[derive(Debug, Default)]
pub struct PlotSurface {
    commands: Vec<PlotCommand>,
    status: Option<(String, TextStyle)>,
    bounds: Option<((f64, f64), (f64, f64))>,
}

impl RenderSurface for PlotSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.status = None;
        self.bounds = None;
    }

    fn draw_line(&mut self, points: &[[f64; 2]], color: Rgb, width: f32) {
        self.commands.push(PlotCommand::Line {
            points: points.to_vec(),
            color: theme_egui::color(color),
            width,
        });
    }

    fn draw_horizontal_line(&mut self, y: f64, style: &LineStyle) {
        self.commands.push(PlotCommand::HLine {
            y,
            style: style.clone(),
        });
    }

    fn draw_vertical_band(&mut self, x_range: (f64, f64), color: Rgb, alpha: f32) {
        self.commands.push(PlotCommand::Band {
            x: x_range,
            color: theme_egui::color_alpha(color, alpha),
        });
    }

    fn draw_vertical_line(&mut self, x: f64, style: &LineStyle) {
        self.commands.push(PlotCommand::VLine {
            x,
            style: style.clone(),
        });
    }

    fn draw_text(&mut self, position: TextPosition, text: &str, style: TextStyle) {
        match position {
            TextPosition::StatusCorner => self.status = Some((text.to_string(), style)),
            TextPosition::Data { x, y, anchor } => self.commands.push(PlotCommand::Text {
                at: [x, y],
                anchor: match anchor {
                    TextAnchor::LeftTop => Align2::LEFT_TOP,
                    TextAnchor::RightBottom => Align2::RIGHT_BOTTOM,
                },
                text: text.to_string(),
                style,
            }),
        }
    }

    fn set_axis_limits(&mut self, x: (f64, f64), y: (f64, f64)) {
        self.bounds = Some((x, y));
    }
}

impl PlotSurface {
    pub fn has_chart(&self) -> bool {
        self.bounds.is_some()
    }

    /// Linha de status no canto inferior direito.
    pub fn show_status(&self, ui: &mut egui::Ui) {
        let Some((text, style)) = &self.status else {
            return;
        };
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut egui::Ui| {
            ui.label(
                RichText::new(text)
                    .color(theme_egui::color(style.color))
                    .size(style.size)
                    .monospace(),
            );
        });
    }

    /// Reproduz os comandos gravados no gráfico.
    pub fn show(&self, ui: &mut egui::Ui) {
        let bounds = self.bounds;

        Plot::new("weight_over_time")
            .legend(Legend::default().position(egui_plot::Corner::LeftTop))
            .x_axis_label("Time (s)")
            .y_axis_label("Weight (g)")
            .show_grid(true)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .show(ui, |plot_ui| {
                if let Some(((x0, x1), (y0, y1))) = bounds {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max([x0, y0], [x1, y1]));
                }

                for cmd in &self.commands {
                    match cmd {
                        PlotCommand::Band { x: (x0, x1), color } => {
                            // Sem limites de eixo não há altura para a faixa
                            let Some((_, (y0, y1))) = bounds else {
                                continue;
                            };
                            let corners = vec![[*x0, y0], [*x1, y0], [*x1, y1], [*x0, y1]];
                            plot_ui.polygon(
                                Polygon::new(PlotPoints::from(corners))
                                    .fill_color(*color)
                                    .stroke(Stroke::NONE),
                            );
                        }
                        PlotCommand::HLine { y, style } => {
                            let mut line = HLine::new(*y)
                                .color(theme_egui::color(style.color))
                                .width(style.width)
                                .style(plot_line_style(style.dash));
                            if let Some(label) = &style.label {
                                line = line.name(label);
                            }
                            plot_ui.hline(line);
                        }
                        PlotCommand::VLine { x, style } => {
                            let mut line = VLine::new(*x)
                                .color(theme_egui::color(style.color))
                                .width(style.width)
                                .style(plot_line_style(style.dash));
                            if let Some(label) = &style.label {
                                line = line.name(label);
                            }
                            plot_ui.vline(line);
                        }
                        PlotCommand::Line {
                            points,
                            color,
                            width,
                        } => {
                            plot_ui.line(
                                Line::new(PlotPoints::from(points.clone()))
                                    .color(*color)
                                    .width(*width),
                            );
                        }
                        PlotCommand::Text {
                            at,
                            anchor,
                            text,
                            style,
                        } => {
                            plot_ui.text(
                                Text::new(
                                    PlotPoint::new(at[0], at[1]),
                                    RichText::new(text)
                                        .size(style.size)
                                        .color(theme_egui::color(style.color)),
                                )
                                .anchor(*anchor),
                            );
                        }
                    }
                }
            });
    }
}

fn plot_line_style(dash: Dash) -> egui_plot::LineStyle {
    match dash {
        Dash::Solid => egui_plot::LineStyle::Solid,
        Dash::Dashed => egui_plot::LineStyle::Dashed {
            length: DASH_LENGTH,
        },
        Dash::Dotted => egui_plot::LineStyle::Dotted {
            spacing: DOT_SPACING,
        },
    }
}
