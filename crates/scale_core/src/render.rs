//! Pipeline de renderização do gráfico de peso.
//!
//! A cada tick: snapshot do store → janela deslizante → faixas dos sensores
//! de parafuso → segmentos coloridos da curva → desenho numa
//! [`RenderSurface`]. A composição ([`compose_frame`]) é pura; o desenho
//! ([`RenderFrame::draw`]) só emite comandos para a superfície.

use crate::store::TimeSeriesStore;
use crate::theme::{Palette, Rgb};
use crate::thresholds::{WeightCategory, WeightThresholds};
use crate::types::{BOLT_ACTIVE, BoltSensor, Sample};
use std::sync::Arc;
use std::time::Duration;

/// Período nominal entre ticks de renderização.
pub const RENDER_INTERVAL: Duration = Duration::from_millis(250);

/// Janela padrão (s).
pub const DEFAULT_WINDOW_SECONDS: u32 = 30;

/// Folga à direita do último ponto (s).
const X_PADDING_S: f64 = 0.5;
const CURVE_WIDTH: f32 = 2.0;
const THRESHOLD_WIDTH: f32 = 1.2;
const TARE_WIDTH: f32 = 1.0;
const BAND_ALPHA: f32 = 0.25;
const STATUS_TEXT_SIZE: f32 = 14.0;
const TARE_TEXT_SIZE: f32 = 7.0;

/// Parâmetros do gráfico.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSettings {
    pub window_seconds: f64,
    pub thresholds: WeightThresholds,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS as f64,
            thresholds: WeightThresholds::default(),
        }
    }
}

// ──────────────────────────────────────────────
// Superfície de desenho
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dash {
    Solid,
    Dashed,
    Dotted,
}

/// Estilo de linhas de referência (thresholds, TARE).
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: Rgb,
    pub width: f32,
    pub dash: Dash,
    /// Entrada na legenda, se houver
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    LeftTop,
    RightBottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextPosition {
    /// Coordenadas do gráfico.
    Data { x: f64, y: f64, anchor: TextAnchor },
    /// Canto inferior direito, fora do sistema de coordenadas.
    StatusCorner,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Rgb,
    pub size: f32,
}

/// Superfície onde o frame é desenhado (implementada pela GUI).
pub trait RenderSurface {
    /// Descarta o conteúdo do frame anterior.
    fn clear(&mut self);
    fn draw_line(&mut self, points: &[[f64; 2]], color: Rgb, width: f32);
    fn draw_horizontal_line(&mut self, y: f64, style: &LineStyle);
    /// Faixa vertical ocupando toda a altura do gráfico.
    fn draw_vertical_band(&mut self, x_range: (f64, f64), color: Rgb, alpha: f32);
    fn draw_vertical_line(&mut self, x: f64, style: &LineStyle);
    fn draw_text(&mut self, position: TextPosition, text: &str, style: TextStyle);
    fn set_axis_limits(&mut self, x: (f64, f64), y: (f64, f64));
}

// ──────────────────────────────────────────────
// Janela
// ──────────────────────────────────────────────

/// `(t_start, t_end)` da janela visível, ou `None` sem amostras.
pub fn window_bounds(samples: &[Sample], window_seconds: f64) -> Option<(f64, f64)> {
    let first = samples.first()?;
    let last = samples.last()?;
    let t_end = last.timestamp_s;
    let t_start = first.timestamp_s.max(t_end - window_seconds);
    Some((t_start, t_end))
}

/// Amostras com `timestamp_s >= t_start`, na ordem original.
pub fn visible_samples(samples: &[Sample], t_start: f64) -> Vec<Sample> {
    samples
        .iter()
        .filter(|s| s.timestamp_s >= t_start)
        .copied()
        .collect()
}

// ──────────────────────────────────────────────
// Faixas dos sensores
// ──────────────────────────────────────────────

/// Trecho contínuo em que um sensor ficou ativo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub sensor: BoltSensor,
    /// Primeira amostra ativa
    pub start: f64,
    /// Fim pintado: primeira amostra inativa depois do trecho, ou a última
    /// amostra visível se o sensor continua ativo
    pub end: f64,
    /// Última amostra ativa do trecho
    pub last_active: f64,
}

/// Trechos máximos com o sensor em `0` (ativo), em ordem de tempo.
pub fn active_bands(samples: &[Sample], sensor: BoltSensor) -> Vec<Band> {
    let mut bands = Vec::new();
    // (início, última amostra ativa)
    let mut open: Option<(f64, f64)> = None;

    for s in samples {
        let t = s.timestamp_s;
        if sensor.state(s) == BOLT_ACTIVE {
            let start = open.map_or(t, |(start, _)| start);
            open = Some((start, t));
        } else if let Some((start, last_active)) = open.take() {
            bands.push(Band {
                sensor,
                start,
                end: t,
                last_active,
            });
        }
    }

    if let (Some((start, last_active)), Some(last)) = (open, samples.last()) {
        bands.push(Band {
            sensor,
            start,
            end: last.timestamp_s,
            last_active,
        });
    }

    bands
}

// ──────────────────────────────────────────────
// Segmentos coloridos
// ──────────────────────────────────────────────

/// Trecho da curva com uma única categoria.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub category: WeightCategory,
    pub points: Vec<[f64; 2]>,
}

/// Divide a curva em trechos de categoria constante. Cada trecho depois do
/// primeiro começa com o último ponto do anterior, então a linha não tem
/// buracos na troca de cor.
pub fn color_segments(samples: &[Sample], thresholds: &WeightThresholds) -> Vec<Segment> {
    let mut segments = Vec::new();
    let Some(first) = samples.first() else {
        return segments;
    };

    let mut current = Segment {
        category: thresholds.categorize(first.weight_g),
        points: vec![[first.timestamp_s, first.weight_g]],
    };

    for s in &samples[1..] {
        let point = [s.timestamp_s, s.weight_g];
        let category = thresholds.categorize(s.weight_g);
        if category == current.category {
            current.points.push(point);
            continue;
        }
        // `points` nunca fica vazio: começa com um ponto e só cresce
        let joint = current.points[current.points.len() - 1];
        let finished = std::mem::replace(
            &mut current,
            Segment {
                category,
                points: vec![joint, point],
            },
        );
        segments.push(finished);
    }

    segments.push(current);
    segments
}

// ──────────────────────────────────────────────
// Eixos e status
// ──────────────────────────────────────────────

/// Limites `(x, y)` dos eixos para a janela visível.
pub fn axis_limits(
    t_start: f64,
    t_end: f64,
    visible: &[Sample],
    thresholds: &WeightThresholds,
) -> ((f64, f64), (f64, f64)) {
    let (min_w, max_w) = visible.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), s| (lo.min(s.weight_g), hi.max(s.weight_g)),
    );

    let (y_min, y_max) = if visible.is_empty() {
        (0.0, thresholds.max_g * 1.05)
    } else {
        (
            0.0_f64.min(min_w - 5.0),
            (thresholds.max_g * 1.05).max(max_w * 1.1),
        )
    };

    ((t_start, t_end + X_PADDING_S), (y_min, y_max))
}

/// `"<status>  |  <peso> g"` seguido dos sensores ativos.
pub fn status_line(status: &str, latest: &Sample) -> String {
    let active: Vec<&str> = BoltSensor::ALL
        .iter()
        .filter(|sensor| sensor.state(latest) == BOLT_ACTIVE)
        .map(|sensor| sensor.label())
        .collect();

    let mut line = format!("{status}  |  {:.1} g", latest.weight_g);
    if !active.is_empty() {
        line.push_str("  ");
        line.push_str(&active.join("  "));
    }
    line
}

// ──────────────────────────────────────────────
// Frame
// ──────────────────────────────────────────────

/// Conteúdo do gráfico para a janela visível.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub t_start: f64,
    pub t_end: f64,
    pub visible: Vec<Sample>,
    pub bands: Vec<Band>,
    pub segments: Vec<Segment>,
    /// TAREs dentro de `[t_start, t_end]`
    pub tare_markers: Vec<f64>,
    pub thresholds: WeightThresholds,
    pub x_limits: (f64, f64),
    pub y_limits: (f64, f64),
}

/// Resultado de um tick. Sem amostras, só a linha de status.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub status_line: String,
    pub chart: Option<ChartFrame>,
}

impl RenderFrame {
    fn status_only(status: &str) -> Self {
        Self {
            status_line: status.to_string(),
            chart: None,
        }
    }

    /// Emite os comandos de desenho do frame.
    pub fn draw(&self, surface: &mut dyn RenderSurface, palette: &Palette) {
        surface.clear();

        let status_style = TextStyle {
            color: palette.status,
            size: STATUS_TEXT_SIZE,
        };

        let Some(chart) = &self.chart else {
            surface.draw_text(TextPosition::StatusCorner, &self.status_line, status_style);
            return;
        };

        // Limites primeiro: as faixas verticais ocupam toda a altura
        surface.set_axis_limits(chart.x_limits, chart.y_limits);

        for band in &chart.bands {
            let color = match band.sensor {
                BoltSensor::Start => palette.bolt_start,
                BoltSensor::Goal => palette.bolt_goal,
            };
            surface.draw_vertical_band((band.start, band.end), color, BAND_ALPHA);
        }

        let th = &chart.thresholds;
        surface.draw_horizontal_line(
            th.warning_g,
            &LineStyle {
                color: palette.warning,
                width: THRESHOLD_WIDTH,
                dash: Dash::Dashed,
                label: Some(format!("Warning limit ({:.0} g)", th.warning_g)),
            },
        );
        surface.draw_horizontal_line(
            th.max_g,
            &LineStyle {
                color: palette.maxed,
                width: THRESHOLD_WIDTH,
                dash: Dash::Dashed,
                label: Some(format!("Max limit ({:.0} g)", th.max_g)),
            },
        );

        let y_top = chart.y_limits.1;
        for (i, &t) in chart.tare_markers.iter().enumerate() {
            surface.draw_vertical_line(
                t,
                &LineStyle {
                    color: palette.tare,
                    width: TARE_WIDTH,
                    dash: Dash::Dotted,
                    label: (i == 0).then(|| "TARE".to_string()),
                },
            );
            surface.draw_text(
                TextPosition::Data {
                    x: t,
                    y: y_top,
                    anchor: TextAnchor::LeftTop,
                },
                " TARE",
                TextStyle {
                    color: palette.tare,
                    size: TARE_TEXT_SIZE,
                },
            );
        }

        for segment in &chart.segments {
            let color = match segment.category {
                WeightCategory::Normal => palette.normal,
                WeightCategory::Warning => palette.warning,
                WeightCategory::Maxed => palette.maxed,
            };
            surface.draw_line(&segment.points, color, CURVE_WIDTH);
        }

        surface.draw_text(TextPosition::StatusCorner, &self.status_line, status_style);
    }
}

/// Compõe o frame a partir de um snapshot. Não faz I/O.
pub fn compose_frame(
    samples: &[Sample],
    tares: &[f64],
    status: &str,
    settings: &ChartSettings,
) -> RenderFrame {
    let Some((t_start, t_end)) = window_bounds(samples, settings.window_seconds) else {
        return RenderFrame::status_only(status);
    };

    let visible = visible_samples(samples, t_start);
    let Some(latest) = visible.last() else {
        return RenderFrame::status_only(status);
    };
    let status_line = status_line(status, latest);

    let bands = BoltSensor::ALL
        .iter()
        .flat_map(|&sensor| active_bands(&visible, sensor))
        .collect();
    let segments = color_segments(&visible, &settings.thresholds);
    let tare_markers = tares
        .iter()
        .copied()
        .filter(|&t| t_start <= t && t <= t_end)
        .collect();
    let (x_limits, y_limits) = axis_limits(t_start, t_end, &visible, &settings.thresholds);

    RenderFrame {
        status_line,
        chart: Some(ChartFrame {
            t_start,
            t_end,
            visible,
            bands,
            segments,
            tare_markers,
            thresholds: settings.thresholds,
            x_limits,
            y_limits,
        }),
    }
}

// ──────────────────────────────────────────────
// Pipeline
// ──────────────────────────────────────────────

/// Consumidor somente-leitura do store, chamado pelo timer da UI.
pub struct RenderPipeline {
    store: Arc<TimeSeriesStore>,
    settings: ChartSettings,
    palette: Palette,
}

impl RenderPipeline {
    pub fn new(store: Arc<TimeSeriesStore>, settings: ChartSettings, palette: Palette) -> Self {
        Self {
            store,
            settings,
            palette,
        }
    }

    pub fn settings(&self) -> &ChartSettings {
        &self.settings
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Snapshot + composição, sem desenhar.
    pub fn compose(&self) -> RenderFrame {
        let samples = self.store.snapshot();
        let tares = self.store.tare_events();
        let status = self.store.status();
        compose_frame(&samples, &tares, &status, &self.settings)
    }

    /// Um tick completo: compõe e desenha na superfície.
    pub fn tick(&self, surface: &mut dyn RenderSurface) -> RenderFrame {
        let frame = self.compose();
        frame.draw(surface, &self.palette);
        frame
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Cmd {
        Clear,
        Line(Vec<[f64; 2]>, Rgb),
        HLine(f64, Option<String>),
        Band((f64, f64), Rgb),
        VLine(f64, Option<String>),
        Text(TextPosition, String),
        Limits((f64, f64), (f64, f64)),
    }

    #[derive(Default)]
    struct RecordingSurface {
        cmds: Vec<Cmd>,
    }

    impl RenderSurface for RecordingSurface {
        fn clear(&mut self) {
            self.cmds.clear();
            self.cmds.push(Cmd::Clear);
        }
        fn draw_line(&mut self, points: &[[f64; 2]], color: Rgb, _width: f32) {
            self.cmds.push(Cmd::Line(points.to_vec(), color));
        }
        fn draw_horizontal_line(&mut self, y: f64, style: &LineStyle) {
            self.cmds.push(Cmd::HLine(y, style.label.clone()));
        }
        fn draw_vertical_band(&mut self, x_range: (f64, f64), color: Rgb, _alpha: f32) {
            self.cmds.push(Cmd::Band(x_range, color));
        }
        fn draw_vertical_line(&mut self, x: f64, style: &LineStyle) {
            self.cmds.push(Cmd::VLine(x, style.label.clone()));
        }
        fn draw_text(&mut self, position: TextPosition, text: &str, _style: TextStyle) {
            self.cmds.push(Cmd::Text(position, text.to_string()));
        }
        fn set_axis_limits(&mut self, x: (f64, f64), y: (f64, f64)) {
            self.cmds.push(Cmd::Limits(x, y));
        }
    }

    fn weights(ws: &[f64]) -> Vec<Sample> {
        ws.iter()
            .enumerate()
            .map(|(i, &w)| Sample::new(i as f64, w, 1, 1))
            .collect()
    }

    fn bolt_start_series(states: &[u8]) -> Vec<Sample> {
        states
            .iter()
            .enumerate()
            .map(|(i, &bs)| Sample::new(i as f64, 0.0, bs, 1))
            .collect()
    }

    #[test]
    fn window_keeps_trailing_seconds() {
        let samples: Vec<Sample> = (0..=100).map(|i| Sample::new(i as f64, 1.0, 1, 1)).collect();
        let (t_start, t_end) = window_bounds(&samples, 30.0).unwrap();
        assert_eq!((t_start, t_end), (70.0, 100.0));

        let visible = visible_samples(&samples, t_start);
        assert_eq!(visible.len(), 31);
        assert!(visible.iter().all(|s| s.timestamp_s >= 70.0));
    }

    #[test]
    fn short_session_starts_at_first_sample() {
        let samples = weights(&[1.0, 2.0, 3.0]);
        assert_eq!(window_bounds(&samples, 30.0), Some((0.0, 2.0)));
        assert_eq!(window_bounds(&[], 30.0), None);
    }

    #[test]
    fn bands_for_active_runs() {
        let samples = bolt_start_series(&[1, 0, 0, 1, 0]);
        let bands = active_bands(&samples, BoltSensor::Start);
        assert_eq!(bands.len(), 2);

        // Trechos ativos: [1, 2] e [4, 4]
        assert_eq!((bands[0].start, bands[0].last_active), (1.0, 2.0));
        assert_eq!((bands[1].start, bands[1].last_active), (4.0, 4.0));

        // Faixa pintada vai até a amostra que voltou a 1; a última fica
        // aberta até o fim da janela
        assert_eq!(bands[0].end, 3.0);
        assert_eq!(bands[1].end, 4.0);
    }

    #[test]
    fn bands_are_independent_per_sensor() {
        let samples = vec![
            Sample::new(0.0, 0.0, 0, 1),
            Sample::new(1.0, 0.0, 0, 0),
            Sample::new(2.0, 0.0, 1, 0),
        ];
        let start = active_bands(&samples, BoltSensor::Start);
        let goal = active_bands(&samples, BoltSensor::Goal);
        assert_eq!(start.len(), 1);
        assert_eq!((start[0].start, start[0].end), (0.0, 2.0));
        assert_eq!(goal.len(), 1);
        assert_eq!((goal[0].start, goal[0].end), (1.0, 2.0));
    }

    #[test]
    fn bands_edge_cases() {
        assert!(active_bands(&[], BoltSensor::Start).is_empty());
        assert!(active_bands(&bolt_start_series(&[1, 1, 1]), BoltSensor::Start).is_empty());

        let single = active_bands(&bolt_start_series(&[0]), BoltSensor::Start);
        assert_eq!(single.len(), 1);
        assert_eq!((single[0].start, single[0].end, single[0].last_active), (0.0, 0.0, 0.0));

        let all = active_bands(&bolt_start_series(&[0, 0, 0]), BoltSensor::Start);
        assert_eq!(all.len(), 1);
        assert_eq!((all[0].start, all[0].end), (0.0, 2.0));
    }

    #[test]
    fn segments_share_connecting_points() {
        let th = WeightThresholds::new(750.0, 1000.0);
        let samples = weights(&[100.0, 100.0, 800.0, 800.0, 1200.0]);

        let cats: Vec<_> = samples.iter().map(|s| th.categorize(s.weight_g)).collect();
        assert_eq!(
            cats,
            vec![
                WeightCategory::Normal,
                WeightCategory::Normal,
                WeightCategory::Warning,
                WeightCategory::Warning,
                WeightCategory::Maxed,
            ]
        );

        let segs = color_segments(&samples, &th);
        assert_eq!(
            segs,
            vec![
                Segment {
                    category: WeightCategory::Normal,
                    points: vec![[0.0, 100.0], [1.0, 100.0]],
                },
                Segment {
                    category: WeightCategory::Warning,
                    points: vec![[1.0, 100.0], [2.0, 800.0], [3.0, 800.0]],
                },
                Segment {
                    category: WeightCategory::Maxed,
                    points: vec![[3.0, 800.0], [4.0, 1200.0]],
                },
            ]
        );

        for pair in segs.windows(2) {
            assert_eq!(pair[0].points.last(), pair[1].points.first());
        }
    }

    #[test]
    fn segments_edge_cases() {
        let th = WeightThresholds::default();
        assert!(color_segments(&[], &th).is_empty());

        let single = color_segments(&weights(&[900.0]), &th);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].category, WeightCategory::Warning);
        assert_eq!(single[0].points, vec![[0.0, 900.0]]);

        // Alternância a cada ponto: todo trecho tem exatamente 2 pontos
        let zigzag = color_segments(&weights(&[0.0, 2000.0, 0.0, 2000.0]), &th);
        assert_eq!(zigzag.len(), 4);
        assert!(zigzag[1..].iter().all(|s| s.points.len() == 2));
    }

    #[test]
    fn axis_limits_follow_data() {
        let th = WeightThresholds::default();
        let (x, y) = axis_limits(0.0, 10.0, &weights(&[100.0, 200.0]), &th);
        assert_eq!(x, (0.0, 10.5));
        assert_eq!(y, (0.0, 1050.0));

        let (_, y) = axis_limits(0.0, 1.0, &weights(&[-20.0, 2000.0]), &th);
        assert_eq!(y.0, -25.0);
        assert!((y.1 - 2200.0).abs() < 1e-9);
    }

    #[test]
    fn status_line_lists_active_bolts() {
        let s = Sample::new(0.0, 512.34, 0, 0);
        assert_eq!(
            status_line("Device ready", &s),
            "Device ready  |  512.3 g  Bolt Start  Bolt Goal"
        );

        let s = Sample::new(0.0, 10.0, 1, 0);
        assert_eq!(status_line("x", &s), "x  |  10.0 g  Bolt Goal");

        let s = Sample::new(0.0, 10.0, 1, 1);
        assert_eq!(status_line("x", &s), "x  |  10.0 g");
    }

    #[test]
    fn empty_store_renders_status_only() {
        let frame = compose_frame(&[], &[1.0], "Waiting for device…", &ChartSettings::default());
        assert_eq!(frame.chart, None);

        let mut surface = RecordingSurface::default();
        frame.draw(&mut surface, &Palette::default());
        assert_eq!(
            surface.cmds,
            vec![
                Cmd::Clear,
                Cmd::Text(TextPosition::StatusCorner, "Waiting for device…".into()),
            ]
        );
    }

    #[test]
    fn single_sample_frame() {
        let samples = vec![Sample::new(5.0, 300.0, 0, 1)];
        let frame = compose_frame(&samples, &[], "ok", &ChartSettings::default());
        let chart = frame.chart.as_ref().unwrap();
        assert_eq!(chart.x_limits, (5.0, 5.5));
        assert_eq!(chart.segments.len(), 1);
        assert_eq!(chart.bands.len(), 1);

        let mut surface = RecordingSurface::default();
        frame.draw(&mut surface, &Palette::default());
        assert!(surface.cmds.iter().any(|c| matches!(c, Cmd::Line(p, _) if p.len() == 1)));
    }

    #[test]
    fn tare_markers_inside_window_only() {
        let samples: Vec<Sample> = (0..=100).map(|i| Sample::new(i as f64, 1.0, 1, 1)).collect();
        let tares = [10.0, 75.0, 99.5, 100.5];
        let frame = compose_frame(&samples, &tares, "ok", &ChartSettings::default());
        let chart = frame.chart.as_ref().unwrap();
        assert_eq!(chart.tare_markers, vec![75.0, 99.5]);

        let mut surface = RecordingSurface::default();
        frame.draw(&mut surface, &Palette::default());
        let vlines: Vec<_> = surface
            .cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::VLine(x, label) => Some((*x, label.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(vlines, vec![(75.0, Some("TARE".into())), (99.5, None)]);
    }

    #[test]
    fn full_frame_draw_order() {
        let samples = vec![
            Sample::new(0.0, 100.0, 1, 1),
            Sample::new(1.0, 800.0, 0, 1),
            Sample::new(2.0, 1200.0, 0, 0),
        ];
        let palette = Palette::default();
        let frame = compose_frame(&samples, &[], "Device ready", &ChartSettings::default());
        let mut surface = RecordingSurface::default();
        frame.draw(&mut surface, &palette);

        let cmds = &surface.cmds;
        assert_eq!(cmds[0], Cmd::Clear);
        assert!(matches!(cmds[1], Cmd::Limits(x, _) if x == (0.0, 2.5)));
        assert_eq!(cmds[2], Cmd::Band((1.0, 2.0), palette.bolt_start));
        assert_eq!(cmds[3], Cmd::Band((2.0, 2.0), palette.bolt_goal));
        assert_eq!(cmds[4], Cmd::HLine(750.0, Some("Warning limit (750 g)".into())));
        assert_eq!(cmds[5], Cmd::HLine(1000.0, Some("Max limit (1000 g)".into())));

        let line_colors: Vec<Rgb> = cmds
            .iter()
            .filter_map(|c| match c {
                Cmd::Line(_, color) => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(line_colors, vec![palette.normal, palette.warning, palette.maxed]);

        assert_eq!(
            cmds.last(),
            Some(&Cmd::Text(
                TextPosition::StatusCorner,
                "Device ready  |  1200.0 g  Bolt Start  Bolt Goal".into()
            ))
        );
    }

    #[test]
    fn pipeline_tick_reads_store() {
        let store = Arc::new(TimeSeriesStore::default());
        let pipeline = RenderPipeline::new(
            Arc::clone(&store),
            ChartSettings::default(),
            Palette::default(),
        );
        let mut surface = RecordingSurface::default();
        assert_eq!(pipeline.settings().window_seconds, 30.0);

        assert!(pipeline.tick(&mut surface).chart.is_none());

        store.append_sample_at(Sample::new(1.0, 50.0, 1, 1), 100.0);
        store.set_status("Connected on COM3");
        let frame = pipeline.tick(&mut surface);
        assert_eq!(frame.status_line, "Connected on COM3  |  50.0 g");
        assert_eq!(surface.cmds[0], Cmd::Clear);
    }
}
