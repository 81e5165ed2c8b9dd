//! Temas de cores do gráfico.
//!
//! Cores guardadas como hex ("#RRGGBB") para serialização; a conversão para
//! o tipo de cor da GUI é feita no monitor a partir de [`Palette`].

use serde::{Deserialize, Serialize};

/// Cor em formato hex string (ex: "#00ccff").
pub type ColorHex = String;

/// Definição completa de um tema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartTheme {
    pub name: String,
    // Fundo
    pub window_bg: ColorHex,
    pub plot_bg: ColorHex,
    pub border: ColorHex,
    pub grid: ColorHex,
    // Texto
    pub text: ColorHex,
    pub title: ColorHex,
    pub status: ColorHex,
    // Curva de peso por categoria
    pub normal: ColorHex,
    pub warning: ColorHex,
    pub maxed: ColorHex,
    // Faixas dos sensores
    pub bolt_start: ColorHex,
    pub bolt_goal: ColorHex,
    // Marcadores
    pub tare: ColorHex,
}

/// Cor RGB resolvida.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Converte uma string hex "#RRGGBB" para tupla (r, g, b).
pub fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return (255, 255, 255); // fallback branco
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
    (r, g, b)
}

fn rgb(hex: &str) -> Rgb {
    let (r, g, b) = hex_to_rgb(hex);
    Rgb(r, g, b)
}

/// Cores usadas pelo pipeline de renderização.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub normal: Rgb,
    pub warning: Rgb,
    pub maxed: Rgb,
    pub bolt_start: Rgb,
    pub bolt_goal: Rgb,
    pub tare: Rgb,
    pub status: Rgb,
}

impl Palette {
    pub fn from_theme(t: &ChartTheme) -> Self {
        Self {
            normal: rgb(&t.normal),
            warning: rgb(&t.warning),
            maxed: rgb(&t.maxed),
            bolt_start: rgb(&t.bolt_start),
            bolt_goal: rgb(&t.bolt_goal),
            tare: rgb(&t.tare),
            status: rgb(&t.status),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_theme(&midnight_theme())
    }
}

/// Tema padrão (fundo azul-noite).
pub fn midnight_theme() -> ChartTheme {
    ChartTheme {
        name: "midnight".into(),
        window_bg: "#1a1a2e".into(),
        plot_bg: "#16213e".into(),
        border: "#444466".into(),
        grid: "#2a2a4a".into(),
        text: "#aaaacc".into(),
        title: "#ddddff".into(),
        status: "#88aacc".into(),
        normal: "#00ccff".into(),
        warning: "#ffaa00".into(),
        maxed: "#ff4444".into(),
        bolt_start: "#97d0ff".into(),
        bolt_goal: "#7be45c".into(),
        tare: "#ffffff".into(),
    }
}

/// Tema claro, para bancadas bem iluminadas.
pub fn light_theme() -> ChartTheme {
    ChartTheme {
        name: "light".into(),
        window_bg: "#f5f5f5".into(),
        plot_bg: "#ffffff".into(),
        border: "#cccccc".into(),
        grid: "#e0e0e0".into(),
        text: "#333333".into(),
        title: "#0066cc".into(),
        status: "#335577".into(),
        normal: "#0077aa".into(),
        warning: "#cc8800".into(),
        maxed: "#cc2222".into(),
        bolt_start: "#4a90d9".into(),
        bolt_goal: "#3c9a2a".into(),
        tare: "#333333".into(),
    }
}

/// Tema High Contrast (acessibilidade).
pub fn high_contrast_theme() -> ChartTheme {
    ChartTheme {
        name: "high_contrast".into(),
        window_bg: "#000000".into(),
        plot_bg: "#000000".into(),
        border: "#ffffff".into(),
        grid: "#444444".into(),
        text: "#ffffff".into(),
        title: "#00ffff".into(),
        status: "#ffffff".into(),
        normal: "#00ffff".into(),
        warning: "#ffff00".into(),
        maxed: "#ff0000".into(),
        bolt_start: "#0080ff".into(),
        bolt_goal: "#00ff00".into(),
        tare: "#ff00ff".into(),
    }
}

/// Retorna tema pelo nome.
pub fn get_theme(name: &str) -> ChartTheme {
    match name.to_lowercase().as_str() {
        "light" => light_theme(),
        "high_contrast" => high_contrast_theme(),
        _ => midnight_theme(),
    }
}

/// Nomes de temas disponíveis.
pub fn theme_names() -> Vec<&'static str> {
    vec!["midnight", "light", "high_contrast"]
}
