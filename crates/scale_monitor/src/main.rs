//! # Scale Monitor
//!
//! Gráfico ao vivo do peso lido de uma balança serial (M5StickC).
//!
//! O dispositivo envia linhas `READY`, `TARE` e
//! `DATA,<millis>,<peso_g>,<boltStart>,<boltGoal>`; a leitura roda numa
//! thread própria e o gráfico é redesenhado a cada 250 ms.
//!
//! ## Uso
//! ```bash
//! scale_monitor                       # auto-detecta a porta
//! scale_monitor --port /dev/ttyUSB0   # porta explícita
//! scale_monitor --list-ports
//! ```
//!
//! ## Atalhos
//! - `F` / `F11`: Fullscreen
//! - `T`: Alternar tema
//! - `Q` / `Esc`: Sair

mod dashboard;
mod plot_surface;
mod ports;
mod theme_egui;

use clap::Parser;
use dashboard::WeightDashboard;
use scale_core::acquisition::spawn_acquisition;
use scale_core::config::AppConfig;
use scale_core::serial::SerialPortProvider;
use scale_core::store::TimeSeriesStore;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Flags de linha de comando. Sobrescrevem o config.toml.
#[derive(Debug, Parser)]
#[command(name = "scale_monitor", version, about = "Live weight chart for a serial scale")]
struct Cli {
    /// Serial port (e.g. COM5 or /dev/ttyUSB0). Auto-detected when omitted.
    #[arg(long)]
    port: Option<String>,

    /// Baud rate
    #[arg(long)]
    baud: Option<u32>,

    /// Visible time window in seconds
    #[arg(long)]
    window: Option<u32>,

    /// Warning threshold in grams
    #[arg(long)]
    warn: Option<f64>,

    /// Max threshold in grams
    #[arg(long)]
    max: Option<f64>,

    /// Path to config.toml (default: next to the executable)
    #[arg(long)]
    config: Option<PathBuf>,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(port) = &self.port {
            config.serial.port = port.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud = baud;
        }
        if let Some(window) = self.window {
            config.chart.window_seconds = window;
        }
        if let Some(warn_g) = self.warn {
            config.chart.warning_threshold_g = warn_g;
        }
        if let Some(max_g) = self.max {
            config.chart.max_threshold_g = max_g;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging ──
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if cli.list_ports {
        ports::print_ports();
        return ExitCode::SUCCESS;
    }

    // ── Config ──
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_path);
    let mut config = AppConfig::load(&config_path);

    // Salva config padrão se não existir
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Não foi possível salvar config padrão: {e}");
        }
    }

    cli.apply(&mut config);

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("Configuração inválida: {e}");
        }
        return ExitCode::FAILURE;
    }

    // ── Porta ──
    let port = if config.serial.port.is_empty() {
        match ports::auto_detect_port() {
            Some(p) => {
                info!("Porta auto-detectada: {p}");
                p
            }
            None => {
                error!("No serial port found. Use --port to specify one.");
                return ExitCode::FAILURE;
            }
        }
    } else {
        config.serial.port.clone()
    };

    // ── Banner ──
    println!();
    println!("══════════════════════════════════════════════");
    println!("   ⚖ SCALE MONITOR");
    println!("══════════════════════════════════════════════");
    println!("  Porta:     {port} @ {} baud", config.serial.baud);
    println!("  Janela:    {}s", config.chart.window_seconds);
    println!(
        "  Limites:   {:.0} g / {:.0} g",
        config.chart.warning_threshold_g, config.chart.max_threshold_g
    );
    println!("══════════════════════════════════════════════");
    println!();

    // ── Aquisição ──
    let store = Arc::new(TimeSeriesStore::new(config.retention));
    let acquisition = match spawn_acquisition(
        SerialPortProvider,
        Arc::clone(&store),
        config.acquisition_settings(&port),
    ) {
        Ok(handle) => handle,
        Err(e) => {
            error!("Falha ao iniciar a thread de leitura: {e}");
            return ExitCode::FAILURE;
        }
    };

    // ── Janela eframe ──
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Real-Time Weight Monitor")
            .with_inner_size([1024.0, 640.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Scale Monitor",
        options,
        Box::new(move |cc| {
            Ok(Box::new(WeightDashboard::new(
                cc,
                &config,
                port,
                store,
                acquisition,
            )))
        }),
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Erro na janela: {e}");
            ExitCode::FAILURE
        }
    }
}
