//! Configuração unificada via TOML.
//!
//! Um `config.toml` ao lado do executável; flags de linha de comando
//! sobrescrevem os valores do arquivo.

use crate::acquisition::{AcquisitionSettings, DEFAULT_BAUD};
use crate::render::{ChartSettings, DEFAULT_WINDOW_SECONDS, RENDER_INTERVAL};
use crate::store::RetentionPolicy;
use crate::thresholds::{DEFAULT_MAX_G, DEFAULT_WARNING_G, WeightThresholds};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Erros de leitura/escrita da configuração.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Erro de I/O em {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML inválido em {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Erro de serialização: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Configuração da porta serial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Porta (vazio = auto-detect)
    pub port: String,
    pub baud: u32,
    /// Timeout de leitura (ms)
    pub read_timeout_ms: u64,
    /// Intervalo entre tentativas de reconexão (s)
    pub reconnect_delay_secs: f64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud: DEFAULT_BAUD,
            read_timeout_ms: 1000,
            reconnect_delay_secs: 2.0,
        }
    }
}

/// Configuração do gráfico.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Segundos visíveis na janela deslizante
    pub window_seconds: u32,
    pub warning_threshold_g: f64,
    pub max_threshold_g: f64,
    /// Período do tick de renderização (ms)
    pub refresh_interval_ms: u64,
    /// Tema: "midnight", "light", "high_contrast"
    pub theme: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS,
            warning_threshold_g: DEFAULT_WARNING_G,
            max_threshold_g: DEFAULT_MAX_G,
            refresh_interval_ms: RENDER_INTERVAL.as_millis() as u64,
            theme: "midnight".into(),
        }
    }
}

/// Configuração raiz do aplicativo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub serial: SerialConfig,
    pub chart: ChartConfig,
    pub retention: RetentionPolicy,
}

impl AppConfig {
    /// Carrega configuração de um arquivo TOML; usa o padrão se o arquivo
    /// não existir ou estiver inválido.
    pub fn load(path: &Path) -> Self {
        if path.exists() {
            match Self::try_load(path) {
                Ok(config) => {
                    info!("Configuração carregada de {}", path.display());
                    return config;
                }
                Err(e) => warn!("{e}"),
            }
        }

        info!("Usando configuração padrão");
        AppConfig::default()
    }

    /// Como [`AppConfig::load`], mas propaga o erro.
    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Salva configuração em arquivo TOML.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Configuração salva em {}", path.display());
        Ok(())
    }

    /// Retorna o caminho padrão do config.toml.
    pub fn default_path() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .map(|p| p.parent().unwrap_or(Path::new(".")).to_path_buf())
            .unwrap_or_else(|_| PathBuf::from("."));
        exe_dir.join("config.toml")
    }

    /// Valida a configuração e retorna lista de erros.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.serial.baud == 0 {
            errors.push("Baud rate não pode ser 0".into());
        }
        if self.serial.read_timeout_ms == 0 {
            errors.push("Timeout de leitura não pode ser 0".into());
        }
        if !(self.serial.reconnect_delay_secs > 0.0 && self.serial.reconnect_delay_secs <= 60.0) {
            errors.push(format!(
                "Intervalo de reconexão inválido: {} (0–60s)",
                self.serial.reconnect_delay_secs
            ));
        }
        if self.chart.window_seconds == 0 {
            errors.push("Janela do gráfico não pode ser 0s".into());
        }
        if self.chart.refresh_interval_ms == 0 {
            errors.push("Intervalo de renderização não pode ser 0".into());
        }
        let (warn_g, max_g) = (self.chart.warning_threshold_g, self.chart.max_threshold_g);
        if !warn_g.is_finite() || !max_g.is_finite() {
            errors.push("Thresholds devem ser números finitos".into());
        } else if warn_g > max_g {
            errors.push(format!(
                "Warning ({warn_g} g) maior que o máximo ({max_g} g)"
            ));
        }
        match self.retention {
            RetentionPolicy::MaxSamples { count: 0 } => {
                errors.push("Retenção max_samples precisa de count > 0".into());
            }
            RetentionPolicy::MaxAge { seconds }
                if !(seconds.is_finite() && seconds >= self.chart.window_seconds as f64) =>
            {
                errors.push(format!(
                    "Retenção max_age ({seconds}s) menor que a janela ({}s)",
                    self.chart.window_seconds
                ));
            }
            _ => {}
        }

        errors
    }

    /// Parâmetros da conexão para uma porta já resolvida.
    pub fn acquisition_settings(&self, port: &str) -> AcquisitionSettings {
        AcquisitionSettings {
            read_timeout: Duration::from_millis(self.serial.read_timeout_ms),
            reconnect_delay: Duration::from_secs_f64(self.serial.reconnect_delay_secs),
            ..AcquisitionSettings::new(port, self.serial.baud)
        }
    }

    pub fn chart_settings(&self) -> ChartSettings {
        ChartSettings {
            window_seconds: self.chart.window_seconds as f64,
            thresholds: WeightThresholds::new(
                self.chart.warning_threshold_g,
                self.chart.max_threshold_g,
            ),
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.chart.refresh_interval_ms)
    }
}
