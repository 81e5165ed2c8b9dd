//! # Scale Core
//!
//! Núcleo do monitor de balança: decodifica o protocolo de linhas vindo da
//! porta serial, acumula as amostras num buffer compartilhado e compõe a
//! janela deslizante do gráfico (segmentos coloridos, faixas dos sensores
//! de parafuso, marcadores de TARE).
//!
//! ## Módulos
//! - [`types`] – Amostra, eventos do dispositivo
//! - [`protocol`] – Parser tolerante do protocolo `READY`/`TARE`/`DATA,…`
//! - [`store`] – Série temporal thread-safe com âncora de relógio
//! - [`acquisition`] – Loop de leitura serial com reconexão
//! - [`serial`] – Adaptador `serialport`
//! - [`thresholds`] – Categorias de peso (normal / warning / maxed)
//! - [`render`] – Pipeline de renderização e superfície de desenho
//! - [`config`] – Configuração via TOML
//! - [`theme`] – Temas de cores do gráfico

pub mod types;
pub mod protocol;
pub mod store;
pub mod acquisition;
pub mod serial;
pub mod thresholds;
pub mod render;
pub mod config;
pub mod theme;

// Re-exports convenientes
pub use types::{DeviceEvent, Sample};
pub use protocol::{decode_line, parse_line};
pub use store::{RetentionPolicy, TimeSeriesStore};
pub use acquisition::{AcquisitionLoop, AcquisitionSettings, spawn_acquisition};
pub use render::{RenderFrame, RenderPipeline, RenderSurface};
pub use config::AppConfig;
