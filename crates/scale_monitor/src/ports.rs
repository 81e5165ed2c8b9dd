//! Enumeração de portas seriais e auto-detecção do M5StickC.

use serialport::SerialPortType;
use tracing::{debug, warn};

/// Trechos de descrição/fabricante de adaptadores USB-serial conhecidos.
const DEVICE_KEYWORDS: [&str; 7] = ["CP210", "CH340", "CH9102", "FTDI", "USB Serial", "ESP32", "M5"];

/// Porta encontrada no sistema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    pub name: String,
    /// Produto + fabricante (vazio para portas não-USB)
    pub description: String,
}

impl PortCandidate {
    fn looks_like_device(&self) -> bool {
        let desc = self.description.to_lowercase();
        DEVICE_KEYWORDS
            .iter()
            .any(|k| desc.contains(&k.to_lowercase()))
    }
}

/// Lista as portas do sistema. Erros de enumeração resultam em lista vazia.
pub fn available_ports() -> Vec<PortCandidate> {
    match serialport::available_ports() {
        Ok(ports) => ports
            .into_iter()
            .map(|p| {
                let description = match &p.port_type {
                    SerialPortType::UsbPort(info) => format!(
                        "{}{}",
                        info.product.as_deref().unwrap_or_default(),
                        info.manufacturer.as_deref().unwrap_or_default()
                    ),
                    SerialPortType::BluetoothPort => "Bluetooth".into(),
                    SerialPortType::PciPort => "PCI".into(),
                    SerialPortType::Unknown => String::new(),
                };
                PortCandidate {
                    name: p.port_name,
                    description,
                }
            })
            .collect(),
        Err(e) => {
            warn!("Falha ao listar portas seriais: {e}");
            Vec::new()
        }
    }
}

/// Primeira porta com cara de adaptador conhecido; senão a primeira porta.
pub fn pick_port(candidates: &[PortCandidate]) -> Option<String> {
    candidates
        .iter()
        .find(|c| c.looks_like_device())
        .or_else(|| candidates.first())
        .map(|c| c.name.clone())
}

pub fn auto_detect_port() -> Option<String> {
    let candidates = available_ports();
    debug!("Portas encontradas: {candidates:?}");
    pick_port(&candidates)
}

/// Imprime as portas disponíveis (`--list-ports`).
pub fn print_ports() {
    let ports = available_ports();
    println!("Available serial ports:");
    if ports.is_empty() {
        println!("  (none)");
    }
    for p in &ports {
        let marker = if p.looks_like_device() { "*" } else { " " };
        if p.description.is_empty() {
            println!(" {marker} {}", p.name);
        } else {
            println!(" {marker} {} - {}", p.name, p.description);
        }
    }
}
