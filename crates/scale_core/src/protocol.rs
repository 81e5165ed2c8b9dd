//! Protocolo de linhas do dispositivo.
//!
//! Texto ASCII, um evento por linha:
//!
//! ```text
//! READY
//! TARE
//! DATA,<millis>,<weight_g>,<boltStart>,<boltGoal>
//! ```
//!
//! O stream é ruidoso (leituras parciais no boot, glitches de transmissão),
//! então nada aqui retorna erro: linhas malformadas viram
//! [`DeviceEvent::Unrecognized`] e são descartadas pelo chamador.

use crate::types::{BOLT_ACTIVE, BOLT_INACTIVE, DeviceEvent, Sample};

/// Prefixo das linhas de leitura.
pub const DATA_PREFIX: &str = "DATA,";

/// Número exato de campos de uma linha `DATA`.
const DATA_FIELDS: usize = 5;

/// Decodifica bytes crus como ASCII, ignorando bytes inválidos, e remove
/// espaços/terminadores das pontas.
pub fn decode_line(raw: &[u8]) -> String {
    let ascii: String = raw
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| b as char)
        .collect();
    ascii.trim().to_string()
}

/// Classifica uma linha já sem terminadores.
pub fn parse_line(line: &str) -> DeviceEvent {
    match line {
        "READY" => DeviceEvent::Ready,
        "TARE" => DeviceEvent::Tare,
        _ if line.starts_with(DATA_PREFIX) => {
            parse_data(line).map_or(DeviceEvent::Unrecognized, DeviceEvent::Sample)
        }
        _ => DeviceEvent::Unrecognized,
    }
}

fn parse_data(line: &str) -> Option<Sample> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != DATA_FIELDS {
        return None;
    }

    let millis: u64 = fields[1].parse().ok()?;
    let weight: f64 = fields[2].parse().ok()?;
    if !weight.is_finite() {
        return None;
    }
    let bolt_start = parse_bolt(fields[3])?;
    let bolt_goal = parse_bolt(fields[4])?;

    Some(Sample::new(millis as f64 / 1000.0, weight, bolt_start, bolt_goal))
}

fn parse_bolt(field: &str) -> Option<u8> {
    match field.parse::<i64>().ok()? {
        0 => Some(BOLT_ACTIVE),
        1 => Some(BOLT_INACTIVE),
        _ => None,
    }
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
