//! Tipos de dados trafegados entre a serial, o store e o gráfico.

use serde::{Deserialize, Serialize};

/// Valor dos sensores de parafuso quando tocando (ativo).
pub const BOLT_ACTIVE: u8 = 0;
/// Valor dos sensores de parafuso quando ausente (inativo).
pub const BOLT_INACTIVE: u8 = 1;

// ──────────────────────────────────────────────
// Sample
// ──────────────────────────────────────────────

/// Uma leitura de peso + sensores, com tempo do relógio do dispositivo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Tempo do dispositivo em segundos (`millis / 1000`)
    pub timestamp_s: f64,
    /// Peso medido (g)
    pub weight_g: f64,
    /// Sensor de início do parafuso (0 = ativo, 1 = inativo)
    pub bolt_start: u8,
    /// Sensor de chegada do parafuso (0 = ativo, 1 = inativo)
    pub bolt_goal: u8,
}

impl Sample {
    pub fn new(timestamp_s: f64, weight_g: f64, bolt_start: u8, bolt_goal: u8) -> Self {
        Self {
            timestamp_s,
            weight_g,
            bolt_start,
            bolt_goal,
        }
    }

    pub fn bolt_start_active(&self) -> bool {
        self.bolt_start == BOLT_ACTIVE
    }

    pub fn bolt_goal_active(&self) -> bool {
        self.bolt_goal == BOLT_ACTIVE
    }
}

/// Qual dos dois sensores de parafuso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoltSensor {
    Start,
    Goal,
}

impl BoltSensor {
    pub const ALL: [BoltSensor; 2] = [BoltSensor::Start, BoltSensor::Goal];

    /// Nome exibido na linha de status e na legenda.
    pub fn label(self) -> &'static str {
        match self {
            BoltSensor::Start => "Bolt Start",
            BoltSensor::Goal => "Bolt Goal",
        }
    }

    /// Lê o estado bruto (0/1) deste sensor numa amostra.
    pub fn state(self, sample: &Sample) -> u8 {
        match self {
            BoltSensor::Start => sample.bolt_start,
            BoltSensor::Goal => sample.bolt_goal,
        }
    }
}

// ──────────────────────────────────────────────
// Eventos
// ──────────────────────────────────────────────

/// Resultado da classificação de uma linha recebida.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    /// Dispositivo inicializado.
    Ready,
    /// Balança zerada. O tempo é atribuído por quem recebe.
    Tare,
    /// Leitura válida.
    Sample(Sample),
    /// Linha desconhecida ou malformada – descartada.
    Unrecognized,
}
