//! Categorias de peso e avaliação de thresholds.

use serde::{Deserialize, Serialize};

/// Warning padrão (g).
pub const DEFAULT_WARNING_G: f64 = 750.0;
/// Máximo padrão (g).
pub const DEFAULT_MAX_G: f64 = 1000.0;

/// Categoria de um ponto da curva de peso.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WeightCategory {
    Normal,
    Warning,
    Maxed,
}

impl WeightCategory {
    pub fn label(self) -> &'static str {
        match self {
            WeightCategory::Normal => "Normal",
            WeightCategory::Warning => "Warning",
            WeightCategory::Maxed => "Maxed",
        }
    }
}

/// Par de thresholds do gráfico.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightThresholds {
    pub warning_g: f64,
    pub max_g: f64,
}

impl Default for WeightThresholds {
    fn default() -> Self {
        Self {
            warning_g: DEFAULT_WARNING_G,
            max_g: DEFAULT_MAX_G,
        }
    }
}

impl WeightThresholds {
    pub fn new(warning_g: f64, max_g: f64) -> Self {
        Self { warning_g, max_g }
    }

    /// `>= max` → Maxed, `>= warning` → Warning, senão Normal.
    pub fn categorize(&self, weight_g: f64) -> WeightCategory {
        if weight_g >= self.max_g {
            WeightCategory::Maxed
        } else if weight_g >= self.warning_g {
            WeightCategory::Warning
        } else {
            WeightCategory::Normal
        }
    }
}
