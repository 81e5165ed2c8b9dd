//! Série temporal compartilhada entre a thread serial e a UI.
//!
//! Um único `Mutex` protege amostras, eventos de TARE, âncora de relógio e
//! status. O lock só é mantido durante um append ou a cópia de um
//! snapshot; parsing e renderização acontecem fora dele.

use crate::types::Sample;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Status inicial, antes de qualquer tentativa de conexão.
pub const INITIAL_STATUS: &str = "Waiting for device…";

/// Política de retenção de amostras.
///
/// O padrão mantém a sessão inteira em memória; as variantes limitadas
/// existem para sessões longas.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RetentionPolicy {
    #[default]
    Unbounded,
    /// Ring buffer com no máximo `count` amostras.
    MaxSamples { count: usize },
    /// Descarta amostras mais antigas que `newest - seconds`.
    MaxAge { seconds: f64 },
}

#[derive(Debug)]
struct StoreInner {
    samples: VecDeque<Sample>,
    tares: Vec<f64>,
    anchor: Option<f64>,
    status: String,
}

/// Buffer de amostras, eventos de TARE, âncora e status.
#[derive(Debug)]
pub struct TimeSeriesStore {
    inner: Mutex<StoreInner>,
    retention: RetentionPolicy,
}

impl Default for TimeSeriesStore {
    fn default() -> Self {
        Self::new(RetentionPolicy::Unbounded)
    }
}

impl TimeSeriesStore {
    pub fn new(retention: RetentionPolicy) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                samples: VecDeque::new(),
                tares: Vec::new(),
                anchor: None,
                status: INITIAL_STATUS.to_string(),
            }),
            retention,
        }
    }

    // Um escritor que entrou em pânico não invalida os dados já gravados.
    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Adiciona uma amostra usando o relógio do sistema para a âncora.
    pub fn append_sample(&self, sample: Sample) {
        self.append_sample_at(sample, wall_clock_now());
    }

    /// Adiciona uma amostra. Na primeira amostra da sessão fixa
    /// `t0 = wall_now - timestamp_s`.
    pub fn append_sample_at(&self, sample: Sample, wall_now: f64) {
        let mut inner = self.lock();
        if inner.anchor.is_none() {
            let t0 = wall_now - sample.timestamp_s;
            debug!("Âncora de relógio fixada em t0={t0:.3}");
            inner.anchor = Some(t0);
        }
        inner.samples.push_back(sample);
        self.evict(&mut inner);
    }

    /// Registra um TARE em `wall_now - t0` (ou `0.0` se ainda não há âncora).
    pub fn append_tare(&self, wall_now: f64) -> f64 {
        let mut inner = self.lock();
        let timestamp = wall_now - inner.anchor.unwrap_or(wall_now);
        inner.tares.push(timestamp);
        timestamp
    }

    /// Cópia de todas as amostras mantidas, em ordem de chegada.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.lock().samples.iter().copied().collect()
    }

    /// Cópia dos tempos de TARE, em ordem de chegada.
    pub fn tare_events(&self) -> Vec<f64> {
        self.lock().tares.clone()
    }

    pub fn anchor(&self) -> Option<f64> {
        self.lock().anchor
    }

    pub fn set_status(&self, status: impl Into<String>) {
        self.lock().status = status.into();
    }

    pub fn status(&self) -> String {
        self.lock().status.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().samples.is_empty()
    }

    fn evict(&self, inner: &mut StoreInner) {
        let evicted = match self.retention {
            RetentionPolicy::Unbounded => return,
            RetentionPolicy::MaxSamples { count } => {
                let excess = inner.samples.len().saturating_sub(count.max(1));
                inner.samples.drain(..excess).count()
            }
            RetentionPolicy::MaxAge { seconds } => {
                let Some(newest) = inner.samples.back().map(|s| s.timestamp_s) else {
                    return;
                };
                let cutoff = newest - seconds;
                let mut n = 0;
                while inner.samples.front().is_some_and(|s| s.timestamp_s < cutoff) {
                    inner.samples.pop_front();
                    n += 1;
                }
                n
            }
        };

        if evicted > 0 {
            if let Some(oldest) = inner.samples.front().map(|s| s.timestamp_s) {
                inner.tares.retain(|&t| t >= oldest);
            }
        }
    }
}

/// Segundos desde a época Unix.
pub fn wall_clock_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────
