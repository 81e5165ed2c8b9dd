//! Loop de aquisição: mantém a conexão serial viva e alimenta o store.
//!
//! Máquina de estados com dois estados ([`LinkState`]). Qualquer falha de
//! I/O (ao abrir ou ao ler) vira status `"Serial error: … — retrying…"`,
//! espera [`RECONNECT_DELAY`] e tenta de novo, sem limite de tentativas.

use crate::protocol::{decode_line, parse_line};
use crate::serial::{LineSource, SerialError, SerialProvider};
use crate::store::{TimeSeriesStore, wall_clock_now};
use crate::types::DeviceEvent;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Intervalo fixo entre tentativas de reconexão.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(2);

/// Timeout de leitura; limita quanto tempo leva para notar um shutdown.
pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

pub const DEFAULT_BAUD: u32 = 115_200;

/// Parâmetros da conexão.
#[derive(Debug, Clone, PartialEq)]
pub struct AcquisitionSettings {
    pub port: String,
    pub baud: u32,
    pub read_timeout: Duration,
    pub reconnect_delay: Duration,
}

impl AcquisitionSettings {
    pub fn new(port: impl Into<String>, baud: u32) -> Self {
        Self {
            port: port.into(),
            baud,
            read_timeout: READ_TIMEOUT,
            reconnect_delay: RECONNECT_DELAY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connected,
}

/// Loop de leitura. Único escritor do [`TimeSeriesStore`].
pub struct AcquisitionLoop<P: SerialProvider> {
    provider: P,
    store: Arc<TimeSeriesStore>,
    settings: AcquisitionSettings,
    shutdown: Receiver<()>,
    state: LinkState,
}

impl<P: SerialProvider> AcquisitionLoop<P> {
    /// `shutdown` encerra o loop quando recebe `()` ou quando o sender é
    /// descartado.
    pub fn new(
        provider: P,
        store: Arc<TimeSeriesStore>,
        settings: AcquisitionSettings,
        shutdown: Receiver<()>,
    ) -> Self {
        Self {
            provider,
            store,
            settings,
            shutdown,
            state: LinkState::Disconnected,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Roda até o shutdown. Falhas de conexão nunca encerram o loop.
    pub fn run(mut self) {
        info!(
            "Aquisição iniciada em {} @ {} baud",
            self.settings.port, self.settings.baud
        );

        loop {
            if self.shutdown_requested() {
                break;
            }

            let outcome = match self.provider.open(
                &self.settings.port,
                self.settings.baud,
                self.settings.read_timeout,
            ) {
                Ok(conn) => {
                    self.state = LinkState::Connected;
                    self.store
                        .set_status(format!("Connected on {}", self.settings.port));
                    info!("Conectado em {}", self.settings.port);
                    self.pump(conn)
                }
                Err(e) => Err(e),
            };

            let Err(fault) = outcome else {
                break;
            };

            self.state = LinkState::Disconnected;
            self.store
                .set_status(format!("Serial error: {fault} — retrying…"));
            warn!(
                "Erro serial em {}: {fault}. Tentando novamente em {:.1}s...",
                self.settings.port,
                self.settings.reconnect_delay.as_secs_f64()
            );

            if self.wait_backoff() {
                break;
            }
        }

        self.state = LinkState::Disconnected;
        info!("Aquisição encerrada");
    }

    /// Lê linhas até uma falha (`Err`) ou shutdown (`Ok`). A conexão é
    /// fechada ao retornar.
    fn pump(&mut self, mut conn: P::Connection) -> Result<(), SerialError> {
        loop {
            if self.shutdown_requested() {
                return Ok(());
            }
            match conn.read_line()? {
                Some(raw) if !raw.is_empty() => {
                    self.handle_line(&raw);
                }
                // Timeout sem dados
                _ => {}
            }
        }
    }

    /// Decodifica, classifica e aplica uma linha crua ao store.
    pub fn handle_line(&self, raw: &[u8]) -> DeviceEvent {
        let line = decode_line(raw);
        let event = parse_line(&line);
        self.apply(event, wall_clock_now());
        if event == DeviceEvent::Unrecognized && !line.is_empty() {
            debug!("Linha descartada: {line:?}");
        }
        event
    }

    fn apply(&self, event: DeviceEvent, wall_now: f64) {
        match event {
            DeviceEvent::Ready => {
                info!("Dispositivo pronto");
                self.store.set_status("Device ready");
            }
            DeviceEvent::Tare => {
                let t = self.store.append_tare(wall_now);
                info!("TARE em t={t:.2}s");
                self.store.set_status("Scale zeroed (TARE)");
            }
            DeviceEvent::Sample(sample) => self.store.append_sample_at(sample, wall_now),
            DeviceEvent::Unrecognized => {}
        }
    }

    fn shutdown_requested(&self) -> bool {
        !matches!(self.shutdown.try_recv(), Err(TryRecvError::Empty))
    }

    /// Espera o backoff. Retorna `true` se o shutdown chegou no meio.
    fn wait_backoff(&self) -> bool {
        !matches!(
            self.shutdown.recv_timeout(self.settings.reconnect_delay),
            Err(RecvTimeoutError::Timeout)
        )
    }
}

// ──────────────────────────────────────────────
// Thread
// ──────────────────────────────────────────────

/// Handle da thread de aquisição. Descartar o handle também encerra o loop
/// (na próxima leitura ou backoff).
pub struct AcquisitionHandle {
    shutdown: Sender<()>,
    thread: JoinHandle<()>,
}

impl AcquisitionHandle {
    /// Pede o encerramento e espera a thread terminar.
    pub fn stop(self) {
        let _ = self.shutdown.send(());
        if self.thread.join().is_err() {
            warn!("Thread de aquisição terminou com pânico");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }
}

/// Inicia o loop de aquisição numa thread dedicada.
pub fn spawn_acquisition<P>(
    provider: P,
    store: Arc<TimeSeriesStore>,
    settings: AcquisitionSettings,
) -> std::io::Result<AcquisitionHandle>
where
    P: SerialProvider + Send + 'static,
{
    let (tx, rx) = bounded::<()>(1);
    let acquisition = AcquisitionLoop::new(provider, store, settings, rx);

    let thread = std::thread::Builder::new()
        .name("serial-reader".into())
        .spawn(move || acquisition.run())?;

    Ok(AcquisitionHandle {
        shutdown: tx,
        thread,
    })
}

// ──────────────────────────────────────────────
// Testes
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sample;
    use std::collections::VecDeque;
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    enum Step {
        Line(&'static [u8]),
        Fault(&'static str),
    }

    struct ScriptedConn {
        rx: Receiver<Step>,
    }

    impl LineSource for ScriptedConn {
        fn read_line(&mut self) -> Result<Option<Vec<u8>>, SerialError> {
            match self.rx.recv_timeout(Duration::from_millis(5)) {
                Ok(Step::Line(bytes)) => Ok(Some(bytes.to_vec())),
                Ok(Step::Fault(msg)) => Err(io::Error::other(msg).into()),
                Err(RecvTimeoutError::Timeout) => Ok(None),
                Err(RecvTimeoutError::Disconnected) => Err(SerialError::Disconnected),
            }
        }
    }

    /// Cada `open` consome a próxima conexão roteirizada.
    struct ScriptedProvider {
        conns: VecDeque<Result<Receiver<Step>, SerialError>>,
        opens: Arc<AtomicUsize>,
    }

    impl SerialProvider for ScriptedProvider {
        type Connection = ScriptedConn;

        fn open(&mut self, _: &str, _: u32, _: Duration) -> Result<ScriptedConn, SerialError> {
            self.opens.fetch_add(1, Ordering::SeqCst);
            match self.conns.pop_front() {
                Some(Ok(rx)) => Ok(ScriptedConn { rx }),
                Some(Err(e)) => Err(e),
                None => Err(io::Error::new(io::ErrorKind::NotFound, "no more ports").into()),
            }
        }
    }

    fn provider(conns: Vec<Result<Receiver<Step>, SerialError>>) -> ScriptedProvider {
        ScriptedProvider {
            conns: conns.into(),
            opens: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn settings(delay_ms: u64) -> AcquisitionSettings {
        AcquisitionSettings {
            reconnect_delay: Duration::from_millis(delay_ms),
            read_timeout: Duration::from_millis(5),
            ..AcquisitionSettings::new("test-port", DEFAULT_BAUD)
        }
    }

    fn wait_until(what: &str, cond: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cond() {
            assert!(Instant::now() < deadline, "timeout esperando: {what}");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn idle_loop() -> (AcquisitionLoop<ScriptedProvider>, Arc<TimeSeriesStore>) {
        let store = Arc::new(TimeSeriesStore::default());
        let (_tx, rx) = bounded(1);
        let acq = AcquisitionLoop::new(provider(vec![]), Arc::clone(&store), settings(1), rx);
        (acq, store)
    }

    #[test]
    fn default_settings() {
        let s = AcquisitionSettings::new("COM3", DEFAULT_BAUD);
        assert_eq!(s.baud, 115_200);
        assert_eq!(s.reconnect_delay, Duration::from_secs(2));
        assert_eq!(s.read_timeout, Duration::from_secs(1));
    }

    #[test]
    fn handle_line_routes_events() {
        let (acq, store) = idle_loop();

        assert_eq!(acq.handle_line(b"READY\r\n"), DeviceEvent::Ready);
        assert_eq!(store.status(), "Device ready");

        let ev = acq.handle_line(b"DATA,1000,500.5,0,1\n");
        assert_eq!(ev, DeviceEvent::Sample(Sample::new(1.0, 500.5, 0, 1)));
        assert_eq!(store.snapshot(), vec![Sample::new(1.0, 500.5, 0, 1)]);
        assert!(store.anchor().is_some());

        assert_eq!(acq.handle_line(b"TARE\n"), DeviceEvent::Tare);
        assert_eq!(store.status(), "Scale zeroed (TARE)");
        assert_eq!(store.tare_events().len(), 1);
    }

    #[test]
    fn malformed_lines_do_not_touch_the_store() {
        let (acq, store) = idle_loop();
        store.set_status("Connected on test-port");

        for raw in [
            &b"DATA,1000,abc,0,1\n"[..],
            b"DATA,1000,500.5,0\n",
            b"\xff\xfe garbage\n",
            b"DATA,1000,500,3,1\n",
        ] {
            assert_eq!(acq.handle_line(raw), DeviceEvent::Unrecognized);
        }
        assert!(store.is_empty());
        assert!(store.tare_events().is_empty());
        assert_eq!(store.anchor(), None);
        assert_eq!(store.status(), "Connected on test-port");
    }

    #[test]
    fn accepted_samples_are_monotonic_within_a_connection() {
        let (acq, store) = idle_loop();
        for raw in [
            &b"DATA,100,1,1,1\n"[..],
            b"DATA,200,2,1,1\n",
            b"noise\n",
            b"DATA,200,3,0,1\n",
            b"DATA,350,4,0,0\n",
        ] {
            acq.handle_line(raw);
        }
        let snap = store.snapshot();
        assert_eq!(snap.len(), 4);
        assert!(snap.windows(2).all(|w| w[0].timestamp_s <= w[1].timestamp_s));
    }

    #[test]
    fn open_failure_reports_error_and_retries() {
        let store = Arc::new(TimeSeriesStore::default());
        let p = provider(vec![]);
        let opens = Arc::clone(&p.opens);
        let handle = spawn_acquisition(p, Arc::clone(&store), settings(5)).unwrap();

        wait_until("3 tentativas", || opens.load(Ordering::SeqCst) >= 3);
        let status = store.status();
        assert!(status.starts_with("Serial error: "), "{status}");
        assert!(status.ends_with(" — retrying…"), "{status}");
        assert!(!handle.is_finished());

        handle.stop();
    }

    #[test]
    fn reconnect_keeps_samples_and_anchor() {
        let (tx1, rx1) = crossbeam_channel::unbounded();
        let (tx2, rx2) = crossbeam_channel::unbounded();
        let refused = SerialError::Open {
            port: "test-port".into(),
            source: serialport::Error::new(serialport::ErrorKind::NoDevice, "port vanished"),
        };
        let p = provider(vec![Ok(rx1), Err(refused), Ok(rx2)]);
        let opens = Arc::clone(&p.opens);

        let store = Arc::new(TimeSeriesStore::default());
        let handle = spawn_acquisition(p, Arc::clone(&store), settings(100)).unwrap();

        wait_until("primeira conexão", || store.status() == "Connected on test-port");
        tx1.send(Step::Line(b"READY\n")).unwrap();
        tx1.send(Step::Line(b"DATA,1000,100.0,1,1\n")).unwrap();
        tx1.send(Step::Line(b"DATA,2000,800.0,0,1\n")).unwrap();
        wait_until("duas amostras", || store.len() == 2);
        let anchor = store.anchor();
        assert!(anchor.is_some());

        tx1.send(Step::Fault("cable unplugged")).unwrap();
        wait_until("status de erro", || store.status().starts_with("Serial error:"));

        wait_until("reconexão", || {
            opens.load(Ordering::SeqCst) == 3 && store.status() == "Connected on test-port"
        });
        assert_eq!(store.len(), 2);

        // Dispositivo reiniciou: relógio recomeça do zero
        tx2.send(Step::Line(b"DATA,500,900.0,1,0\n")).unwrap();
        tx2.send(Step::Line(b"TARE\n")).unwrap();
        wait_until("tare", || store.tare_events().len() == 1);

        let times: Vec<f64> = store.snapshot().iter().map(|s| s.timestamp_s).collect();
        assert_eq!(times, vec![1.0, 2.0, 0.5]);
        assert_eq!(store.anchor(), anchor);
        assert_eq!(store.status(), "Scale zeroed (TARE)");

        handle.stop();
    }

    #[test]
    fn dropping_the_sender_stops_the_loop() {
        let (_tx, rx_conn) = crossbeam_channel::unbounded::<Step>();
        let store = Arc::new(TimeSeriesStore::default());
        let (shutdown_tx, shutdown_rx) = bounded(1);
        let acq = AcquisitionLoop::new(
            provider(vec![Ok(rx_conn)]),
            Arc::clone(&store),
            settings(5),
            shutdown_rx,
        );
        assert_eq!(acq.state(), LinkState::Disconnected);
        let t = std::thread::spawn(move || acq.run());

        wait_until("conectado", || store.status() == "Connected on test-port");
        drop(shutdown_tx);
        t.join().unwrap();
    }
}
