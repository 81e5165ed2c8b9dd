//! Conexão serial: traits consumidos pelo loop de aquisição e o adaptador
//! real sobre o crate `serialport`.

use std::io::{self, Read};
use std::time::Duration;

/// Linhas maiores que isso sem `\n` são entregues como estão (lixo).
const MAX_PENDING: usize = 4096;

/// Erros de conexão. Todos são recuperáveis pelo loop de aquisição.
#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    #[error("could not open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("device disconnected")]
    Disconnected,

    #[error("{0}")]
    Io(#[from] io::Error),
}

/// Fonte de linhas de uma conexão aberta. Fechada ao sair de escopo.
pub trait LineSource {
    /// Lê uma linha (com terminador). `Ok(None)` = timeout sem dados.
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, SerialError>;
}

/// Abre conexões seriais.
pub trait SerialProvider {
    type Connection: LineSource;

    fn open(
        &mut self,
        port: &str,
        baud: u32,
        read_timeout: Duration,
    ) -> Result<Self::Connection, SerialError>;
}

// ──────────────────────────────────────────────
// serialport
// ──────────────────────────────────────────────

/// Provider real baseado em `serialport`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialPortProvider;

impl SerialProvider for SerialPortProvider {
    type Connection = SerialConnection;

    fn open(
        &mut self,
        port: &str,
        baud: u32,
        read_timeout: Duration,
    ) -> Result<SerialConnection, SerialError> {
        let handle = serialport::new(port, baud)
            .timeout(read_timeout)
            .flow_control(serialport::FlowControl::None)
            .open()
            .map_err(|source| SerialError::Open {
                port: port.to_string(),
                source,
            })?;
        Ok(SerialConnection::new(handle))
    }
}

/// Conexão aberta. Bytes de uma linha incompleta sobrevivem a timeouts.
pub struct SerialConnection {
    port: Box<dyn serialport::SerialPort>,
    pending: Vec<u8>,
}

impl SerialConnection {
    fn new(port: Box<dyn serialport::SerialPort>) -> Self {
        Self {
            port,
            pending: Vec::with_capacity(128),
        }
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        if let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            return Some(self.pending.drain(..=pos).collect());
        }
        if self.pending.len() >= MAX_PENDING {
            return Some(std::mem::take(&mut self.pending));
        }
        None
    }
}

impl LineSource for SerialConnection {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, SerialError> {
        let mut chunk = [0u8; 256];
        loop {
            if let Some(line) = self.take_line() {
                return Ok(Some(line));
            }
            match self.port.read(&mut chunk) {
                // Pronto para leitura mas sem dados: cabo removido
                Ok(0) => return Err(SerialError::Disconnected),
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e)
                    if e.kind() == io::ErrorKind::TimedOut
                        || e.kind() == io::ErrorKind::WouldBlock =>
                {
                    return Ok(None);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}
