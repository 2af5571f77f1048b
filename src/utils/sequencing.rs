//! Secuenciación de respuestas
//!
//! Varias lecturas en vuelo pueden escribir el mismo estado compartido
//! (polling periódico y refrescos manuales de notificaciones). Cada lectura
//! toma un ticket al empezar; al terminar sólo publica si ningún ticket más
//! nuevo publicó antes. Una respuesta lenta y vieja nunca pisa una reciente.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

/// Ticket emitido al iniciar una lectura
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Slot<T> {
    published: u64,
    value: Option<T>,
}

/// Valor compartido donde gana la lectura iniciada más recientemente
#[derive(Debug)]
pub struct SequencedSlot<T> {
    issued: AtomicU64,
    slot: RwLock<Slot<T>>,
}

impl<T: Clone> SequencedSlot<T> {
    pub fn new() -> Self {
        Self {
            issued: AtomicU64::new(0),
            slot: RwLock::new(Slot {
                published: 0,
                value: None,
            }),
        }
    }

    /// Reservar un ticket antes de lanzar la lectura
    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Publicar el resultado de la lectura `ticket`.
    /// Devuelve `false` si ya se publicó una lectura más nueva.
    pub async fn publish(&self, ticket: FetchTicket, value: T) -> bool {
        let mut slot = self.slot.write().await;
        if ticket.0 <= slot.published {
            return false;
        }
        slot.published = ticket.0;
        slot.value = Some(value);
        true
    }

    pub async fn snapshot(&self) -> Option<T> {
        self.slot.read().await.value.clone()
    }
}

impl<T: Clone> Default for SequencedSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
