//! Polling de notificaciones por sesión
//!
//! Cada sesión es dueña de un `NotificationPoller`. El poller refresca la
//! bandeja cada cierto intervalo hasta que vence la sesión, se llama a
//! `stop` o se suelta el valor; en ese caso la tarea se aborta y no queda
//! ningún timer vivo.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::models::notification::{InboxSnapshot, Notification};
use crate::models::pagination::Paginated;
use crate::utils::errors::AppResult;
use crate::utils::sequencing::SequencedSlot;

/// Origen de las notificaciones no leídas
#[async_trait]
pub trait NotificationSource: Send + Sync + 'static {
    async fn unread_notifications(&self, token: &str) -> AppResult<Paginated<Notification>>;
}

/// Bandeja de notificaciones de una sesión
#[derive(Debug, Default)]
pub struct NotificationInbox {
    slot: SequencedSlot<InboxSnapshot>,
}

impl NotificationInbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consultar el backend y publicar el resultado.
    ///
    /// Si mientras tanto se publicó una lectura iniciada después, se descarta
    /// la propia y se devuelve la más reciente.
    pub async fn refresh(
        &self,
        source: &dyn NotificationSource,
        token: &str,
    ) -> AppResult<InboxSnapshot> {
        let ticket = self.slot.begin();
        let page = source.unread_notifications(token).await?;

        let snapshot = InboxSnapshot {
            unread_count: page.count,
            notifications: page.results,
            fetched_at: Utc::now(),
        };

        if !self.slot.publish(ticket, snapshot.clone()).await {
            debug!("🔕 Lectura #{} descartada: ya hay una más reciente", ticket.sequence());
        }

        Ok(self.slot.snapshot().await.unwrap_or(snapshot))
    }

    pub async fn snapshot(&self) -> Option<InboxSnapshot> {
        self.slot.snapshot().await
    }
}

/// Tarea periódica que mantiene la bandeja al día
pub struct NotificationPoller {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl NotificationPoller {
    /// Arrancar el polling. La tarea termina sola al llegar a `until`
    /// (el vencimiento de la sesión) aunque nadie llame a `stop`.
    pub fn start(
        source: Arc<dyn NotificationSource>,
        token: String,
        inbox: Arc<NotificationInbox>,
        every: Duration,
        until: Instant,
    ) -> Self {
        let (shutdown, mut stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let expired = tokio::time::sleep_until(until);
            tokio::pin!(expired);

            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => break,
                    _ = &mut expired => {
                        debug!("⌛ Sesión vencida, fin del polling");
                        break;
                    }
                    _ = ticker.tick() => {
                        tokio::select! {
                            _ = &mut stop_rx => break,
                            result = inbox.refresh(source.as_ref(), &token) => {
                                // Un fallo de fondo no interrumpe el polling
                                if let Err(e) = result {
                                    warn!("⚠️ No se pudieron actualizar las notificaciones: {}", e);
                                }
                            }
                        }
                    }
                }
            }

            debug!("🛑 Polling de notificaciones detenido");
        });

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Detener el polling y esperar a que la tarea termine
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
