use std::sync::Arc;

use tracing::info;

use crate::clients::CmmsApiClient;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::notification::InboxSnapshot;
use crate::utils::errors::AppResult;

pub struct NotificationController {
    client: Arc<CmmsApiClient>,
}

impl NotificationController {
    pub fn new(client: Arc<CmmsApiClient>) -> Self {
        Self { client }
    }

    /// Última bandeja publicada; si el poller aún no leyó nada se consulta ahora
    pub async fn inbox(&self, user: &AuthenticatedUser) -> AppResult<InboxSnapshot> {
        match user.session.inbox().snapshot().await {
            Some(snapshot) => Ok(snapshot),
            None => self.refresh(user).await,
        }
    }

    pub async fn refresh(&self, user: &AuthenticatedUser) -> AppResult<InboxSnapshot> {
        user.session
            .inbox()
            .refresh(self.client.as_ref(), user.token())
            .await
    }

    pub async fn mark_read(&self, user: &AuthenticatedUser, id: &str) -> AppResult<InboxSnapshot> {
        self.client.mark_notification_read(user.token(), id).await?;
        info!("📭 Notificación {} marcada como leída", id);
        self.refresh(user).await
    }
}
