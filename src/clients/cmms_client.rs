//! Cliente HTTP del backend CMMS
//!
//! Un método por endpoint del backend, con cuerpos tipados. Las respuestas
//! no exitosas se convierten en `AppError::ServerRejected` conservando el
//! mensaje del servidor tal cual.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::dto::auth_dto::{BackendLoginResponse, LoginRequest, LogoutBackendRequest};
use crate::dto::maintenance_dto::{
    CompletePlanRequest, CreatePlanRequest, PauseResumeRequest, UpdatePlanRequest,
    UpdateUsageRequest,
};
use crate::dto::work_order_dto::{
    CompleteWorkOrderRequest, CreateWorkOrderRequest, TransitionStatusRequest,
    UpdateWorkOrderRequest,
};
use crate::models::asset::{Asset, AssetPayload, LocationOption};
use crate::models::maintenance_plan::MaintenancePlan;
use crate::models::notification::Notification;
use crate::models::pagination::{DataEnvelope, ListQuery, Paginated};
use crate::models::work_order::WorkOrder;
use crate::services::notification_poller::NotificationSource;
use crate::utils::errors::{AppError, AppResult, ServerRejection};

/// Cliente del backend CMMS
#[derive(Debug, Clone)]
pub struct CmmsApiClient {
    client: Client,
    base_url: String,
}

impl CmmsApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("No se pudo crear el cliente HTTP: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        debug!("📡 {} {}", method, path);
        self.client.request(method, self.url(path)).bearer_auth(token)
    }

    /// Convertir una respuesta no exitosa en `ServerRejected`
    async fn check(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let fallback = status
            .canonical_reason()
            .unwrap_or("Error inesperado del servidor");
        let rejection = ServerRejection::from_body(&body, fallback);
        warn!("📡 Backend respondió {}: {}", status.as_u16(), rejection);

        Err(AppError::ServerRejected {
            status: status.as_u16(),
            rejection,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> AppResult<T> {
        let response = Self::check(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    async fn dispatch(&self, request: RequestBuilder) -> AppResult<()> {
        Self::check(request.send().await?).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, token: &str, path: &str) -> AppResult<T> {
        self.fetch(self.request(Method::GET, path, token)).await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<Paginated<T>> {
        self.fetch(self.request(Method::GET, path, token).query(query))
            .await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        token: &str,
        path: &str,
        body: &B,
    ) -> AppResult<T> {
        self.fetch(self.request(method, path, token).json(body)).await
    }

    async fn count(&self, token: &str, path: &str, filters: &[(&str, &str)]) -> AppResult<u64> {
        let mut query: Vec<(&str, String)> = filters
            .iter()
            .map(|(key, value)| (*key, value.to_string()))
            .collect();
        query.push(("page_size", "1".to_string()));
        let page: Paginated<serde_json::Value> = self.get_page(token, path, &query).await?;
        Ok(page.count)
    }

    // ---- Autenticación ----

    pub async fn login(&self, request: &LoginRequest) -> AppResult<BackendLoginResponse> {
        self.fetch(self.client.post(self.url("auth/login/")).json(request))
            .await
    }

    pub async fn logout(&self, token: &str, request: &LogoutBackendRequest) -> AppResult<()> {
        self.dispatch(self.request(Method::POST, "auth/logout/", token).json(request))
            .await
    }

    // ---- Activos ----

    pub async fn list_assets(&self, token: &str, query: &ListQuery) -> AppResult<Paginated<Asset>> {
        self.get_page(token, "assets/", &query.to_pairs()).await
    }

    pub async fn get_asset(&self, token: &str, id: &str) -> AppResult<Asset> {
        self.get(token, &format!("assets/{}/", id)).await
    }

    pub async fn create_asset(&self, token: &str, payload: &AssetPayload) -> AppResult<Asset> {
        self.send_json(Method::POST, token, "assets/", payload).await
    }

    pub async fn update_asset(
        &self,
        token: &str,
        id: &str,
        payload: &AssetPayload,
    ) -> AppResult<Asset> {
        self.send_json(Method::PUT, token, &format!("assets/{}/", id), payload)
            .await
    }

    /// El backend archiva el activo en lugar de borrarlo
    pub async fn archive_asset(&self, token: &str, id: &str) -> AppResult<()> {
        self.dispatch(self.request(Method::DELETE, &format!("assets/{}/", id), token))
            .await
    }

    pub async fn list_locations(&self, token: &str) -> AppResult<Vec<LocationOption>> {
        let query = [("page_size", "500".to_string())];
        let page: Paginated<LocationOption> = self.get_page(token, "locations/", &query).await?;
        Ok(page.results)
    }

    // ---- Órdenes de trabajo ----

    pub async fn list_work_orders(
        &self,
        token: &str,
        query: &ListQuery,
    ) -> AppResult<Paginated<WorkOrder>> {
        self.get_page(token, "work-orders/", &query.to_pairs()).await
    }

    pub async fn get_work_order(&self, token: &str, id: &str) -> AppResult<WorkOrder> {
        self.get(token, &format!("work-orders/{}/", id)).await
    }

    pub async fn create_work_order(
        &self,
        token: &str,
        request: &CreateWorkOrderRequest,
    ) -> AppResult<WorkOrder> {
        self.send_json(Method::POST, token, "work-orders/", request)
            .await
    }

    pub async fn update_work_order(
        &self,
        token: &str,
        id: &str,
        request: &UpdateWorkOrderRequest,
    ) -> AppResult<WorkOrder> {
        self.send_json(Method::PATCH, token, &format!("work-orders/{}/", id), request)
            .await
    }

    pub async fn delete_work_order(&self, token: &str, id: &str) -> AppResult<()> {
        self.dispatch(self.request(Method::DELETE, &format!("work-orders/{}/", id), token))
            .await
    }

    pub async fn transition_work_order_status(
        &self,
        token: &str,
        id: &str,
        request: &TransitionStatusRequest,
    ) -> AppResult<()> {
        let path = format!("work-orders/{}/transition_status/", id);
        self.dispatch(self.request(Method::POST, &path, token).json(request))
            .await
    }

    pub async fn complete_work_order(
        &self,
        token: &str,
        id: &str,
        request: &CompleteWorkOrderRequest,
    ) -> AppResult<()> {
        let path = format!("work-orders/{}/complete/", id);
        self.dispatch(self.request(Method::POST, &path, token).json(request))
            .await
    }

    pub async fn count_work_orders(&self, token: &str, status: &str) -> AppResult<u64> {
        self.count(token, "work-orders/", &[("status", status)]).await
    }

    // ---- Planes de mantenimiento ----

    pub async fn list_plans(
        &self,
        token: &str,
        query: &ListQuery,
    ) -> AppResult<Paginated<MaintenancePlan>> {
        self.get_page(token, "maintenance/plans/", &query.to_pairs())
            .await
    }

    pub async fn get_plan(&self, token: &str, id: &str) -> AppResult<MaintenancePlan> {
        self.get(token, &format!("maintenance/plans/{}/", id)).await
    }

    pub async fn create_plan(
        &self,
        token: &str,
        request: &CreatePlanRequest,
    ) -> AppResult<MaintenancePlan> {
        self.send_json(Method::POST, token, "maintenance/plans/", request)
            .await
    }

    pub async fn update_plan(
        &self,
        token: &str,
        id: &str,
        request: &UpdatePlanRequest,
    ) -> AppResult<MaintenancePlan> {
        let path = format!("maintenance/plans/{}/", id);
        self.send_json(Method::PATCH, token, &path, request).await
    }

    pub async fn delete_plan(&self, token: &str, id: &str) -> AppResult<()> {
        let path = format!("maintenance/plans/{}/", id);
        self.dispatch(self.request(Method::DELETE, &path, token))
            .await
    }

    pub async fn pause_resume_plan(
        &self,
        token: &str,
        id: &str,
        request: &PauseResumeRequest,
    ) -> AppResult<MaintenancePlan> {
        let path = format!("maintenance/plans/{}/pause_resume/", id);
        let envelope: DataEnvelope<MaintenancePlan> =
            self.send_json(Method::POST, token, &path, request).await?;
        Ok(envelope.data)
    }

    pub async fn complete_plan(
        &self,
        token: &str,
        id: &str,
        request: &CompletePlanRequest,
    ) -> AppResult<MaintenancePlan> {
        let path = format!("maintenance/plans/{}/complete/", id);
        let envelope: DataEnvelope<MaintenancePlan> =
            self.send_json(Method::POST, token, &path, request).await?;
        Ok(envelope.data)
    }

    pub async fn update_plan_usage(
        &self,
        token: &str,
        id: &str,
        request: &UpdateUsageRequest,
    ) -> AppResult<()> {
        let path = format!("maintenance/plans/{}/update_usage/", id);
        self.dispatch(self.request(Method::POST, &path, token).json(request))
            .await
    }

    pub async fn count_plans(&self, token: &str, flag: &str) -> AppResult<u64> {
        self.count(token, "maintenance/plans/", &[(flag, "true")]).await
    }

    // ---- Notificaciones ----

    pub async fn list_unread_notifications(
        &self,
        token: &str,
    ) -> AppResult<Paginated<Notification>> {
        let query = [("is_read", "false".to_string())];
        self.get_page(token, "notifications/", &query).await
    }

    pub async fn mark_notification_read(&self, token: &str, id: &str) -> AppResult<()> {
        let path = format!("notifications/{}/mark_read/", id);
        self.dispatch(self.request(Method::POST, &path, token))
            .await
    }
}

#[async_trait]
impl NotificationSource for CmmsApiClient {
    async fn unread_notifications(&self, token: &str) -> AppResult<Paginated<Notification>> {
        self.list_unread_notifications(token).await
    }
}
