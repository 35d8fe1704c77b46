use chrono::Utc;

use crate::{
    entities::service::{NewServiceRequest, Service, ServiceInsert, UpdateServiceRequest},
    errors::AppError,
    listing::ListFilter,
    publishing::Publishable,
    repositories::service::ServiceRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct ServiceHandler<R>
where
    R: ServiceRepository,
{
    pub service_repo: R,
}

impl<R> ServiceHandler<R>
where
    R: ServiceRepository,
{
    pub fn new(service_repo: R) -> Self {
        ServiceHandler { service_repo }
    }

    /// Published services in display order.
    pub async fn list_public(&self) -> Result<Vec<Service>, AppError> {
        self.service_repo.list_services(true).await
    }

    pub async fn list_all(&self, filter: &ListFilter) -> Result<Vec<Service>, AppError> {
        let services = self.service_repo.list_services(false).await?;
        Ok(filter.apply(services))
    }

    pub async fn get_service(&self, id: &str) -> Result<Service, AppError> {
        let id = valid_uuid(id)?;
        self.service_repo.get_service(&id).await
    }

    pub async fn create_service(&self, request: NewServiceRequest) -> Result<Service, AppError> {
        let insert = ServiceInsert::try_from(request)?;
        self.service_repo.create_service(&insert).await
    }

    pub async fn update_service(&self, id: &str, request: UpdateServiceRequest) -> Result<Service, AppError> {
        let mut service = self.get_service(id).await?;
        request.apply(&mut service)?;
        self.service_repo.update_service(&service).await
    }

    pub async fn toggle_published(&self, id: &str) -> Result<Service, AppError> {
        let mut service = self.get_service(id).await?;
        service.toggle_published(Utc::now());
        self.service_repo.update_service(&service).await
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.service_repo.delete_service(&id).await
    }
}
