use crate::{
    entities::service_area::{
        NewServiceAreaRequest, ServiceArea, ServiceAreaInsert, UpdateServiceAreaRequest,
    },
    errors::AppError,
    listing::ListFilter,
    repositories::service_area::ServiceAreaRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct ServiceAreaHandler<R>
where
    R: ServiceAreaRepository,
{
    pub area_repo: R,
}

impl<R> ServiceAreaHandler<R>
where
    R: ServiceAreaRepository,
{
    pub fn new(area_repo: R) -> Self {
        ServiceAreaHandler { area_repo }
    }

    pub async fn list_public(&self, filter: &ListFilter) -> Result<Vec<ServiceArea>, AppError> {
        let areas = self.area_repo.list_service_areas(true).await?;
        Ok(filter.apply(areas))
    }

    pub async fn list_all(&self, filter: &ListFilter) -> Result<Vec<ServiceArea>, AppError> {
        let areas = self.area_repo.list_service_areas(false).await?;
        Ok(filter.apply(areas))
    }

    pub async fn get_active(&self, slug: &str) -> Result<ServiceArea, AppError> {
        self.area_repo.get_service_area_by_slug(slug, true).await
    }

    pub async fn get_service_area(&self, id: &str) -> Result<ServiceArea, AppError> {
        let id = valid_uuid(id)?;
        self.area_repo.get_service_area_by_id(&id).await
    }

    pub async fn create_service_area(&self, request: NewServiceAreaRequest) -> Result<ServiceArea, AppError> {
        let insert = ServiceAreaInsert::try_from(request)?;
        self.area_repo.create_service_area(&insert).await
    }

    pub async fn update_service_area(
        &self,
        id: &str,
        request: UpdateServiceAreaRequest,
    ) -> Result<ServiceArea, AppError> {
        let mut area = self.get_service_area(id).await?;
        request.apply(&mut area)?;
        self.area_repo.update_service_area(&area).await
    }

    /// Flips `active` and persists it.
    pub async fn toggle_active(&self, id: &str) -> Result<ServiceArea, AppError> {
        let mut area = self.get_service_area(id).await?;
        let active = area.toggle_active();
        let saved = self.area_repo.update_service_area(&area).await?;
        tracing::info!(area_id = %saved.id, active, "Service area visibility changed");
        Ok(saved)
    }

    pub async fn delete_service_area(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.area_repo.delete_service_area(&id).await
    }
}
