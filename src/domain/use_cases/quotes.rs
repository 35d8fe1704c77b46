use validator::Validate;

use crate::{
    entities::quote_request::{QuoteForm, QuoteRequest, QuoteRequestResponse, QuoteStatus},
    errors::AppError,
    listing::ListFilter,
    repositories::quote_request::QuoteRequestRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct QuoteRequestHandler<R>
where
    R: QuoteRequestRepository,
{
    pub quote_repo: R,
}

impl<R> QuoteRequestHandler<R>
where
    R: QuoteRequestRepository,
{
    pub fn new(quote_repo: R) -> Self {
        QuoteRequestHandler { quote_repo }
    }

    /// Stores a quote request as `pending`.
    pub async fn submit(&self, form: QuoteForm) -> Result<QuoteRequest, AppError> {
        let form = form.normalized();
        form.validate()?;

        let quote = self.quote_repo.create_quote(&form).await?;
        tracing::info!(quote_id = %quote.id, project_type = %quote.project_type, "Quote request received");
        Ok(quote)
    }

    pub async fn list_quotes(&self, filter: &ListFilter) -> Result<Vec<QuoteRequestResponse>, AppError> {
        let quotes = self.quote_repo.list_quotes().await?;
        Ok(filter
            .apply(quotes)
            .into_iter()
            .map(QuoteRequestResponse::from)
            .collect())
    }

    pub async fn get_quote(&self, id: &str) -> Result<QuoteRequestResponse, AppError> {
        let id = valid_uuid(id)?;
        self.quote_repo.get_quote(&id).await.map(QuoteRequestResponse::from)
    }

    pub async fn set_status(&self, id: &str, status: QuoteStatus) -> Result<QuoteRequestResponse, AppError> {
        let id = valid_uuid(id)?;
        self.quote_repo
            .set_quote_status(&id, status)
            .await
            .map(QuoteRequestResponse::from)
    }

    pub async fn delete_quote(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.quote_repo.delete_quote(&id).await
    }
}
