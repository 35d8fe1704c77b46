use validator::Validate;

use crate::{
    entities::contact_message::{ContactForm, ContactMessage, MessageStatus},
    errors::AppError,
    listing::ListFilter,
    repositories::contact_message::ContactMessageRepository,
    utils::valid_uuid::valid_uuid,
};

pub struct ContactMessageHandler<R>
where
    R: ContactMessageRepository,
{
    pub message_repo: R,
}

impl<R> ContactMessageHandler<R>
where
    R: ContactMessageRepository,
{
    pub fn new(message_repo: R) -> Self {
        ContactMessageHandler { message_repo }
    }

    /// Stores a contact form submission as `unread`.
    pub async fn submit(&self, form: ContactForm) -> Result<ContactMessage, AppError> {
        let form = form.normalized();
        form.validate()?;

        let message = self.message_repo.create_message(&form).await?;
        tracing::info!(message_id = %message.id, "Contact message received");
        Ok(message)
    }

    pub async fn list_messages(&self, filter: &ListFilter) -> Result<Vec<ContactMessage>, AppError> {
        let messages = self.message_repo.list_messages().await?;
        Ok(filter.apply(messages))
    }

    pub async fn get_message(&self, id: &str) -> Result<ContactMessage, AppError> {
        let id = valid_uuid(id)?;
        self.message_repo.get_message(&id).await
    }

    pub async fn set_status(&self, id: &str, status: MessageStatus) -> Result<ContactMessage, AppError> {
        let id = valid_uuid(id)?;
        self.message_repo.set_message_status(&id, status).await
    }

    pub async fn delete_message(&self, id: &str) -> Result<(), AppError> {
        let id = valid_uuid(id)?;
        self.message_repo.delete_message(&id).await
    }
}
