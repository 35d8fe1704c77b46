pub mod get_client_ip;
pub mod rich_text;
pub mod text;
pub mod valid_uuid;
