pub mod sqlx_repo;
pub mod user;
pub mod token;
pub mod project;
pub mod blog_post;
pub mod code_snippet;
pub mod contact_message;
pub mod quote_request;
pub mod service;
pub mod service_area;
pub mod site_setting;
