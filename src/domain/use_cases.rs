pub mod auth;
pub mod extractors;
pub mod projects;
pub mod blog;
pub mod snippets;
pub mod contact;
pub mod quotes;
pub mod services;
pub mod service_areas;
pub mod site_settings;
pub mod uploads;
