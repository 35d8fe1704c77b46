pub mod auth;
pub mod blog_posts;
pub mod contact;
pub mod form_limits;
pub mod home;
pub mod projects;
pub mod quotes;
pub mod service_areas;
pub mod services;
pub mod settings;
pub mod snippets;
pub mod system;
pub mod uploads;
