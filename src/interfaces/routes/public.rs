use actix_web::web;

use crate::handlers::{
    blog_posts, contact, projects, quotes, service_areas, services, settings, snippets,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/projects", web::get().to(projects::list_projects))
        .route("/projects/{slug}", web::get().to(projects::get_project_by_slug))
        .route("/blog/posts", web::get().to(blog_posts::list_blog_posts))
        .route("/blog/posts/featured", web::get().to(blog_posts::list_featured_blog_posts))
        .route("/blog/posts/{slug}", web::get().to(blog_posts::get_blog_post_by_slug))
        .route("/snippets", web::get().to(snippets::list_snippets))
        .route("/snippets/{slug}", web::get().to(snippets::get_snippet_by_slug))
        .route("/services", web::get().to(services::list_services))
        .route("/service-areas", web::get().to(service_areas::list_service_areas))
        .route("/service-areas/{slug}", web::get().to(service_areas::get_service_area_by_slug))
        .route("/settings", web::get().to(settings::get_site_settings))
        .route("/contact", web::post().to(contact::submit_contact_form))
        .route("/quotes", web::post().to(quotes::submit_quote_request));
}
