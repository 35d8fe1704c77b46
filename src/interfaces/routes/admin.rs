use actix_web::web;

use crate::handlers::{
    blog_posts, contact, projects, quotes, service_areas, services, settings, snippets, system,
    uploads,
};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/health", web::get().to(system::admin_health_check))
            .service(
                web::scope("/projects")
                    .service(
                        web::resource("")
                            .route(web::get().to(projects::admin_list_projects))
                            .route(web::post().to(projects::create_project)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(projects::admin_get_project))
                            .route(web::patch().to(projects::update_project))
                            .route(web::delete().to(projects::delete_project)),
                    )
                    .route("/{id}/toggle-published", web::post().to(projects::toggle_project_published))
                    .route("/{id}/toggle-featured", web::post().to(projects::toggle_project_featured)),
            )
            .service(
                web::scope("/blog/posts")
                    .service(
                        web::resource("")
                            .route(web::get().to(blog_posts::admin_list_blog_posts))
                            .route(web::post().to(blog_posts::create_blog_post)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(blog_posts::admin_get_blog_post))
                            .route(web::patch().to(blog_posts::update_blog_post))
                            .route(web::delete().to(blog_posts::delete_blog_post)),
                    )
                    .route("/{id}/toggle-published", web::post().to(blog_posts::toggle_blog_post_published))
                    .route("/{id}/toggle-featured", web::post().to(blog_posts::toggle_blog_post_featured)),
            )
            .service(
                web::scope("/snippets")
                    .service(
                        web::resource("")
                            .route(web::get().to(snippets::admin_list_snippets))
                            .route(web::post().to(snippets::create_snippet)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(snippets::admin_get_snippet))
                            .route(web::patch().to(snippets::update_snippet))
                            .route(web::delete().to(snippets::delete_snippet)),
                    )
                    .route("/{id}/toggle-published", web::post().to(snippets::toggle_snippet_published)),
            )
            .service(
                web::scope("/services")
                    .service(
                        web::resource("")
                            .route(web::get().to(services::admin_list_services))
                            .route(web::post().to(services::create_service)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(services::admin_get_service))
                            .route(web::patch().to(services::update_service))
                            .route(web::delete().to(services::delete_service)),
                    )
                    .route("/{id}/toggle-published", web::post().to(services::toggle_service_published)),
            )
            .service(
                web::scope("/service-areas")
                    .service(
                        web::resource("")
                            .route(web::get().to(service_areas::admin_list_service_areas))
                            .route(web::post().to(service_areas::create_service_area)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(service_areas::admin_get_service_area))
                            .route(web::patch().to(service_areas::update_service_area))
                            .route(web::delete().to(service_areas::delete_service_area)),
                    )
                    .route("/{id}/toggle-active", web::post().to(service_areas::toggle_service_area_active)),
            )
            .service(
                web::scope("/messages")
                    .route("", web::get().to(contact::list_messages))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(contact::get_message))
                            .route(web::delete().to(contact::delete_message)),
                    )
                    .route("/{id}/status", web::patch().to(contact::set_message_status)),
            )
            .service(
                web::scope("/quotes")
                    .route("", web::get().to(quotes::list_quotes))
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(quotes::get_quote))
                            .route(web::delete().to(quotes::delete_quote)),
                    )
                    .route("/{id}/status", web::patch().to(quotes::set_quote_status)),
            )
            .service(
                web::scope("/settings")
                    .route("", web::get().to(settings::admin_list_settings))
                    .service(
                        web::resource("/{key}")
                            .route(web::put().to(settings::upsert_setting))
                            .route(web::delete().to(settings::delete_setting)),
                    ),
            )
            .route("/uploads", web::post().to(uploads::upload_image)),
    );
}
