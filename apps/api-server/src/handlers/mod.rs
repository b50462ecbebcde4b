//! HTTP handlers and route configuration.

mod authors;
mod categories;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
///
/// Fixed segments such as `/count` are registered before `/{id}` so they
/// are not captured as ids.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/authors")
                    .route("", web::get().to(authors::list))
                    .route("", web::post().to(authors::create))
                    .route("/count", web::get().to(authors::count))
                    .route("/search", web::get().to(authors::search))
                    .route("/exists", web::get().to(authors::exists))
                    .route("/with-counts", web::get().to(authors::with_counts))
                    .route("/{id}", web::get().to(authors::get))
                    .route("/{id}", web::put().to(authors::update))
                    .route("/{id}", web::delete().to(authors::delete)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::get().to(categories::list))
                    .route("", web::post().to(categories::create))
                    .route("/search", web::get().to(categories::search))
                    .route("/exists", web::get().to(categories::exists))
                    .route("/{id}", web::get().to(categories::get))
                    .route("/{id}", web::put().to(categories::update))
                    .route("/{id}", web::delete().to(categories::delete)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_paged))
                    .route("", web::post().to(posts::create))
                    .route("/summaries", web::get().to(posts::summaries))
                    .route("/count", web::get().to(posts::count))
                    .route("/search", web::get().to(posts::search))
                    .route("/author/{author_id}", web::get().to(posts::by_author))
                    .route("/category/{category_id}", web::get().to(posts::by_category))
                    .route("/{id}", web::get().to(posts::get))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route(
                        "/{post_id}/author/{author_id}",
                        web::put().to(posts::assign_author),
                    )
                    .route(
                        "/{post_id}/category/{category_id}",
                        web::put().to(posts::assign_category),
                    )
                    .route(
                        "/{post_id}/category/{category_id}",
                        web::delete().to(posts::remove_category),
                    ),
            ),
    );
}

/// Converts each domain value into its response shape.
fn responses<T, R: From<T>>(items: Vec<T>) -> Vec<R> {
    items.into_iter().map(R::from).collect()
}
