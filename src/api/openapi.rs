//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, authors, books, health, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lectern API",
        version = "0.1.0",
        description = "Library Lending REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        // Authors
        authors::create_author,
        authors::list_authors,
        authors::get_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::create_book,
        books::list_books,
        books::get_book,
        books::update_book,
        books::delete_book,
        // Loans
        loans::take_book,
        loans::return_book,
        // Users
        users::list_users,
        users::register_new,
        users::update_user,
        users::update_my_profile,
    ),
    components(
        schemas(
            crate::error::ErrorResponse,
            health::HealthResponse,
            crate::models::user::UserPublic,
            crate::models::user::CreateUser,
            crate::models::user::LoginUser,
            crate::models::user::Token,
            crate::models::user::AdminRegisterUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateProfile,
            crate::models::user::Role,
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::CreateBook,
            crate::models::loan::Loan,
            crate::models::loan::LoanDetails,
            crate::models::loan::ReturnReceipt,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "auth", description = "Registration and login"),
        (name = "authors", description = "Author catalog"),
        (name = "books", description = "Book catalog"),
        (name = "loans", description = "Borrow and return"),
        (name = "users", description = "User administration")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/docs/openapi.json", ApiDoc::openapi()))
}
