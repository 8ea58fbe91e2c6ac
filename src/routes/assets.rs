use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

/// Site assets compiled into the binary, so the server deploys as a single
/// file with no asset directory beside it. Today this is just the stylesheet
/// the templates link.
#[derive(Embed)]
#[folder = "assets/"]
struct SiteAsset;

/// GET /assets/{*path} — embedded assets never change between releases, so
/// clients may cache them for a week.
pub async fn serve(Path(path): Path<String>) -> Response {
    let Some(file) = SiteAsset::get(&path) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (
                header::CACHE_CONTROL,
                "public, max-age=604800, immutable".to_string(),
            ),
        ],
        file.data.into_owned(),
    )
        .into_response()
}
