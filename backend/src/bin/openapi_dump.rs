//! Print the OpenAPI document as JSON.

use backend::ApiDoc;
use color_eyre::eyre::WrapErr;
use utoipa::OpenApi;

fn main() -> color_eyre::Result<()> {
    let document = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("failed to render OpenAPI document")?;
    println!("{document}");
    Ok(())
}
