//! Caller identity extraction.
//!
//! Identity travels as the `client_id` query parameter and is trusted as-is;
//! there is no authentication layer. The extractor only insists the
//! parameter is present so handlers always have a caller to resolve.

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};

use crate::domain::{ClientId, Error};

use super::error::ApiError;

/// The caller identity attached to a request.
#[derive(Debug, Clone)]
pub struct CallerIdentity(ClientId);

impl CallerIdentity {
    /// The opaque client identifier supplied by the caller.
    pub fn client_id(&self) -> &ClientId {
        &self.0
    }
}

fn extract_client_id(query: &str) -> Option<ClientId> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "client_id")
        .map(|(_, value)| ClientId::new(value.into_owned()))
}

impl FromRequest for CallerIdentity {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = extract_client_id(req.query_string())
            .map(CallerIdentity)
            .ok_or_else(|| {
                ApiError::from(Error::invalid_request(
                    "client_id query parameter is required",
                ))
            });
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as http_test;
    use actix_web::{App, HttpResponse, web};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("client_id=caller-1", Some("caller-1"))]
    #[case("types=fuel&client_id=caller-1", Some("caller-1"))]
    #[case("client_id=", Some(""))]
    #[case("types=fuel", None)]
    #[case("", None)]
    fn client_id_is_read_from_the_query_string(
        #[case] query: &str,
        #[case] expected: Option<&str>,
    ) {
        let found = extract_client_id(query);
        assert_eq!(found.as_ref().map(ClientId::as_str), expected);
    }

    #[actix_web::test]
    async fn missing_client_id_is_an_invalid_request() {
        let app = http_test::init_service(App::new().route(
            "/probe",
            web::get().to(|caller: CallerIdentity| async move {
                HttpResponse::Ok().body(caller.client_id().to_string())
            }),
        ))
        .await;

        let missing = http_test::TestRequest::get().uri("/probe").to_request();
        let response = http_test::call_service(&app, missing).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let present = http_test::TestRequest::get()
            .uri("/probe?client_id=caller-1")
            .to_request();
        let response = http_test::call_service(&app, present).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = http_test::read_body(response).await;
        assert_eq!(body, "caller-1");
    }
}
