use std::collections::HashMap;
use std::str;

use futures::future;
use futures::prelude::*;
use hyper;
use hyper::header::Authorization;
use hyper::Headers;
use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use serde_json;
use url::form_urlencoded;

use super::errors::ControllerError;
use errors::AuthorizationError;
use models::UserId;

pub type ControllerFuture = Box<Future<Item = String, Error = ControllerError>>;

/// Reads the whole body and deserializes it from JSON
pub fn parse_body<T>(body: hyper::Body) -> Box<Future<Item = T, Error = ControllerError>>
where
    T: DeserializeOwned + 'static,
{
    Box::new(
        body.concat2()
            .map_err(|e| ControllerError::UnprocessableEntity(format_err!("Failed to read request body: {}", e)))
            .and_then(|chunk| serde_json::from_slice::<T>(&chunk).map_err(|e| ControllerError::UnprocessableEntity(e.into()))),
    )
}

/// Serializes the future's item into a JSON body
pub fn serialize_future<T, E, F>(f: F) -> ControllerFuture
where
    F: IntoFuture<Item = T, Error = E> + 'static,
    F::Future: 'static,
    E: 'static,
    ControllerError: From<E>,
    T: Serialize + 'static,
{
    Box::new(
        f.into_future()
            .map_err(ControllerError::from)
            .and_then(|resp| serde_json::to_string(&resp).map_err(|e| ControllerError::InternalServerError(e.into()))),
    )
}

/// Decodes `a=1&b=two` into a map, later keys win
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

/// Caller id from the `Authorization` header, `None` when the header is absent
pub fn extract_user_id(headers: &Headers) -> Box<Future<Item = Option<UserId>, Error = ControllerError>> {
    let raw = headers.get::<Authorization<String>>().map(|auth| auth.0.clone());

    Box::new(
        future::result(match raw {
            None => Ok(None),
            Some(string_id) => string_id.trim().parse::<UserId>().map(Some).map_err(|e| {
                ControllerError::BadRequest(
                    AuthorizationError::Parse {
                        raw: string_id.clone(),
                        error: format_err!("{}", e),
                    }.into(),
                )
            }),
        }).inspect(|user_id| {
            if let Some(user_id) = user_id {
                debug!("Extracted user_id: {}", user_id);
            }
        }),
    )
}

pub fn extract_user_agent(headers: &Headers) -> Option<String> {
    headers
        .get_raw("User-Agent")
        .and_then(|raw| raw.one())
        .and_then(|bytes| str::from_utf8(bytes).ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_is_percent_decoded() {
        let query = parse_query(Some("search=real%20madrid&league=La+Liga&availability=available"));

        assert_eq!(query["search"], "real madrid");
        assert_eq!(query["league"], "La Liga");
        assert_eq!(query["availability"], "available");
        assert!(parse_query(None).is_empty());
    }

    #[test]
    fn malformed_user_id_is_bad_request() {
        let mut headers = Headers::new();
        headers.set(Authorization("not-a-uuid".to_string()));

        match extract_user_id(&headers).wait() {
            Err(ControllerError::BadRequest(_)) => {}
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_header_means_anonymous() {
        assert_eq!(extract_user_id(&Headers::new()).wait().unwrap(), None);
    }
}
