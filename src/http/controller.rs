use futures::prelude::*;
use hyper;
use hyper::header::{ContentLength, ContentType};
use hyper::server::{Request, Response, Service};
use hyper::StatusCode;

use super::request_util::ControllerFuture;

/// Turns a request into a JSON body or a controller error
pub trait Controller {
    fn call(&self, request: Request) -> ControllerFuture;
}

/// Hyper service wrapping a controller
pub struct Application {
    pub controller: Box<Controller>,
}

impl Service for Application {
    type Request = Request;
    type Response = Response;
    type Error = hyper::Error;
    type Future = Box<Future<Item = Response, Error = hyper::Error>>;

    fn call(&self, request: Request) -> Self::Future {
        debug!("Received request: {} {}", request.method(), request.path());

        Box::new(self.controller.call(request).then(|res| -> Result<Response, hyper::Error> {
            match res {
                Ok(body) => Ok(response_with_body(StatusCode::Ok, body)),
                Err(e) => {
                    let status = e.code();
                    if status == StatusCode::InternalServerError {
                        error!("Request failed: {}", e);
                    } else {
                        debug!("Request rejected with {}: {}", status, e);
                    }
                    Ok(response_with_body(status, e.payload().to_string()))
                }
            }
        }))
    }
}

fn response_with_body(status: StatusCode, body: String) -> Response {
    Response::new()
        .with_status(status)
        .with_header(ContentType::json())
        .with_header(ContentLength(body.len() as u64))
        .with_body(body)
}
