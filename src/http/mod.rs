//! Hyper plumbing shared by the controller: the application service,
//! error responses, request helpers and the regex router.

pub mod controller;
pub mod errors;
pub mod request_util;
pub mod router;
