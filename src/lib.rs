extern crate chrono;
extern crate config as config_crate;
#[macro_use]
extern crate derive_more;
#[macro_use]
extern crate failure;
extern crate futures;
extern crate futures_cpupool;
extern crate hyper;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate maplit;
extern crate percent_encoding;
extern crate postgres;
extern crate r2d2;
extern crate r2d2_postgres;
extern crate rand;
extern crate regex;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;
extern crate tokio_core;
extern crate url;
extern crate uuid;
extern crate validator;
#[macro_use]
extern crate validator_derive;

pub mod acl;
pub mod config;
pub mod controller;
pub mod errors;
pub mod http;
pub mod migrations;
pub mod models;
pub mod repos;
pub mod services;
pub mod types;
pub mod util;
pub mod whatsapp;

use std::sync::Arc;

use failure::Error as FailureError;
use futures::future;
use futures::prelude::*;
use futures_cpupool::CpuPool;
use hyper::server::Http;
use tokio_core::reactor::Core;

use config::Config;
use controller::{ControllerImpl, ServiceFactory};
use http::controller::Application;
use repos::PgRepoPool;

/// Starts the HTTP server and blocks until the reactor stops.
pub fn start_server(config: Config) -> Result<(), FailureError> {
    let mut core = Core::new()?;
    let handle = core.handle();

    let db_pool = repos::pg::create_pool(&config.db.dsn, config.db.pool_size)?;
    migrations::run(&db_pool)?;

    let address = config.listen_address();
    let service_factory = ServiceFactory {
        cpu_pool: CpuPool::new(config.server.thread_count),
        repo_pool: Arc::new(PgRepoPool::new(db_pool)),
        whatsapp: Arc::new(config.whatsapp.clone()),
    };

    let serve = Http::new().serve_addr_handle(&address, &handle, move || {
        let controller = Box::new(ControllerImpl::new(service_factory.clone()));

        Ok(Application { controller })
    })?;

    let handle_arc = handle.clone();
    handle.spawn(
        serve
            .for_each(move |conn| {
                handle_arc.spawn(conn.map(|_| ()).map_err(|why| error!("Server Error: {:?}", why)));
                Ok(())
            })
            .map_err(|_| ()),
    );

    info!("Listening on http://{}", address);
    core.run(future::empty::<(), ()>())
        .map_err(|_| format_err!("Server reactor stopped unexpectedly"))
}
