extern crate env_logger;
extern crate jerseys_lib;
#[macro_use]
extern crate log;

use std::process::exit;

fn main() {
    env_logger::init();

    let config = match jerseys_lib::config::Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load service configuration. Please check your 'config' folder: {}", e);
            exit(1);
        }
    };

    if let Err(e) = jerseys_lib::start_server(config) {
        error!("Http Server Initialization Error: {}", e);
        exit(1);
    }
}
