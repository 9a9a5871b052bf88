use crate::config::Config;
use hyper::{Method, Uri, Version};
use std::net::SocketAddr;
use std::path::Path;

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("Student records server started");
    println!("Listening on: http://{addr}");
    println!("API root: http://{addr}/api/students");
    println!("Front-end directory: {}", config.assets.dir);
    println!("Using Tokio runtime for concurrency");
    println!("======================================\n");
}

pub fn log_store_opened(path: &Path, count: usize) {
    println!("[Store] Connected to {} ({count} records)", path.display());
}

pub fn log_store_error(path: &Path, err: &str) {
    eprintln!("[Store] Failed to open {}: {err}", path.display());
    eprintln!("[Store] Continuing with an empty collection");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[Error] Failed to serve connection: {err:?}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    println!("[Request] {method} {uri} {version:?}");
}

pub fn log_api_request(method: &str, path: &str, status: u16) {
    println!("[API] {method} {path} - {status}");
}

pub fn log_response(size: usize) {
    println!("[Response] Sent 200 OK ({size} bytes)\n");
}

pub fn log_error(message: &str) {
    eprintln!("[Error] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[Warn] {message}");
}
