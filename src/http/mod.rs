//! HTTP protocol layer module
//!
//! Response builders and MIME detection shared by the API and static file
//! serving, decoupled from specific business logic.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_413_response, build_file_response,
    build_options_response,
};
