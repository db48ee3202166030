//! Line-delimited JSON-RPC front end.
//!
//! `server` owns the read/write loop, `dispatcher` routes a decoded envelope
//! by method, `params` validates `ocr_text` arguments, and `schema` holds the
//! static capability descriptor.

mod dispatcher;
mod envelope;
mod params;
mod schema;
mod server;

pub use dispatcher::{Dispatcher, Outcome};
pub use envelope::{
    error_response, success_response, DynamicValue, RequestEnvelope, RpcError, INVALID_PARAMS,
    JSONRPC_VERSION, METHOD_NOT_FOUND,
};
pub use params::DEFAULT_COMMENT_LANGUAGE;
pub use schema::{initialize_result, methods_list_result, ocr_text_descriptor, OCR_TEXT_METHOD};
pub use server::{serve, ServeExit};
