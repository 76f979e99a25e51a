pub mod merge_request_handler;
pub mod payload;
pub mod push_handler;
pub mod webhook_route;
