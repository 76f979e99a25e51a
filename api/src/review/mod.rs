pub mod prompt;
pub mod review_client;
