pub mod api_request_message;
pub mod api_response_message;
