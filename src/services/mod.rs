pub mod image_url_service;
pub mod session_service;

pub use session_service::SessionRegistry;
