pub mod document_service;
pub use document_service::DocumentService;
pub mod email_service;
pub use email_service::EmailService;
pub mod logo_service;
pub use logo_service::LogoService;
pub mod report_service;
pub use report_service::ReportService;
