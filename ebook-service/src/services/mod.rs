pub mod metrics;
pub mod providers;
pub mod template;

pub use metrics::{get_metrics, init_metrics, record_ebook_request};
pub use providers::{
    EmailMessage, EmailProvider, ProviderError, ProviderResponse, ResendProvider,
};
pub use template::render_ebook_email;
