pub mod config;
pub mod error;
pub mod generate;
pub mod content {
    pub mod front_matter;
    pub mod page;
    pub mod site;
}
pub mod rendering {
    pub mod markdown;
    pub mod shortcodes;
    pub mod title_case;
}
pub mod search {
    pub mod builder;
    pub mod record;
    pub mod writer;
}

pub use config::SiteConfig;
pub use error::IndexError;
pub use generate::{process_generate, GenerateRequest, GenerateResponse};
pub use search::record::PageRecord;
