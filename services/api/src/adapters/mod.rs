pub mod db;
pub mod memory;
pub mod translate_llm;
pub mod translate_web;

pub use db::PgItemStore;
pub use memory::InMemoryItemStore;
pub use translate_llm::OpenAiTranslateAdapter;
pub use translate_web::WebTranslateAdapter;
