pub mod form;
pub mod rewrite;
pub mod script;

pub use form::extract_form;
pub use script::extract_script;
