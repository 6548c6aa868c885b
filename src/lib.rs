pub mod config;
pub mod logger;
pub mod post;
pub mod post_store;
pub mod content;
pub mod seo;
pub mod view;
pub mod paginator;
pub mod preferences;
mod post_list;
mod text_utils;
#[cfg(test)]
mod test_data;
