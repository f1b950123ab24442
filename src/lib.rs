//! Logic core of the young-artists fund site: the art store catalog, the
//! grant application wizard, and the small pieces of state behind the
//! donation and home pages.
pub mod catalog;
pub mod config;
pub mod counter;
pub mod donate;
pub mod model;
pub mod store;
pub mod submit;
pub mod wizard;
