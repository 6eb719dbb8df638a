//! frei0r selector - discover frei0r plugins and forward a selection
//!
//! The node scans a plugin directory once at start-up, reads each shared
//! library's `f0r_plugin_info_t`, and offers the source and filter plugins as
//! the choices of one enumerated parameter, `frei0r`. Every change of that
//! parameter becomes one `load_plugin` request to a separate loader service.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   records   ┌──────────────┐  choices  ┌──────────────┐
//! │   Scanner    │────────────▶│ SelectionMap │──────────▶│ EnumParameter│◀── PUT /api/parameters/frei0r
//! │ (LibraryProbe)│            └──────────────┘           └──────┬───────┘
//! └──────────────┘                                               │ changes
//!                                                         ┌──────▼───────┐
//!                                                         │   Selector   │──▶ POST {loader}/load_plugin
//!                                                         └──────────────┘
//! ```

pub mod api;
pub mod config;
pub mod daemon;
pub mod error;
pub mod loader;
pub mod plugins;
pub mod selector;

pub use config::Config;
pub use daemon::{Catalog, Node};
pub use error::{Error, Result};
pub use loader::{LoadPluginRequest, LoadPluginResponse, LoadService, LoaderClient};
pub use plugins::{
    LibraryProbe, NONE_CHOICE, PluginProbe, PluginRecord, PluginType, ProbeError, Scanner,
    SelectionMap,
};
pub use selector::{EnumParameter, FREI0R_PARAMETER, Selection, Selector, SelectorState};
