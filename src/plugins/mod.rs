//! frei0r plugin discovery
//!
//! Candidate files are opened in-process just long enough to read their
//! `f0r_plugin_info_t`. Source and filter plugins become the selectable
//! choices; everything else is dropped.

pub mod abi;
pub mod discovery;
pub mod probe;
pub mod record;
pub mod selection;

pub use discovery::{DEFAULT_PLUGIN_DIR, Scanner, standard_plugin_dirs};
pub use probe::{LibraryProbe, PluginProbe, ProbeError};
pub use record::{ColorModel, PluginRecord, PluginType};
pub use selection::{NONE_CHOICE, SelectionMap};
