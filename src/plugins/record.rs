//! Plugin records produced by the probe

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use super::abi::{
    F0R_COLOR_MODEL_BGRA8888, F0R_COLOR_MODEL_PACKED32, F0R_COLOR_MODEL_RGBA8888,
    F0R_PLUGIN_TYPE_FILTER, F0R_PLUGIN_TYPE_MIXER2, F0R_PLUGIN_TYPE_MIXER3,
    F0R_PLUGIN_TYPE_SOURCE, RawPluginInfo,
};

/// Plugin category declared in the info record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginType {
    /// Transforms one input frame
    Filter,
    /// Generates frames with no input
    Source,
    /// Mixes two inputs
    Mixer2,
    /// Mixes three inputs
    Mixer3,
    /// Code outside the frei0r enumeration
    Other(i32),
}

impl PluginType {
    /// Types the selector offers by default
    pub const SELECTABLE: [Self; 2] = [Self::Source, Self::Filter];

    /// Map a raw `plugin_type` code
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            F0R_PLUGIN_TYPE_FILTER => Self::Filter,
            F0R_PLUGIN_TYPE_SOURCE => Self::Source,
            F0R_PLUGIN_TYPE_MIXER2 => Self::Mixer2,
            F0R_PLUGIN_TYPE_MIXER3 => Self::Mixer3,
            other => Self::Other(other),
        }
    }

    /// Raw `plugin_type` code
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Filter => F0R_PLUGIN_TYPE_FILTER,
            Self::Source => F0R_PLUGIN_TYPE_SOURCE,
            Self::Mixer2 => F0R_PLUGIN_TYPE_MIXER2,
            Self::Mixer3 => F0R_PLUGIN_TYPE_MIXER3,
            Self::Other(code) => code,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Source => "source",
            Self::Mixer2 => "mixer2",
            Self::Mixer3 => "mixer3",
            Self::Other(_) => "other",
        }
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(code) => write!(f, "other({code})"),
            _ => f.write_str(self.as_str()),
        }
    }
}

impl Serialize for PluginType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Pixel layout the plugin works in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Bgra8888,
    Rgba8888,
    Packed32,
    Other(i32),
}

impl ColorModel {
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            F0R_COLOR_MODEL_BGRA8888 => Self::Bgra8888,
            F0R_COLOR_MODEL_RGBA8888 => Self::Rgba8888,
            F0R_COLOR_MODEL_PACKED32 => Self::Packed32,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bgra8888 => "bgra8888",
            Self::Rgba8888 => "rgba8888",
            Self::Packed32 => "packed32",
            Self::Other(_) => "other",
        }
    }
}

impl Serialize for ColorModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A probed plugin binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginRecord {
    /// Display name declared by the plugin
    pub name: String,
    /// Declared category
    pub plugin_type: PluginType,
    /// File the record was read from
    pub path: PathBuf,
    /// Plugin author
    pub author: String,
    /// Supported pixel layout
    pub color_model: ColorModel,
    /// frei0r API version the plugin was built against
    pub frei0r_version: i32,
    /// Plugin major version
    pub major_version: i32,
    /// Plugin minor version
    pub minor_version: i32,
    /// Number of tunable parameters
    pub num_params: i32,
    /// Free-form description
    pub explanation: String,
}

impl PluginRecord {
    /// Minimal record with just the fields the selector relies on
    #[must_use]
    pub fn new(name: impl Into<String>, plugin_type: PluginType, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            plugin_type,
            path: path.into(),
            author: String::new(),
            color_model: ColorModel::Bgra8888,
            frei0r_version: 0,
            major_version: 0,
            minor_version: 0,
            num_params: 0,
            explanation: String::new(),
        }
    }

    /// Build a record from an info struct read at `path`
    #[must_use]
    pub fn from_info(path: &Path, info: RawPluginInfo) -> Self {
        Self {
            name: info.name,
            plugin_type: PluginType::from_code(info.plugin_type),
            path: path.to_path_buf(),
            author: info.author,
            color_model: ColorModel::from_code(info.color_model),
            frei0r_version: info.frei0r_version,
            major_version: info.major_version,
            minor_version: info.minor_version,
            num_params: info.num_params,
            explanation: info.explanation,
        }
    }

    /// Path as sent to the loader service
    #[must_use]
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_codes_follow_frei0r_header() {
        assert_eq!(PluginType::from_code(0), PluginType::Filter);
        assert_eq!(PluginType::from_code(1), PluginType::Source);
        assert_eq!(PluginType::from_code(2), PluginType::Mixer2);
        assert_eq!(PluginType::from_code(3), PluginType::Mixer3);
        assert_eq!(PluginType::from_code(42), PluginType::Other(42));
        assert_eq!(PluginType::Other(42).code(), 42);
    }

    #[test]
    fn from_info_maps_codes() {
        let info = RawPluginInfo {
            name: "Foo".to_string(),
            author: "A".to_string(),
            plugin_type: 1,
            color_model: 2,
            frei0r_version: 1,
            major_version: 0,
            minor_version: 2,
            num_params: 4,
            explanation: "makes noise".to_string(),
        };

        let record = PluginRecord::from_info(Path::new("/plugins/a.so"), info);
        assert_eq!(record.name, "Foo");
        assert_eq!(record.plugin_type, PluginType::Source);
        assert_eq!(record.color_model, ColorModel::Packed32);
        assert_eq!(record.path_string(), "/plugins/a.so");
    }

    #[test]
    fn serializes_type_as_name() {
        let record = PluginRecord::new("Bar", PluginType::Filter, "/p/b.so");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["plugin_type"], "filter");
        assert_eq!(json["color_model"], "bgra8888");
    }

    #[test]
    fn display_other_includes_code() {
        assert_eq!(PluginType::Other(7).to_string(), "other(7)");
        assert_eq!(PluginType::Mixer2.to_string(), "mixer2");
    }
}
