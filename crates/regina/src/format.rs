use crate::{PacketError, PacketResult};

/// Generation of the data file format, identified by the name of its root
/// element.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter, strum::Display)]
pub enum FileFormat {
    /// Files from Regina 7.0 onwards, with root element `regina`.
    #[default]
    #[strum(to_string = "Regina 7.0+")]
    Regina,
    /// Older files, with root element `reginadata`.
    #[strum(to_string = "Regina 3.0-6.0.1")]
    ReginaData,
}

impl FileFormat {
    /// Returns the name of the root element.
    pub fn root_element(self) -> &'static str {
        match self {
            Self::Regina => "regina",
            Self::ReginaData => "reginadata",
        }
    }

    /// Returns the format whose root element has the given name.
    pub fn from_root_element(name: &str) -> PacketResult<Self> {
        match name {
            "regina" => Ok(Self::Regina),
            "reginadata" => Ok(Self::ReginaData),
            _ => Err(PacketError::invalid(format!("unknown root element {name:?}"))),
        }
    }

    /// Returns whether this is the current format.
    pub fn is_current(self) -> bool {
        self == Self::default()
    }
}
