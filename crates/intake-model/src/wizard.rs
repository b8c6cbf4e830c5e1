//! Per-wizard configuration tables.
//!
//! Each upload wizard posts to its own endpoint and decides which column roles
//! it requires, which it accepts optionally, and which may be filled with a
//! manually entered constant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ColumnRole, ModelError};

/// Sub-mode of the data warehouse wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataWarehouseMode {
    #[default]
    ImagesAndMsrp,
    ImagesOnly,
    MsrpOnly,
}

impl DataWarehouseMode {
    pub const ALL: [DataWarehouseMode; 3] = [
        DataWarehouseMode::ImagesAndMsrp,
        DataWarehouseMode::ImagesOnly,
        DataWarehouseMode::MsrpOnly,
    ];

    /// Wire value sent as `mode` / `dataWarehouseMode`.
    pub fn as_str(self) -> &'static str {
        match self {
            DataWarehouseMode::ImagesAndMsrp => "imagesAndMsrp",
            DataWarehouseMode::ImagesOnly => "imagesOnly",
            DataWarehouseMode::MsrpOnly => "msrpOnly",
        }
    }

    fn required_roles(self) -> &'static [ColumnRole] {
        match self {
            DataWarehouseMode::ImagesAndMsrp | DataWarehouseMode::MsrpOnly => {
                &[ColumnRole::Style, ColumnRole::Msrp]
            }
            DataWarehouseMode::ImagesOnly => &[ColumnRole::Style],
        }
    }

    fn optional_roles(self) -> &'static [ColumnRole] {
        match self {
            DataWarehouseMode::ImagesAndMsrp | DataWarehouseMode::MsrpOnly => &[ColumnRole::Brand],
            DataWarehouseMode::ImagesOnly => &[],
        }
    }
}

impl fmt::Display for DataWarehouseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataWarehouseMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "imagesandmsrp" => Ok(DataWarehouseMode::ImagesAndMsrp),
            "imagesonly" => Ok(DataWarehouseMode::ImagesOnly),
            "msrponly" => Ok(DataWarehouseMode::MsrpOnly),
            _ => Err(ModelError::UnknownMode(s.to_string())),
        }
    }
}

/// How the file attached to a submission is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSource {
    /// Send the upload as-is for single-sheet workbooks, otherwise isolate
    /// the worksheet into its own workbook.
    IsolateWhenMultiSheet,
    /// Always rebuild a workbook from the sheet's current tabular data.
    RebuildFromTabular,
    /// Always send the whole upload unchanged, renamed per sheet.
    OriginalUpload,
}

/// Upload wizard variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardKind {
    #[default]
    GoogleImages,
    DataWarehouse(DataWarehouseMode),
    Reformat,
    /// Image links read from a URL column.
    ImageLink,
    Crop,
}

impl WizardKind {
    /// Endpoint path relative to the server base URL.
    pub fn endpoint(self) -> &'static str {
        match self {
            WizardKind::GoogleImages | WizardKind::Reformat => "submitImage",
            WizardKind::DataWarehouse(_) => "datawarehouse",
            WizardKind::ImageLink => "submitImageLink",
            WizardKind::Crop => "submitCrop",
        }
    }

    /// Multipart field name carrying the workbook.
    pub fn file_field(self) -> &'static str {
        match self {
            WizardKind::ImageLink => "fileUploadLink",
            WizardKind::Crop => "fileUploadCrop",
            WizardKind::GoogleImages | WizardKind::Reformat | WizardKind::DataWarehouse(_) => {
                "fileUploadImage"
            }
        }
    }

    pub fn required_roles(self) -> &'static [ColumnRole] {
        match self {
            WizardKind::GoogleImages | WizardKind::Reformat => &[ColumnRole::Style],
            WizardKind::DataWarehouse(mode) => mode.required_roles(),
            WizardKind::ImageLink | WizardKind::Crop => &[ColumnRole::Style, ColumnRole::ReadImage],
        }
    }

    pub fn optional_roles(self) -> &'static [ColumnRole] {
        match self {
            WizardKind::GoogleImages => &[
                ColumnRole::Brand,
                ColumnRole::Category,
                ColumnRole::Color,
                ColumnRole::Msrp,
            ],
            WizardKind::Reformat => &[
                ColumnRole::Brand,
                ColumnRole::Category,
                ColumnRole::Color,
                ColumnRole::Msrp,
                ColumnRole::Gender,
                ColumnRole::Size,
                ColumnRole::Qty,
                ColumnRole::Price,
            ],
            WizardKind::DataWarehouse(mode) => mode.optional_roles(),
            WizardKind::ImageLink | WizardKind::Crop => &[],
        }
    }

    /// Required roles followed by optional roles.
    pub fn all_roles(self) -> Vec<ColumnRole> {
        self.required_roles()
            .iter()
            .chain(self.optional_roles())
            .copied()
            .collect()
    }

    /// Whether `role` can be assigned to a column in this wizard.
    pub fn accepts(self, role: ColumnRole) -> bool {
        if role.is_image() {
            return self.allows_image_mapping();
        }
        self.required_roles().contains(&role) || self.optional_roles().contains(&role)
    }

    /// Roles that may be filled with a manually entered constant.
    pub fn manual_roles(self) -> &'static [ColumnRole] {
        match self {
            WizardKind::Reformat => &[ColumnRole::Brand, ColumnRole::Gender, ColumnRole::Category],
            WizardKind::GoogleImages | WizardKind::DataWarehouse(_) => &[ColumnRole::Brand],
            WizardKind::ImageLink | WizardKind::Crop => &[],
        }
    }

    pub fn allows_manual(self, role: ColumnRole) -> bool {
        self.manual_roles().contains(&role)
    }

    pub fn allows_image_mapping(self) -> bool {
        !matches!(self, WizardKind::DataWarehouse(DataWarehouseMode::MsrpOnly))
    }

    /// Advisory: the wizard expects an image column but does not enforce it.
    pub fn requires_image_column(self) -> bool {
        matches!(self, WizardKind::DataWarehouse(DataWarehouseMode::ImagesOnly))
    }

    /// When true the image target is mapped on its own instead of mirroring
    /// the image source column.
    pub fn separate_image_target(self) -> bool {
        matches!(self, WizardKind::DataWarehouse(DataWarehouseMode::ImagesOnly))
    }

    pub fn file_source(self) -> FileSource {
        match self {
            WizardKind::Reformat | WizardKind::Crop => FileSource::RebuildFromTabular,
            WizardKind::ImageLink => FileSource::OriginalUpload,
            WizardKind::GoogleImages | WizardKind::DataWarehouse(_) => {
                FileSource::IsolateWhenMultiSheet
            }
        }
    }

    pub fn mode(self) -> Option<DataWarehouseMode> {
        match self {
            WizardKind::DataWarehouse(mode) => Some(mode),
            _ => None,
        }
    }

    pub fn mode_key(self) -> Option<&'static str> {
        self.mode().map(DataWarehouseMode::as_str)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WizardKind::GoogleImages => "google-images",
            WizardKind::DataWarehouse(_) => "data-warehouse",
            WizardKind::Reformat => "reformat",
            WizardKind::ImageLink => "image-link",
            WizardKind::Crop => "crop",
        }
    }
}

impl fmt::Display for WizardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardKind::DataWarehouse(mode) => write!(f, "{}:{}", self.as_str(), mode),
            _ => f.write_str(self.as_str()),
        }
    }
}

impl FromStr for WizardKind {
    type Err = ModelError;

    /// Accepts `google-images`, `reformat`, `image-link`, `crop`,
    /// `data-warehouse` and `data-warehouse:<mode>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (name, mode) = match trimmed.split_once(':') {
            Some((name, mode)) => (name, Some(mode)),
            None => (trimmed, None),
        };
        match (name.to_ascii_lowercase().as_str(), mode) {
            ("google-images" | "images", None) => Ok(WizardKind::GoogleImages),
            ("reformat", None) => Ok(WizardKind::Reformat),
            ("image-link" | "link", None) => Ok(WizardKind::ImageLink),
            ("crop", None) => Ok(WizardKind::Crop),
            ("data-warehouse" | "datawarehouse", None) => {
                Ok(WizardKind::DataWarehouse(DataWarehouseMode::default()))
            }
            ("data-warehouse" | "datawarehouse", Some(mode)) => {
                Ok(WizardKind::DataWarehouse(mode.parse()?))
            }
            _ => Err(ModelError::UnknownWizard(s.to_string())),
        }
    }
}
