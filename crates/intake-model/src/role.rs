use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// Target field a spreadsheet column can be mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ColumnRole {
    Style,
    Brand,
    Category,
    Color,
    Msrp,
    Gender,
    Size,
    Qty,
    Price,
    /// Column holding the source image link.
    ReadImage,
    /// Column the scraped image is anchored to.
    ImageAdd,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 11] = [
        ColumnRole::Style,
        ColumnRole::Brand,
        ColumnRole::Category,
        ColumnRole::Color,
        ColumnRole::Msrp,
        ColumnRole::Gender,
        ColumnRole::Size,
        ColumnRole::Qty,
        ColumnRole::Price,
        ColumnRole::ReadImage,
        ColumnRole::ImageAdd,
    ];

    pub(crate) fn ordinal(self) -> usize {
        self as usize
    }

    /// Key used for this role on the wire and in command-line arguments.
    pub fn as_key(self) -> &'static str {
        match self {
            ColumnRole::Style => "style",
            ColumnRole::Brand => "brand",
            ColumnRole::Category => "category",
            ColumnRole::Color => "colorName",
            ColumnRole::Msrp => "msrp",
            ColumnRole::Gender => "gender",
            ColumnRole::Size => "size",
            ColumnRole::Qty => "qty",
            ColumnRole::Price => "price",
            ColumnRole::ReadImage => "readImage",
            ColumnRole::ImageAdd => "imageAdd",
        }
    }

    /// Human-facing label used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            ColumnRole::Style => "style",
            ColumnRole::Brand => "brand",
            ColumnRole::Category => "category",
            ColumnRole::Color => "color",
            ColumnRole::Msrp => "MSRP",
            ColumnRole::Gender => "gender",
            ColumnRole::Size => "size",
            ColumnRole::Qty => "quantity",
            ColumnRole::Price => "price",
            ColumnRole::ReadImage => "image source column",
            ColumnRole::ImageAdd => "image target column",
        }
    }

    /// The image pair is exempt from one-role-per-column exclusivity.
    pub fn is_image(self) -> bool {
        matches!(self, ColumnRole::ReadImage | ColumnRole::ImageAdd)
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl FromStr for ColumnRole {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let role = match normalized.as_str() {
            "style" | "sku" => ColumnRole::Style,
            "brand" => ColumnRole::Brand,
            "category" => ColumnRole::Category,
            "colorname" | "color" | "colour" => ColumnRole::Color,
            "msrp" => ColumnRole::Msrp,
            "gender" => ColumnRole::Gender,
            "size" => ColumnRole::Size,
            "qty" | "quantity" => ColumnRole::Qty,
            "price" => ColumnRole::Price,
            "readimage" | "image" => ColumnRole::ReadImage,
            "imageadd" => ColumnRole::ImageAdd,
            _ => return Err(ModelError::UnknownRole(s.to_string())),
        };
        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_parse_back_to_their_role() {
        for role in ColumnRole::ALL {
            assert_eq!(role.as_key().parse::<ColumnRole>().unwrap(), role);
        }
    }

    #[test]
    fn ordinals_follow_declaration_order() {
        for (idx, role) in ColumnRole::ALL.iter().enumerate() {
            assert_eq!(role.ordinal(), idx);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "barcode".parse::<ColumnRole>().unwrap_err();
        assert_eq!(err, ModelError::UnknownRole("barcode".to_string()));
    }
}
