//! Header-driven column auto-mapping.

use intake_ingest::patterns::{AUTO_MAP_PRIORITY, image_pattern, normalize_header, pattern_for};
use intake_model::{ColumnMapping, ColumnRole, WizardKind};
use regex::Regex;

/// Maps headers onto the full role vocabulary.
///
/// Headers are visited left to right. Each one goes to the first role, in
/// priority order, whose pattern matches and that no earlier header claimed.
/// An image match claims both image roles at once.
pub fn auto_map_columns(headers: &[String]) -> ColumnMapping {
    auto_map_with(headers, |_| true, pattern_for(ColumnRole::ReadImage))
}

/// Like [`auto_map_columns`], restricted to the roles `wizard` accepts and
/// using the wizard's image header pattern.
pub fn auto_map_for(wizard: WizardKind, headers: &[String]) -> ColumnMapping {
    auto_map_with(headers, |role| wizard.accepts(role), image_pattern(wizard))
}

fn auto_map_with(
    headers: &[String],
    accepts: impl Fn(ColumnRole) -> bool,
    image: &Regex,
) -> ColumnMapping {
    let mut mapping = ColumnMapping::new();
    let candidates: Vec<ColumnRole> = AUTO_MAP_PRIORITY
        .into_iter()
        .filter(|role| accepts(*role))
        .collect();

    for (index, header) in headers.iter().enumerate() {
        let normalized = normalize_header(header);
        if normalized.is_empty() {
            continue;
        }
        for role in &candidates {
            let pattern = if role.is_image() { image } else { pattern_for(*role) };
            if !pattern.is_match(&normalized) {
                continue;
            }
            if role.is_image() {
                if mapping.is_mapped(ColumnRole::ReadImage)
                    || mapping.is_mapped(ColumnRole::ImageAdd)
                {
                    continue;
                }
                mapping.set(ColumnRole::ReadImage, index);
                mapping.set(ColumnRole::ImageAdd, index);
                break;
            }
            if !mapping.is_mapped(*role) {
                mapping.set(*role, index);
                break;
            }
        }
    }
    mapping
}
