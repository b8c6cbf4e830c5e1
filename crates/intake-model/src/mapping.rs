use serde::{Deserialize, Serialize};

use crate::ColumnRole;

/// Role → column index table with every role always present.
///
/// Stored as one slot per role so an unmapped role is an explicit `None`
/// rather than a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    slots: [Option<usize>; ColumnRole::ALL.len()],
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        self.slots[role.ordinal()]
    }

    /// Points `role` at `index` without touching other roles.
    pub fn set(&mut self, role: ColumnRole, index: usize) {
        self.slots[role.ordinal()] = Some(index);
    }

    pub fn unmap(&mut self, role: ColumnRole) {
        self.slots[role.ordinal()] = None;
    }

    pub fn is_mapped(&self, role: ColumnRole) -> bool {
        self.get(role).is_some()
    }

    /// Roles currently pointing at `index`, in role order.
    pub fn roles_at(&self, index: usize) -> Vec<ColumnRole> {
        ColumnRole::ALL
            .into_iter()
            .filter(|role| self.get(*role) == Some(index))
            .collect()
    }

    /// Every role with its current slot, in role order.
    pub fn entries(&self) -> impl Iterator<Item = (ColumnRole, Option<usize>)> + '_ {
        ColumnRole::ALL.into_iter().map(|role| (role, self.get(role)))
    }

    /// Distinct mapped column indices, ascending.
    pub fn mapped_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.slots.iter().flatten().copied().collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Adjusts the table after the column at `removed` was physically deleted:
    /// roles on that column become unmapped, roles to the right shift left.
    pub fn shift_after_removal(&mut self, removed: usize) {
        for slot in &mut self.slots {
            *slot = match *slot {
                Some(index) if index == removed => None,
                Some(index) if index > removed => Some(index - 1),
                other => other,
            };
        }
    }

    /// True when no two non-image roles share a column.
    pub fn is_exclusive(&self) -> bool {
        let mut seen = Vec::new();
        for (role, slot) in self.entries() {
            if role.is_image() {
                continue;
            }
            if let Some(index) = slot {
                if seen.contains(&index) {
                    return false;
                }
                seen.push(index);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_mapping_has_every_role_unmapped() {
        let mapping = ColumnMapping::new();
        assert_eq!(mapping.entries().count(), ColumnRole::ALL.len());
        assert!(mapping.entries().all(|(_, slot)| slot.is_none()));
        assert!(mapping.mapped_indices().is_empty());
    }

    #[test]
    fn image_pair_may_share_a_column() {
        let mut mapping = ColumnMapping::new();
        mapping.set(ColumnRole::Style, 0);
        mapping.set(ColumnRole::ReadImage, 0);
        mapping.set(ColumnRole::ImageAdd, 0);
        assert!(mapping.is_exclusive());
        assert_eq!(
            mapping.roles_at(0),
            vec![ColumnRole::Style, ColumnRole::ReadImage, ColumnRole::ImageAdd]
        );

        mapping.set(ColumnRole::Brand, 0);
        assert!(!mapping.is_exclusive());
    }

    #[test]
    fn removal_unmaps_and_shifts() {
        let mut mapping = ColumnMapping::new();
        mapping.set(ColumnRole::Style, 0);
        mapping.set(ColumnRole::Brand, 2);
        mapping.set(ColumnRole::Msrp, 3);

        mapping.shift_after_removal(2);

        assert_eq!(mapping.get(ColumnRole::Style), Some(0));
        assert_eq!(mapping.get(ColumnRole::Brand), None);
        assert_eq!(mapping.get(ColumnRole::Msrp), Some(2));
        assert_eq!(mapping.mapped_indices(), vec![0, 2]);
    }
}
