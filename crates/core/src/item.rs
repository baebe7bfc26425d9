//! Item stacks moved between inventories.

use crate::material::Material;
use serde::{Deserialize, Serialize};

/// A stack of items occupying one inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Type of item.
    pub material: Material,
    /// Quantity in the stack.
    pub count: u32,
    /// Largest count this stack may reach.
    pub max_stack_size: u32,
    /// Auxiliary item data (names, enchantments, ...). Stacks only merge when
    /// this matches exactly.
    pub data: Option<Vec<u8>>,
}

impl ItemStack {
    /// Create a stack using the material's default stack limit.
    pub fn new(material: Material, count: u32) -> Self {
        let max_stack_size = material.default_max_stack_size();
        Self {
            material,
            count,
            max_stack_size,
            data: None,
        }
    }

    /// Create a stack carrying auxiliary data.
    pub fn with_data(material: Material, count: u32, data: Vec<u8>) -> Self {
        Self {
            data: Some(data),
            ..Self::new(material, count)
        }
    }

    /// Override the stack limit.
    pub fn with_max_stack_size(mut self, max_stack_size: u32) -> Self {
        self.max_stack_size = max_stack_size.max(1);
        self
    }

    /// True when the stack holds nothing (air or zero count).
    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.material.is_air()
    }

    /// Same material and same auxiliary data; counts are ignored.
    pub fn is_similar(&self, other: &ItemStack) -> bool {
        self.material == other.material && self.data == other.data
    }

    /// True once the stack has reached its limit.
    pub fn is_full(&self) -> bool {
        self.count >= self.max_stack_size
    }

    /// True when `other` may be merged into this stack one unit at a time.
    pub fn can_stack_with(&self, other: &ItemStack) -> bool {
        self.is_similar(other) && !self.is_full()
    }

    /// A copy of this stack holding exactly one unit.
    pub fn single(&self) -> ItemStack {
        ItemStack {
            count: 1,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stack_takes_material_limit() {
        let pearls = ItemStack::new(Material::vanilla("ender_pearl"), 3);
        assert_eq!(pearls.max_stack_size, 16);
        let stone = ItemStack::new(Material::vanilla("cobblestone"), 5);
        assert_eq!(stone.max_stack_size, 64);
    }

    #[test]
    fn similarity_ignores_count_but_not_data() {
        let a = ItemStack::new(Material::vanilla("cobblestone"), 5);
        let b = ItemStack::new(Material::vanilla("cobblestone"), 1);
        assert!(a.is_similar(&b));

        let named = ItemStack::with_data(Material::vanilla("cobblestone"), 1, vec![1, 2]);
        assert!(!a.is_similar(&named));
        assert!(!a.is_similar(&ItemStack::new(Material::vanilla("dirt"), 5)));
    }

    #[test]
    fn full_stacks_refuse_merges() {
        let full = ItemStack::new(Material::vanilla("cobblestone"), 64);
        assert!(full.is_full());
        assert!(!full.can_stack_with(&full.single()));
    }

    #[test]
    fn single_keeps_identity() {
        let stack = ItemStack::with_data(Material::vanilla("diamond"), 9, vec![7]);
        let one = stack.single();
        assert_eq!(one.count, 1);
        assert!(one.is_similar(&stack));
    }

    #[test]
    fn empty_detection() {
        assert!(ItemStack::new(Material::air(), 1).is_empty());
        assert!(ItemStack::new(Material::vanilla("dirt"), 0).is_empty());
        assert!(!ItemStack::new(Material::vanilla("dirt"), 1).is_empty());
    }
}
