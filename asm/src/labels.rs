use indexmap::IndexMap;

/// Label name to resolved address. Insertion order is kept so diagnostics and
/// dumps list labels in definition order. An existing key is never
/// overwritten; a refused insert is how duplicate definitions surface.
#[derive(Debug, Default)]
pub struct Labels(IndexMap<String, u16>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the label is already bound.
    pub fn insert(&mut self, name: &str, address: u16) -> bool {
        if self.0.contains_key(name) {
            return false;
        }
        self.0.insert(name.to_string(), address);
        true
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.0.iter().map(|(name, addr)| (name.as_str(), *addr))
    }
}
