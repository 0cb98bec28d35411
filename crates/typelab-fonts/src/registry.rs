//! Font registry
//!
//! Append-only list of uploaded fonts plus a weak "active" pointer. The
//! registry is the only owner of resource handles; [`FontRegistry::teardown`]
//! hands every one of them back to the font table exactly once.

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::resource::{FamilyHandle, FontFormat, FontId, FontResource, PendingFont};
use crate::table::FontTable;

/// Default prefix for synthetic family handles
pub const DEFAULT_FAMILY_PREFIX: &str = "TypeLab";

/// Registry of uploaded fonts
#[derive(Debug)]
pub struct FontRegistry {
    fonts: Vec<FontResource>,
    ids: HashSet<FontId>,
    active: Option<FontId>,
    family_prefix: String,
    next_seq: u64,
    torn_down: bool,
}

impl FontRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::with_family_prefix(DEFAULT_FAMILY_PREFIX)
    }

    /// Create an empty registry whose family handles start with `prefix`
    pub fn with_family_prefix(prefix: impl Into<String>) -> Self {
        Self {
            fonts: Vec::new(),
            ids: HashSet::new(),
            active: None,
            family_prefix: prefix.into(),
            next_seq: 0,
            torn_down: false,
        }
    }

    /// Reserve an id and family handle for an upload.
    ///
    /// Handles combine the wall clock with a per-registry sequence number, so
    /// they never repeat within a session and do not look like system family
    /// names.
    pub fn allocate(&mut self, file_name: &str, format: FontFormat) -> PendingFont {
        let seq = self.next_seq;
        self.next_seq += 1;
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();

        PendingFont {
            id: FontId(format!("font-{millis}-{seq}")),
            family: FamilyHandle(format!("{}_{millis}_{seq}", self.family_prefix)),
            file_name: file_name.to_string(),
            format,
        }
    }

    /// Append a loaded font.
    ///
    /// The resource is handed back when the registry has been torn down or
    /// already holds a font with the same id; the caller then owns its handle.
    pub fn register(&mut self, resource: FontResource) -> Result<FontId, FontResource> {
        if self.torn_down || self.ids.contains(resource.id()) {
            return Err(resource);
        }
        let id = resource.id().clone();
        self.ids.insert(id.clone());
        tracing::info!(
            font = %id,
            family = %resource.family_handle(),
            file = resource.original_file_name(),
            "font registered"
        );
        self.fonts.push(resource);
        Ok(id)
    }

    /// Point the active font at `id`. The id is not validated; an unknown id
    /// simply resolves to no active font.
    pub fn select(&mut self, id: FontId) {
        tracing::debug!(font = %id, "font selected");
        self.active = Some(id);
    }

    /// Id the active pointer currently holds, resolved or not
    pub fn active_id(&self) -> Option<&FontId> {
        self.active.as_ref()
    }

    /// Resolve the active pointer
    pub fn lookup_active(&self) -> Option<&FontResource> {
        self.active.as_ref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &FontId) -> Option<&FontResource> {
        self.fonts.iter().find(|f| f.id() == id)
    }

    /// Fonts in upload-completion order
    pub fn iter(&self) -> impl Iterator<Item = &FontResource> {
        self.fonts.iter()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Release every resource handle to `table`.
    ///
    /// Idempotent: handles are moved out as they are released, so a second
    /// call finds nothing left. Returns the number of handles released by this
    /// call.
    pub fn teardown<T: FontTable + ?Sized>(&mut self, table: &T) -> usize {
        self.torn_down = true;
        let mut released = 0;
        for font in &mut self.fonts {
            if let Some(handle) = font.take_handle() {
                table.release_resource(handle);
                released += 1;
            }
        }
        if released > 0 {
            tracing::info!(released, "font registry torn down");
        }
        released
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceHandle;
    use crate::Result;
    use std::cell::RefCell;

    #[derive(Default)]
    struct CountingTable {
        released: RefCell<Vec<FontId>>,
    }

    impl FontTable for CountingTable {
        async fn register_font(&self, _family: &FamilyHandle, _resource: &ResourceHandle) -> Result<()> {
            Ok(())
        }

        fn release_resource(&self, resource: ResourceHandle) {
            self.released.borrow_mut().push(resource.font().clone());
        }
    }

    fn loaded(registry: &mut FontRegistry, name: &str) -> FontResource {
        let pending = registry.allocate(name, FontFormat::Ttf);
        let handle = ResourceHandle::new(pending.id.clone(), vec![1, 2, 3]);
        pending.into_resource(handle)
    }

    #[test]
    fn test_allocate_unique() {
        let mut registry = FontRegistry::new();
        let a = registry.allocate("a.ttf", FontFormat::Ttf);
        let b = registry.allocate("a.ttf", FontFormat::Ttf);
        assert_ne!(a.id, b.id);
        assert_ne!(a.family, b.family);
        assert!(a.family.as_str().starts_with("TypeLab_"));
    }

    #[test]
    fn test_register_and_select() {
        let mut registry = FontRegistry::new();
        let font = loaded(&mut registry, "Inter.ttf");
        let id = registry.register(font).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.lookup_active().is_none());

        registry.select(id.clone());
        assert_eq!(registry.lookup_active().map(|f| f.id()), Some(&id));
    }

    #[test]
    fn test_dangling_selection() {
        let mut registry = FontRegistry::new();
        registry.select(FontId::from("missing"));
        assert_eq!(registry.active_id(), Some(&FontId::from("missing")));
        assert!(registry.lookup_active().is_none());
    }

    #[test]
    fn test_teardown_once() {
        let table = CountingTable::default();
        let mut registry = FontRegistry::new();
        for name in ["a.ttf", "b.otf", "c.woff"] {
            let font = loaded(&mut registry, name);
            registry.register(font).unwrap();
        }

        assert_eq!(registry.teardown(&table), 3);
        assert_eq!(registry.teardown(&table), 0);
        assert_eq!(table.released.borrow().len(), 3);
        assert!(registry.iter().all(FontResource::is_released));
    }

    #[test]
    fn test_register_after_teardown_hands_back() {
        let table = CountingTable::default();
        let mut registry = FontRegistry::new();
        registry.teardown(&table);

        let font = loaded(&mut registry, "late.ttf");
        let rejected = registry.register(font).unwrap_err();
        assert_eq!(rejected.original_file_name(), "late.ttf");
        assert!(registry.is_empty());
    }
}
