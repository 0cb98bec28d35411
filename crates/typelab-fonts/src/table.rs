//! Font table collaborator
//!
//! The font table is where uploaded bytes become renderable families. The
//! registry and upload pipeline only see the [`FontTable`] trait; the
//! [`FontDbTable`] implementation validates bytes with ttf-parser, unpacks
//! WOFF1 and indexes the resulting faces into a `fontdb::Database`.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fontdb::{Database, Source};

use crate::resource::{FamilyHandle, FontId, ResourceHandle};
use crate::woff::{WOFF_SIGNATURE, WOFF2_SIGNATURE, check_woff2, decode_woff};
use crate::{FontError, Result};

/// Rendering-side font table
#[allow(async_fn_in_trait)]
pub trait FontTable {
    /// Register `resource` under `family` and resolve once it is usable for
    /// rendering. Malformed or unsupported bytes are rejected.
    async fn register_font(&self, family: &FamilyHandle, resource: &ResourceHandle) -> Result<()>;

    /// Drop everything the table holds for `resource`. Unknown handles are
    /// accepted and dropped.
    fn release_resource(&self, resource: ResourceHandle);
}

/// Container layout of a validated font file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// Plain TrueType/OpenType, or a collection of `faces`
    Sfnt { faces: u32 },
    /// WOFF1 wrapping an sfnt with `faces` faces
    Woff { faces: u32 },
    /// WOFF2; faces are not unpacked
    Woff2,
}

/// Result of validation, plus the sfnt unpacked from a WOFF1 file
struct Validated {
    container: Container,
    unpacked: Option<Vec<u8>>,
}

/// Parse every face of an sfnt or collection
fn check_sfnt(data: &[u8]) -> Result<u32> {
    let faces = ttf_parser::fonts_in_collection(data).unwrap_or(1);
    if faces == 0 {
        return Err(FontError::FontParsing("empty font collection".into()));
    }
    for index in 0..faces {
        ttf_parser::Face::parse(data, index).map_err(|e| FontError::FontParsing(e.to_string()))?;
    }
    Ok(faces)
}

fn validate(data: &[u8]) -> Result<Validated> {
    let signature = data
        .get(0..4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]));
    match signature {
        Some(WOFF_SIGNATURE) => {
            let sfnt = decode_woff(data)?;
            let faces = check_sfnt(&sfnt)?;
            Ok(Validated {
                container: Container::Woff { faces },
                unpacked: Some(sfnt),
            })
        }
        Some(WOFF2_SIGNATURE) => {
            check_woff2(data)?;
            Ok(Validated {
                container: Container::Woff2,
                unpacked: None,
            })
        }
        _ => Ok(Validated {
            container: Container::Sfnt {
                faces: check_sfnt(data)?,
            },
            unpacked: None,
        }),
    }
}

/// Validate font bytes and report their container
pub fn inspect(data: &[u8]) -> Result<Container> {
    validate(data).map(|v| v.container)
}

#[derive(Debug)]
struct Registration {
    family: FamilyHandle,
    container: Container,
    faces: Vec<fontdb::ID>,
    // Uploaded bytes; fontdb holds its own reference to the indexed sfnt.
    _bytes: Arc<Vec<u8>>,
}

/// Font table backed by fontdb
pub struct FontDbTable {
    db: RefCell<Database>,
    registrations: RefCell<HashMap<FontId, Registration>>,
    /// Every family ever registered; never shrinks so handles are not reused
    families: RefCell<HashSet<FamilyHandle>>,
}

impl FontDbTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::with_database(Database::new())
    }

    /// Create a table with system fonts loaded. Uploads are never registered
    /// under a family name an installed font already uses.
    pub fn with_system_fonts() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self::with_database(db)
    }

    fn with_database(db: Database) -> Self {
        Self {
            db: RefCell::new(db),
            registrations: RefCell::new(HashMap::new()),
            families: RefCell::new(HashSet::new()),
        }
    }

    /// Whether `family` has ever been registered this session
    pub fn has_family(&self, family: &FamilyHandle) -> bool {
        self.families.borrow().contains(family)
    }

    /// Whether a face already in the database is named `family`
    fn shadows_loaded_family(&self, family: &FamilyHandle) -> bool {
        self.db.borrow().faces().any(|face| {
            face.families
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(family.as_str()))
        })
    }

    /// Whether `family` is currently backed by live bytes
    pub fn is_live(&self, family: &FamilyHandle) -> bool {
        self.registrations
            .borrow()
            .values()
            .any(|r| &r.family == family)
    }

    /// Container of the live registration for `family`
    pub fn container(&self, family: &FamilyHandle) -> Option<Container> {
        self.registrations
            .borrow()
            .values()
            .find(|r| &r.family == family)
            .map(|r| r.container)
    }

    /// fontdb faces indexed for `family`. Compressed containers have none.
    pub fn faces(&self, family: &FamilyHandle) -> Vec<fontdb::ID> {
        self.registrations
            .borrow()
            .values()
            .find(|r| &r.family == family)
            .map(|r| r.faces.clone())
            .unwrap_or_default()
    }

    /// Number of faces in the underlying database
    pub fn face_count(&self) -> usize {
        self.db.borrow().len()
    }

    /// Number of live registrations
    pub fn len(&self) -> usize {
        self.registrations.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.borrow().is_empty()
    }
}

impl Default for FontDbTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FontTable for FontDbTable {
    async fn register_font(&self, family: &FamilyHandle, resource: &ResourceHandle) -> Result<()> {
        if self.has_family(family) || self.shadows_loaded_family(family) {
            return Err(FontError::DuplicateFamily(family.to_string()));
        }

        let bytes = resource.share_bytes();
        let Validated { container, unpacked } = smol::unblock(move || validate(&bytes)).await?;

        let sfnt = match container {
            Container::Sfnt { .. } => Some(resource.share_bytes()),
            Container::Woff { .. } => unpacked.map(Arc::new),
            Container::Woff2 => None,
        };
        let faces: Vec<fontdb::ID> = match sfnt {
            Some(sfnt) => {
                let ids = self.db.borrow_mut().load_font_source(Source::Binary(sfnt));
                if ids.is_empty() {
                    return Err(FontError::FontParsing("no usable faces".into()));
                }
                ids.into_iter().collect()
            }
            None => Vec::new(),
        };

        // The same family may have raced in while validation was off-thread.
        if !self.families.borrow_mut().insert(family.clone()) {
            let mut db = self.db.borrow_mut();
            for id in faces {
                db.remove_face(id);
            }
            return Err(FontError::DuplicateFamily(family.to_string()));
        }

        tracing::debug!(%family, ?container, faces = faces.len(), "font table registration");
        let registration = Registration {
            family: family.clone(),
            container,
            faces,
            _bytes: resource.share_bytes(),
        };
        self.registrations
            .borrow_mut()
            .insert(resource.font().clone(), registration);
        Ok(())
    }

    fn release_resource(&self, resource: ResourceHandle) {
        let Some(registration) = self.registrations.borrow_mut().remove(resource.font()) else {
            tracing::trace!(font = %resource.font(), "released unregistered resource");
            return;
        };
        let mut db = self.db.borrow_mut();
        for id in registration.faces {
            db.remove_face(id);
        }
        tracing::debug!(font = %resource.font(), family = %registration.family, "resource released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Smallest WOFF2 whose header and directory check out
    fn minimal_woff2() -> Vec<u8> {
        let mut data = vec![0u8; 48];
        data.extend_from_slice(&[10, 100, 80, 0, 0, 0, 0]);
        let len = data.len() as u32;
        data[0..4].copy_from_slice(&WOFF2_SIGNATURE.to_be_bytes());
        data[4..8].copy_from_slice(b"OTTO");
        data[8..12].copy_from_slice(&len.to_be_bytes());
        data[12..14].copy_from_slice(&1u16.to_be_bytes());
        data[20..24].copy_from_slice(&4u32.to_be_bytes());
        data
    }

    /// WOFF header claiming five tables over a junk body
    fn junk_woff() -> Vec<u8> {
        let mut data = vec![0xAAu8; 200];
        data[0..4].copy_from_slice(&WOFF_SIGNATURE.to_be_bytes());
        data[4..8].copy_from_slice(&0x0001_0000u32.to_be_bytes());
        data[8..12].copy_from_slice(&200u32.to_be_bytes());
        data[12..14].copy_from_slice(&5u16.to_be_bytes());
        data[14..16].copy_from_slice(&0u16.to_be_bytes());
        data
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        assert!(inspect(b"definitely not a font").is_err());
        assert!(inspect(&[]).is_err());
        assert!(inspect(&junk_woff()).is_err());
    }

    #[test]
    fn test_inspect_woff2() {
        assert_eq!(inspect(&minimal_woff2()).unwrap(), Container::Woff2);

        let mut truncated = minimal_woff2();
        truncated.pop();
        assert!(inspect(&truncated).is_err());
    }

    #[test]
    fn test_register_junk_woff_rejected() {
        let table = FontDbTable::new();
        let family = FamilyHandle("TypeLab_0".into());
        let handle = ResourceHandle::new(FontId::from("font-0"), junk_woff());

        let err = smol::block_on(table.register_font(&family, &handle)).unwrap_err();
        assert!(matches!(err, FontError::FontParsing(_)));
        assert!(!table.has_family(&family));
        assert!(table.is_empty());
    }

    #[test]
    fn test_register_woff2_and_release() {
        let table = FontDbTable::new();
        let family = FamilyHandle("TypeLab_1".into());
        let handle = ResourceHandle::new(FontId::from("font-1"), minimal_woff2());

        smol::block_on(table.register_font(&family, &handle)).unwrap();
        assert!(table.is_live(&family));
        assert_eq!(table.container(&family), Some(Container::Woff2));
        assert!(table.faces(&family).is_empty());

        table.release_resource(handle);
        assert!(!table.is_live(&family));
        assert!(table.has_family(&family));
    }

    #[test]
    fn test_family_never_reused() {
        let table = FontDbTable::new();
        let family = FamilyHandle("TypeLab_1".into());
        let first = ResourceHandle::new(FontId::from("font-1"), minimal_woff2());
        smol::block_on(table.register_font(&family, &first)).unwrap();
        table.release_resource(first);

        let second = ResourceHandle::new(FontId::from("font-2"), minimal_woff2());
        let err = smol::block_on(table.register_font(&family, &second)).unwrap_err();
        assert!(matches!(err, FontError::DuplicateFamily(_)));
    }

    #[test]
    fn test_register_rejects_corrupt() {
        let table = FontDbTable::new();
        let family = FamilyHandle("TypeLab_2".into());
        let handle = ResourceHandle::new(FontId::from("font-2"), vec![0, 1, 0, 0, 9, 9]);
        assert!(smol::block_on(table.register_font(&family, &handle)).is_err());
        assert!(!table.has_family(&family));
        assert!(table.is_empty());
    }
}
