//! Font resources and their identifiers

use std::fmt;
use std::sync::Arc;

/// Extensions accepted by the upload picker
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".ttf", ".woff", ".woff2", ".otf"];

/// `accept` attribute value for a file picker (".ttf,.woff,.woff2,.otf")
pub fn accept_attribute() -> String {
    ALLOWED_EXTENSIONS.join(",")
}

/// Lowercase last `.`-delimited segment of a file name.
///
/// A name without a dot yields the whole name, which then fails format
/// detection.
pub fn extension_of(file_name: &str) -> String {
    file_name.rsplit('.').next().unwrap_or_default().to_lowercase()
}

/// File name with its last extension stripped ("Inter.var.ttf" -> "Inter.var")
pub fn display_name(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot + 1 < file_name.len() && !file_name[dot + 1..].contains('/') => {
            &file_name[..dot]
        }
        _ => file_name,
    }
}

/// Font container format, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFormat {
    Ttf,
    Otf,
    Woff,
    Woff2,
    Unknown,
}

impl FontFormat {
    /// Detect the format of an upload. `None` for anything outside the
    /// accepted set.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        match extension_of(file_name).as_str() {
            "ttf" => Some(FontFormat::Ttf),
            "otf" => Some(FontFormat::Otf),
            "woff" => Some(FontFormat::Woff),
            "woff2" => Some(FontFormat::Woff2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontFormat::Ttf => "ttf",
            FontFormat::Otf => "otf",
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
            FontFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session-unique font identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontId(pub String);

impl FontId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FontId {
    fn from(value: &str) -> Self {
        FontId(value.to_string())
    }
}

/// Synthetic family name a resource is registered under in the font table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FamilyHandle(pub String);

impl FamilyHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FamilyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Revocable handle to an uploaded font's bytes.
///
/// Not `Clone`: exactly one owner exists, and releasing consumes it. The font
/// table may keep shared references to the bytes until the handle is
/// released.
pub struct ResourceHandle {
    font: FontId,
    bytes: Arc<Vec<u8>>,
}

impl ResourceHandle {
    pub fn new(font: FontId, bytes: Vec<u8>) -> Self {
        Self {
            font,
            bytes: Arc::new(bytes),
        }
    }

    /// Font this handle belongs to
    pub fn font(&self) -> &FontId {
        &self.font
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Shared reference to the bytes, for collaborators that index them
    pub fn share_bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceHandle")
            .field("font", &self.font)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Identifiers reserved for an upload that has not finished loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFont {
    pub id: FontId,
    pub family: FamilyHandle,
    pub file_name: String,
    pub format: FontFormat,
}

impl PendingFont {
    /// Attach the loaded bytes, producing a registrable resource
    pub fn into_resource(self, handle: ResourceHandle) -> FontResource {
        FontResource {
            display_name: display_name(&self.file_name).to_string(),
            id: self.id,
            family: self.family,
            original_file_name: self.file_name,
            format: self.format,
            handle: Some(handle),
        }
    }
}

/// An uploaded font
#[derive(Debug)]
pub struct FontResource {
    id: FontId,
    display_name: String,
    original_file_name: String,
    format: FontFormat,
    family: FamilyHandle,
    handle: Option<ResourceHandle>,
}

impl FontResource {
    pub fn id(&self) -> &FontId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn original_file_name(&self) -> &str {
        &self.original_file_name
    }

    pub fn format(&self) -> FontFormat {
        self.format
    }

    pub fn family_handle(&self) -> &FamilyHandle {
        &self.family
    }

    /// The resource handle, `None` once released
    pub fn handle(&self) -> Option<&ResourceHandle> {
        self.handle.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    pub(crate) fn take_handle(&mut self) -> Option<ResourceHandle> {
        self.handle.take()
    }

    /// Consume the resource, yielding its handle if not yet released
    pub fn into_handle(mut self) -> Option<ResourceHandle> {
        self.handle.take()
    }

    /// Summary for the font information panel
    pub fn info(&self) -> FontInfo {
        FontInfo {
            family_name: self.display_name.clone(),
            file_name: self.original_file_name.clone(),
            format_badge: self.format.as_str().to_uppercase(),
        }
    }
}

/// Font information panel contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontInfo {
    pub family_name: String,
    pub file_name: String,
    /// Upper-cased format, e.g. "WOFF2"
    pub format_badge: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Inter.TTF"), "ttf");
        assert_eq!(extension_of("archive.tar.woff2"), "woff2");
        assert_eq!(extension_of("README"), "readme");
        assert_eq!(extension_of("trailing."), "");
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FontFormat::from_file_name("a.otf"), Some(FontFormat::Otf));
        assert_eq!(FontFormat::from_file_name("a.WOFF"), Some(FontFormat::Woff));
        assert_eq!(FontFormat::from_file_name("a.ttc"), None);
        assert_eq!(FontFormat::from_file_name("ttf"), Some(FontFormat::Ttf));
        assert_eq!(FontFormat::from_file_name("a.pdf"), None);
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Inter-Regular.ttf"), "Inter-Regular");
        assert_eq!(display_name("Inter.var.woff2"), "Inter.var");
        assert_eq!(display_name("noext"), "noext");
        assert_eq!(display_name(".ttf"), "");
    }

    #[test]
    fn test_accept_attribute() {
        assert_eq!(accept_attribute(), ".ttf,.woff,.woff2,.otf");
    }

    #[test]
    fn test_info_badge() {
        let pending = PendingFont {
            id: FontId::from("font-1"),
            family: FamilyHandle("TypeLab_1".into()),
            file_name: "Mono.woff2".into(),
            format: FontFormat::Woff2,
        };
        let resource = pending.into_resource(ResourceHandle::new(FontId::from("font-1"), vec![0; 4]));
        let info = resource.info();
        assert_eq!(info.family_name, "Mono");
        assert_eq!(info.format_badge, "WOFF2");
        assert_eq!(resource.handle().map(ResourceHandle::len), Some(4));
    }
}
