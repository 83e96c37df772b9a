//! Public object URL parsing for storage cleanup.
//!
//! Media rows store the full public URL of their backing object. Deleting a
//! blob requires the storage-relative path, which is recovered by matching
//! the conventional public-object URL layout:
//!
//! ```text
//! https://{host}/storage/v1/object/public/{bucket}/{path...}
//! ```

/// A storage object reference resolved from a public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub path: String,
}

/// Marker segment preceding `{bucket}/{path}` in public object URLs.
const PUBLIC_OBJECT_MARKER: &str = "/storage/v1/object/public/";

/// Resolve the bucket and storage-relative path from a public object URL.
///
/// Returns `None` when the URL does not match the expected layout. Callers
/// performing cleanup skip such assets instead of failing the operation.
///
/// # Examples
///
/// ```
/// use shopkit_core::storage::object_ref_from_public_url;
///
/// let r = object_ref_from_public_url(
///     "https://cdn.example.com/storage/v1/object/public/media/categories/tv.png",
/// )
/// .unwrap();
/// assert_eq!(r.bucket, "media");
/// assert_eq!(r.path, "categories/tv.png");
/// ```
pub fn object_ref_from_public_url(url: &str) -> Option<ObjectRef> {
    let rest = url.split_once(PUBLIC_OBJECT_MARKER)?.1;
    let (bucket, path) = rest.split_once('/')?;
    if bucket.is_empty() || path.is_empty() {
        return None;
    }
    // Strip any query string from the object path.
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return None;
    }
    Some(ObjectRef {
        bucket: bucket.to_string(),
        path: path.to_string(),
    })
}
