//! Asset name handling.
//!
//! Platform asset stores key resources by a relative, slash-separated name
//! and have no notion of a parent directory. Names are normalized before
//! they reach an [`AssetManager`](crate::AssetManager) so that the same
//! resource is found however the caller spells it, and so that a
//! directory-backed manager cannot be walked out of its root with `..`.

use crate::ResourceError;

/// Normalize an asset name.
///
/// Backslashes count as separators. Empty and `.` segments are dropped,
/// which also strips leading, trailing and repeated slashes. A `..` segment
/// or a name with no segments left is rejected with
/// [`ResourceError::InvalidName`].
pub fn normalize(name: &str) -> Result<String, ResourceError> {
    let segments = name
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .map(|segment| match segment {
            ".." => Err(ResourceError::InvalidName(format!(
                "'{name}' leaves the asset root"
            ))),
            _ => Ok(segment),
        })
        .collect::<Result<Vec<_>, _>>()?;

    if segments.is_empty() {
        return Err(ResourceError::InvalidName("empty name".into()));
    }
    Ok(segments.join("/"))
}
