//! Row identity.

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

/// Trait for rows that can be held by a [`DataGrid`](crate::DataGrid).
///
/// Cell access goes through [`Column`](crate::Column) accessors, so the only
/// thing a row has to provide itself is its identity.
///
/// # Example
///
/// ```
/// use datagrid_lib::GridRow;
/// use serde::Serialize;
///
/// #[derive(Clone, Serialize)]
/// struct Student {
///     id: u32,
///     name: String,
/// }
///
/// impl GridRow for Student {
///     fn key(&self) -> Option<String> {
///         Some(self.id.to_string())
///     }
/// }
/// ```
pub trait GridRow: Clone + Serialize + Send + Sync + 'static {
    /// Caller-supplied unique key for this row.
    ///
    /// Rows without a key (or with an empty one) are identified by a hash of
    /// their serialized form instead, see [`structural_key`].
    fn key(&self) -> Option<String> {
        None
    }
}

/// Returns the key the grid uses for `row`.
pub fn row_key<R: GridRow>(row: &R) -> String {
    match row.key() {
        Some(key) if !key.is_empty() => key,
        _ => structural_key(row),
    }
}

/// Deterministic identity derived from the row's JSON serialization.
///
/// Two structurally identical rows share the same key, so selecting one
/// selects both.
pub fn structural_key<R: Serialize>(row: &R) -> String {
    let bytes = match serde_json::to_vec(row) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("row could not be serialized for keying: {}", e);
            Vec::new()
        }
    };
    let digest = Sha256::digest(&bytes);
    digest[..8].iter().map(|b| format!("{:02x}", b)).collect()
}
