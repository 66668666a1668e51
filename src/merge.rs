//! Top-level merge entry points.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::debug;

use crate::engine::Merger;
use crate::error::{MergeError, MergeResult};
use crate::options::MergeOptions;
use crate::resolver::Handle;
use crate::value::Value;

/// Merge `src` into a copy of `dst`.
///
/// Neither input is modified. On error no partial result is returned.
///
/// A container reached through a reference is merged at most once per call.
/// Any later visit to the same storage keeps a copy of the destination,
/// whether it closes a cycle or is only shared by two fields.
pub fn merge(dst: &Value, src: &Value, options: &MergeOptions) -> MergeResult<Value> {
    if !dst.is_valid() {
        return Err(MergeError::InvalidValue("destination"));
    }
    if !src.is_valid() {
        return Err(MergeError::InvalidValue("source"));
    }
    debug!(
        destination = %dst.category(),
        source = %src.category(),
        resolver = %options.default_resolver(),
        "merging"
    );

    let mut merger = Merger::new(options);
    let resolver = options.default_resolver();
    let merged = merger.merge(Handle::Borrowed(dst), Handle::Borrowed(src), resolver);
    match &merged {
        Ok(_) => debug!(visited = merger.visited_len(), "merge complete"),
        Err(e) => debug!(error = %e, "merge failed"),
    }
    merged
}

/// Merge and store the result in `dst`. `dst` is left untouched on error.
pub fn merge_into(dst: &mut Value, src: &Value, options: &MergeOptions) -> MergeResult<()> {
    *dst = merge(dst, src, options)?;
    Ok(())
}

/// [`merge`], panicking on error.
pub fn must_merge(dst: &Value, src: &Value, options: &MergeOptions) -> Value {
    match merge(dst, src, options) {
        Ok(merged) => merged,
        Err(e) => panic!("[Smooai Merge] {e}"),
    }
}

/// [`merge`], converting a panic raised during the call into [`MergeError::Aborted`].
pub fn safe_merge(dst: &Value, src: &Value, options: &MergeOptions) -> MergeResult<Value> {
    catch_unwind(AssertUnwindSafe(|| merge(dst, src, options))).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        debug!(message = %message, "merge panicked");
        Err(MergeError::Aborted(message))
    })
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
