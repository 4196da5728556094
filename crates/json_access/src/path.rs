//! Path segments
//!
//! A path is any iterable of [`PathSegment`]s. Every segment is normalized to
//! its string form before lookup, so numbers and domain tags can be used
//! alongside plain strings.

use std::borrow::Cow;

/// A single key in a JSON path
///
/// Implemented for string types and integers. Implement it for your own
/// enums to use them directly as keys.
pub trait PathSegment {
    /// The key this segment looks up
    fn segment(&self) -> Cow<'_, str>;
}

impl PathSegment for str {
    fn segment(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl PathSegment for String {
    fn segment(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl PathSegment for Cow<'_, str> {
    fn segment(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_ref())
    }
}

impl<T: PathSegment + ?Sized> PathSegment for &T {
    fn segment(&self) -> Cow<'_, str> {
        (**self).segment()
    }
}

macro_rules! impl_integer_segment {
    ($($ty:ty),*) => {
        $(
            impl PathSegment for $ty {
                fn segment(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

impl_integer_segment!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Build a path from segments of mixed types
///
/// Expands to an array of owned strings, so the result can be stored and
/// reused.
///
/// ```rust
/// use json_access::path;
///
/// let keys = path!["results", 0, "geometry"];
/// assert_eq!(keys, ["results", "0", "geometry"]);
/// ```
#[macro_export]
macro_rules! path {
    ($($segment:expr),* $(,)?) => {
        [$($crate::PathSegment::segment(&$segment).into_owned()),*]
    };
}

/// Render normalized keys as a dotted path, `$` for the root
#[must_use]
pub fn render_path(keys: &[String]) -> String {
    if keys.is_empty() {
        "$".to_string()
    } else {
        keys.join(".")
    }
}

/// Normalize an iterable of segments into owned keys
pub(crate) fn collect_keys<I>(path: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: PathSegment,
{
    path.into_iter()
        .map(|segment| segment.segment().into_owned())
        .collect()
}
