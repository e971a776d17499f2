//! Small string and predicate helpers.

use std::borrow::Cow;

/// Width file names are clipped to in listings and progress output.
pub const DISPLAY_NAME_WIDTH: i64 = 40;

const ELLIPSIS: &str = "...";

/// Clip `text` to at most `max_len` characters (never less than 3).
///
/// ```
/// use deft_core::util::clip;
///
/// assert_eq!(clip("hello", 10), "hello");
/// assert_eq!(clip("hello", 4), "h...");
/// assert_eq!(clip("hello", -1), "...");
/// ```
pub fn clip(text: &str, max_len: i64) -> Cow<'_, str> {
    let limit = usize::try_from(max_len.max(3)).unwrap_or(usize::MAX);

    if text.chars().count() <= limit {
        return Cow::Borrowed(text);
    }

    let kept: String = text.chars().take(limit - ELLIPSIS.len()).collect();
    Cow::Owned(kept + ELLIPSIS)
}

/// Complement of `predicate`, for turning inclusion filters into exclusions.
pub fn negate<T, F>(predicate: F) -> impl Fn(&T) -> bool
where
    T: ?Sized,
    F: Fn(&T) -> bool,
{
    move |value| !predicate(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_keeps_short_text() {
        assert_eq!(clip("hello", 10), "hello");
        assert_eq!(clip("hello", 5), "hello");
        assert_eq!(clip("", 0), "");
        assert!(matches!(clip("abc", -10), Cow::Borrowed(_)));
    }

    #[test]
    fn test_clip_truncates_long_text() {
        assert_eq!(clip("hello", 4), "h...");
        assert_eq!(clip("hello", -1), "...");
        assert_eq!(clip("hello", 3), "...");
    }

    #[test]
    fn test_clip_result_has_exact_width() {
        let name = "a-very-long-file-name-that-will-not-fit-in-the-listing.min.js";
        let clipped = clip(name, DISPLAY_NAME_WIDTH);
        assert_eq!(clipped.chars().count(), 40);
        assert!(clipped.ends_with("..."));
    }

    #[test]
    fn test_clip_counts_characters_not_bytes() {
        assert_eq!(clip("héllo", 5), "héllo");
        assert_eq!(clip("héllo wörld", 6), "hél...");
    }

    #[test]
    fn test_negate_complements_predicate() {
        let always = |_: &()| true;
        assert!(always(&()));
        assert!(!negate(always)(&()));
    }

    #[test]
    fn test_negate_twice_is_identity() {
        let is_even = |n: &i32| n % 2 == 0;
        let same = negate(negate(is_even));
        for n in -3..=3 {
            assert_eq!(same(&n), is_even(&n));
        }
    }

    #[test]
    fn test_negate_works_as_filter() {
        let names = ["a.js", "b.css", "c.js"];
        let non_js: Vec<_> = names
            .iter()
            .copied()
            .filter(negate(|name: &&str| name.ends_with(".js")))
            .collect();
        assert_eq!(non_js, vec!["b.css"]);
    }
}
