//! Reserved names.

/// Navigation words legal only as the first link of a path.
pub const NAVIGATION_WORDS: &[&str] = &["this", "root", "thisField", "loginUser"];

/// Variables an expression may not assign to.
pub const NON_ASSIGNABLE: &[&str] = NAVIGATION_WORDS;

/// Free-standing helpers remapped to static methods on the utility type:
/// `(called as, implemented as)`.
pub const HELPER_METHODS: &[(&str, &str)] = &[
    ("isNull", "isNull"),
    ("isNotNull", "isNotNull"),
    ("isBlank", "isBlank"),
    ("ifNull", "nvl"),
    ("size", "sizeOf"),
];

/// Methods callable regardless of their declared access.
pub const SAFE_METHODS: &[&str] = &[
    "toString",
    "equals",
    "hashCode",
    "compareTo",
    "isNull",
    "isNotNull",
    "isBlank",
    "nvl",
    "sizeOf",
];

pub fn is_navigation_word(name: &str) -> bool {
    NAVIGATION_WORDS.contains(&name)
}

/// Utility-type method a helper name maps to.
pub fn helper_method(name: &str) -> Option<&'static str> {
    HELPER_METHODS
        .iter()
        .find(|(called, _)| *called == name)
        .map(|(_, implemented)| *implemented)
}

pub fn is_safe_method(name: &str) -> bool {
    SAFE_METHODS.contains(&name)
}
