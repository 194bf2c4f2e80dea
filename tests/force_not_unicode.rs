//! A non-unicode `FASTUTF8_FORCE_IMPLEMENTATION` value, set before first use.
//!
//! One test per file: the choice is cached for the life of the process.

#[cfg(unix)]
#[test]
fn test_non_unicode_forced_name_is_unknown() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    std::env::set_var(
        fastutf8::implementation::FORCE_IMPLEMENTATION_ENV,
        OsStr::from_bytes(b"fallback\xFF"),
    );

    assert_eq!(fastutf8::active_implementation().name(), "unsupported");
    assert!(!fastutf8::validate_utf8(b"plain ascii"));
}
