/// Coarse kind name → content-type identifier matched against `kMDItemContentTypeTree`.
///
/// Closed set: a new kind needs a new row here, names are never inferred.
pub const KIND_TABLE: &[(&str, &str)] = &[
    ("document", "public.data"),
    ("image", "public.image"),
    ("video", "public.movie"),
    ("audio", "public.audio"),
    ("pdf", "com.adobe.pdf"),
    ("code", "public.source-code"),
];

/// Case-insensitive lookup in [`KIND_TABLE`]
pub fn content_type_for_kind(kind: &str) -> Option<&'static str> {
    KIND_TABLE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(kind))
        .map(|(_, uti)| *uti)
}

pub fn supported_kinds() -> impl Iterator<Item = &'static str> {
    KIND_TABLE.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(content_type_for_kind("IMAGE"), content_type_for_kind("image"));
        assert_eq!(content_type_for_kind("Code"), Some("public.source-code"));
        assert_eq!(content_type_for_kind("pdf"), Some("com.adobe.pdf"));
    }

    #[test]
    fn unknown_kinds_are_absent() {
        assert_eq!(content_type_for_kind("spreadsheet"), None);
        assert_eq!(content_type_for_kind(""), None);
        assert_eq!(content_type_for_kind(" image"), None);
    }

    #[test]
    fn table_lists_all_six_kinds() {
        let kinds: Vec<_> = supported_kinds().collect();
        assert_eq!(
            kinds,
            vec!["document", "image", "video", "audio", "pdf", "code"]
        );
    }
}
