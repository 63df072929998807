//! Embedded table of known top-level domains.
//!
//! The email check validates the final domain label against this table
//! instead of performing any network lookup. The table covers the generic
//! and sponsored TLDs plus the ISO country codes; it is intentionally a
//! snapshot, not a live registry.

/// Known TLD labels, lowercase and sorted for binary search.
const KNOWN_TLDS: &[&str] = &[
    "ac", "ad", "ae", "aero", "af", "ag", "ai", "al", "am", "ao", "app", "ar", "as", "asia", "at",
    "au", "aw", "az", "ba", "bb", "bd", "be", "bf", "bg", "bh", "bi", "biz", "bj", "bm", "bn",
    "bo", "br", "bs", "bt", "bw", "by", "bz", "ca", "cat", "cc", "cd", "cf", "cg", "ch", "ci",
    "cl", "cloud", "cm", "cn", "co", "com", "coop", "cr", "cu", "cv", "cy", "cz", "de", "dev",
    "dj", "dk", "dm", "do", "dz", "ec", "edu", "ee", "eg", "es", "et", "eu", "fi", "fj", "fm",
    "fo", "fr", "ga", "gd", "ge", "gg", "gh", "gi", "gl", "gm", "gov", "gp", "gr", "gt", "gu",
    "gy", "hk", "hn", "hr", "ht", "hu", "id", "ie", "il", "im", "in", "info", "int", "io", "iq",
    "ir", "is", "it", "je", "jm", "jo", "jobs", "jp", "ke", "kg", "kh", "ki", "km", "kn", "kp",
    "kr", "kw", "ky", "kz", "la", "lb", "lc", "li", "lk", "lr", "ls", "lt", "lu", "lv", "ly",
    "ma", "mc", "md", "me", "mg", "mil", "mk", "ml", "mm", "mn", "mo", "mobi", "mp", "mq", "mr",
    "ms", "mt", "mu", "museum", "mv", "mw", "mx", "my", "mz", "na", "name", "nc", "ne", "net",
    "nf", "ng", "ni", "nl", "no", "np", "nr", "nu", "nz", "om", "org", "pa", "pe", "pf", "pg",
    "ph", "pk", "pl", "pm", "pn", "pr", "pro", "ps", "pt", "pw", "py", "qa", "re", "ro", "rs",
    "ru", "rw", "sa", "sb", "sc", "sd", "se", "sg", "sh", "si", "sk", "sl", "sm", "sn", "so",
    "sr", "ss", "st", "sv", "sy", "sz", "tc", "td", "tech", "tel", "tg", "th", "tj", "tk", "tl",
    "tm", "tn", "to", "tr", "tt", "tv", "tw", "tz", "ua", "ug", "uk", "us", "uy", "uz", "va",
    "vc", "ve", "vg", "vi", "vn", "vu", "ws", "xyz", "ye", "za", "zm", "zw",
];

/// Returns whether a domain label is a known TLD (case-insensitive).
pub(crate) fn is_known(label: &str) -> bool {
    let lower = label.to_ascii_lowercase();
    KNOWN_TLDS.binary_search(&lower.as_str()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted() {
        let mut sorted = KNOWN_TLDS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, KNOWN_TLDS);
    }

    #[test]
    fn test_common_tlds_are_known() {
        for tld in ["com", "org", "net", "io", "dev", "co", "uk"] {
            assert!(is_known(tld), "{tld} should be known");
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert!(is_known("COM"));
        assert!(is_known("Io"));
    }

    #[test]
    fn test_unknown_labels_are_rejected() {
        assert!(!is_known("abc"));
        assert!(!is_known("localdomain"));
        assert!(!is_known(""));
    }
}
