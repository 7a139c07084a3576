use std::fmt;

/// Two-letter country code, normalized to uppercase ASCII.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parse a code from untrusted input, accepting any case and surrounding
    /// whitespace. Returns `None` unless the trimmed input is exactly two
    /// ASCII letters.
    pub fn parse(raw: &str) -> Option<Self> {
        let bytes = raw.trim().as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        Some(Self([
            bytes[0].to_ascii_uppercase(),
            bytes[1].to_ascii_uppercase(),
        ]))
    }

    /// The two uppercase letters of the code.
    pub fn letters(&self) -> [char; 2] {
        [self.0[0] as char, self.0[1] as char]
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b] = self.letters();
        write!(f, "{a}{b}")
    }
}

/// Country codes known to the map artwork, paired with the lowercase
/// identifier suffix their region elements use. Codes present in member data
/// but absent here have no drawn region and are skipped by callers.
/// Sorted by code for binary search.
const REGION_SUFFIXES: [(&str, &str); 62] = [
    ("AD", "ad"), ("AL", "al"), ("AM", "am"), ("AT", "at"), ("AZ", "az"),
    ("BA", "ba"), ("BE", "be"), ("BG", "bg"), ("BY", "by"), ("CH", "ch"),
    ("CY", "cy"), ("CZ", "cz"), ("DE", "de"), ("DK", "dk"), ("DZ", "dz"),
    ("EE", "ee"), ("ES", "es"), ("FI", "fi"), ("FR", "fr"), ("GB", "gb"),
    ("GE", "ge"), ("GL", "gl"), ("GR", "gr"), ("HR", "hr"), ("HU", "hu"),
    ("IE", "ie"), ("IL", "il"), ("IQ", "iq"), ("IR", "ir"), ("IS", "is"),
    ("IT", "it"), ("JO", "jo"), ("KS", "ks"), ("KZ", "kz"), ("LB", "lb"),
    ("LI", "li"), ("LT", "lt"), ("LU", "lu"), ("LV", "lv"), ("MA", "ma"),
    ("MC", "mc"), ("MD", "md"), ("ME", "me"), ("MK", "mk"), ("MT", "mt"),
    ("NL", "nl"), ("NO", "no"), ("PL", "pl"), ("PT", "pt"), ("RO", "ro"),
    ("RS", "rs"), ("RU", "ru"), ("SA", "sa"), ("SE", "se"), ("SI", "si"),
    ("SK", "sk"), ("SM", "sm"), ("SY", "sy"), ("TM", "tm"), ("TN", "tn"),
    ("TR", "tr"), ("UA", "ua"),
];

/// Resolve a country code to the region identifier suffix used by the
/// artwork. `None` means the artwork has no region for this code.
pub fn region_suffix(code: CountryCode) -> Option<&'static str> {
    let [a, b] = code.letters();
    let key = [a as u8, b as u8];
    REGION_SUFFIXES
        .binary_search_by(|(c, _)| c.as_bytes().cmp(&key[..]))
        .ok()
        .map(|idx| REGION_SUFFIXES[idx].1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        assert_eq!(CountryCode::parse("fr"), CountryCode::parse("FR"));
        assert_eq!(CountryCode::parse(" de "), CountryCode::parse("DE"));
        let shown = CountryCode::parse("fr").map(|c| c.to_string());
        assert_eq!(shown.as_deref(), Some("FR"));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert_eq!(CountryCode::parse(""), None);
        assert_eq!(CountryCode::parse("F"), None);
        assert_eq!(CountryCode::parse("FRA"), None);
        assert_eq!(CountryCode::parse("F1"), None);
    }

    #[test]
    fn known_codes_resolve_to_lowercase_suffix() {
        for (code, suffix) in REGION_SUFFIXES {
            let parsed = CountryCode::parse(code).expect("table codes are valid");
            assert_eq!(region_suffix(parsed), Some(suffix));
        }
    }

    #[test]
    fn unknown_codes_yield_none() {
        for raw in ["US", "JP", "ZZ", "BR"] {
            let code = CountryCode::parse(raw).expect("valid shape");
            assert_eq!(region_suffix(code), None);
        }
    }

    #[test]
    fn table_is_sorted_for_binary_search() {
        let mut prev = "";
        for (code, _) in REGION_SUFFIXES {
            assert!(prev < code);
            prev = code;
        }
    }
}
