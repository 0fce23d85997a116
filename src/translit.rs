//! Lossy transliteration of descriptor strings for consumers that cannot handle anything beyond an 8-bit code page
//!
//! Accented Latin letters, Greek letters and a few ligatures fold to their plain Latin base. Anything else below U+0100 passes through untouched and the rest is dropped.
//!
//! ```
//! use comdesc::translit::to_ascii;
//!
//! assert_eq!(to_ascii("Café"), "Cafe");
//! assert_eq!(to_ascii("Straße ΔΩ"), "Strasse DO");
//! ```
use std::collections::HashMap;

/// Replacement and the characters folding to it. Scanned in order; the first group containing a character wins.
const FOLD_TABLE: &[(&str, &str)] = &[
    // Latin uppercase
    ("A", "ÀÁÂÃÄÅĀĂĄǍǞǠǺȀȂȦȺḀẠẢẤẦẨẪẬẮẰẲẴẶ"),
    ("B", "ƁƂɃḂḄḆ"),
    ("C", "ÇĆĈĊČƇȻḈ"),
    ("D", "ĎĐƉƊƋḊḌḎḐḒ"),
    ("E", "ÈÉÊËĒĔĖĘĚȄȆȨɆḔḖḘḚḜẸẺẼẾỀỂỄỆ"),
    ("F", "ƑḞ"),
    ("G", "ĜĞĠĢƓǤǦǴḠ"),
    ("H", "ĤĦȞḢḤḦḨḪ"),
    ("I", "ÌÍÎÏĨĪĬĮİƗǏȈȊḬḮỈỊ"),
    ("J", "ĴɈ"),
    ("K", "ĶƘǨḰḲḴ"),
    ("L", "ĹĻĽĿŁȽḶḸḺḼ"),
    ("M", "ḾṀṂ"),
    ("N", "ÑŃŅŇƝǸȠṄṆṈṊ"),
    ("O", "ÒÓÔÕÖØŌŎŐƟƠǑǪǬǾȌȎȪȬȮȰṌṎṐṒỌỎỐỒỔỖỘỚỜỞỠỢ"),
    ("P", "ƤṔṖ"),
    ("Q", "Ɋ"),
    ("R", "ŔŖŘȐȒɌṘṚṜṞ"),
    ("S", "ŚŜŞŠȘṠṢṤṦṨ"),
    ("T", "ŢŤŦƬƮȚȾṪṬṮṰ"),
    ("U", "ÙÚÛÜŨŪŬŮŰŲƯǓǕǗǙǛȔȖɄṲṴṶṸṺỤỦỨỪỬỮỰ"),
    ("V", "ƲṼṾ"),
    ("W", "ŴẀẂẄẆẈ"),
    ("X", "ẊẌ"),
    ("Y", "ÝŶŸƳȲɎẎỲỴỶỸ"),
    ("Z", "ŹŻŽƵȤẐẒẔ"),
    // Latin lowercase
    ("a", "àáâãäåāăąǎǟǡǻȁȃȧḁạảấầẩẫậắằẳẵặ"),
    ("b", "ƀƃɓḃḅḇ"),
    ("c", "çćĉċčƈȼḉ"),
    ("d", "ďđɖɗḋḍḏḑḓ"),
    ("e", "èéêëēĕėęěȅȇȩɇḕḗḙḛḝẹẻẽếềểễệ"),
    ("f", "ƒḟ"),
    ("g", "ĝğġģǥǧǵɠḡ"),
    ("h", "ĥħȟḣḥḧḩḫẖ"),
    ("i", "ìíîïĩīĭįıǐȉȋɨḭḯỉị"),
    ("j", "ĵǰɉ"),
    ("k", "ķƙǩḱḳḵ"),
    ("l", "ĺļľŀłƚḷḹḻḽ"),
    ("m", "ḿṁṃ"),
    ("n", "ñńņňŉǹƞɲṅṇṉṋ"),
    ("o", "òóôõöøōŏőơǒǫǭǿȍȏȫȭȯȱɵṍṏṑṓọỏốồổỗộớờởỡợ"),
    ("p", "ƥṕṗ"),
    ("q", "ɋ"),
    ("r", "ŕŗřȑȓɍṙṛṝṟ"),
    ("s", "śŝşšșṡṣṥṧṩ"),
    ("t", "ţťŧƫƭțṫṭṯṱẗ"),
    ("u", "ùúûüũūŭůűųưǔǖǘǚǜȕȗʉṳṵṷṹṻụủứừửữự"),
    ("v", "ʋṽṿ"),
    ("w", "ŵẁẃẅẇẉẘ"),
    ("x", "ẋẍ"),
    ("y", "ýÿŷƴȳɏẏẙỳỵỷỹ"),
    ("z", "źżžƶȥẑẓẕ"),
    // Greek uppercase
    ("A", "ΑΆ"),
    ("B", "Β"),
    ("G", "Γ"),
    ("D", "Δ"),
    ("E", "ΕΈ"),
    ("Z", "Ζ"),
    ("I", "ΗΉΙΊΪ"),
    ("TH", "Θ"),
    ("K", "Κ"),
    ("L", "Λ"),
    ("M", "Μ"),
    ("N", "Ν"),
    ("X", "Ξ"),
    ("O", "ΟΌΩΏ"),
    ("P", "Π"),
    ("R", "Ρ"),
    ("S", "Σ"),
    ("T", "Τ"),
    ("Y", "ΥΎΫ"),
    ("F", "Φ"),
    ("CH", "Χ"),
    ("PS", "Ψ"),
    // Greek lowercase
    ("a", "αά"),
    ("b", "β"),
    ("g", "γ"),
    ("d", "δ"),
    ("e", "εέ"),
    ("z", "ζ"),
    ("i", "ηήιίϊΐ"),
    ("th", "θ"),
    ("k", "κ"),
    ("l", "λ"),
    ("m", "μµ"),
    ("n", "ν"),
    ("x", "ξ"),
    ("o", "οόωώ"),
    ("p", "π"),
    ("r", "ρ"),
    ("s", "σς"),
    ("t", "τ"),
    ("y", "υύϋΰ"),
    ("f", "φ"),
    ("ch", "χ"),
    ("ps", "ψ"),
    // ligatures
    ("AE", "ÆǢǼ"),
    ("ae", "æǣǽ"),
    ("OE", "Œ"),
    ("oe", "œ"),
    ("IJ", "Ĳ"),
    ("ij", "ĳ"),
    ("ss", "ß"),
    ("ff", "ﬀ"),
    ("fi", "ﬁ"),
    ("fl", "ﬂ"),
    ("ffi", "ﬃ"),
    ("ffl", "ﬄ"),
    ("st", "ﬅﬆ"),
];

lazy_static! {
    /// [`FOLD_TABLE`] compiled to a lookup map, keeping the first group for any repeated character
    static ref FOLD_MAP: HashMap<char, &'static str> = {
        let mut map = HashMap::new();
        for (replacement, sources) in FOLD_TABLE {
            for c in sources.chars() {
                map.entry(c).or_insert(*replacement);
            }
        }
        map
    };
}

/// Replacement for a single character: the folded base, the character itself if below U+0100, else `None`
///
/// ```
/// use comdesc::translit::transliterate_char;
///
/// assert_eq!(transliterate_char('é').as_deref(), Some("e"));
/// assert_eq!(transliterate_char('©').as_deref(), Some("©"));
/// assert_eq!(transliterate_char('€'), None);
/// ```
pub fn transliterate_char(c: char) -> Option<String> {
    if let Some(replacement) = FOLD_MAP.get(&c) {
        Some(replacement.to_string())
    } else if (c as u32) < 0x100 {
        Some(c.to_string())
    } else {
        None
    }
}

/// Transliterate every character of `s`, see [`transliterate_char`]
pub fn to_ascii(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match FOLD_MAP.get(&c) {
            Some(replacement) => out.push_str(replacement),
            None if (c as u32) < 0x100 => out.push(c),
            None => log::trace!("Dropping {:?} from '{}'", c, s),
        }
    }
    out
}
