/// True when Unicode marks `c` emoji-capable. Covers the common emoji
/// blocks rather than the full property table.
fn has_emoji_property(c: char) -> bool {
    matches!(c,
        '#' | '*' | '0'..='9'
        | '\u{00A9}' | '\u{00AE}'
        | '\u{203C}' | '\u{2049}' | '\u{2122}' | '\u{2139}'
        | '\u{2194}'..='\u{2199}' | '\u{21A9}'..='\u{21AA}'
        | '\u{231A}'..='\u{231B}' | '\u{2328}' | '\u{23CF}'
        | '\u{23E9}'..='\u{23F3}' | '\u{23F8}'..='\u{23FA}'
        | '\u{24C2}'
        | '\u{25AA}'..='\u{25AB}' | '\u{25B6}' | '\u{25C0}' | '\u{25FB}'..='\u{25FE}'
        | '\u{2600}'..='\u{27BF}'
        | '\u{2934}'..='\u{2935}'
        | '\u{2B05}'..='\u{2B07}' | '\u{2B1B}'..='\u{2B1C}' | '\u{2B50}' | '\u{2B55}'
        | '\u{3030}' | '\u{303D}' | '\u{3297}' | '\u{3299}'
        | '\u{1F004}' | '\u{1F0CF}'
        | '\u{1F170}'..='\u{1F171}' | '\u{1F17E}'..='\u{1F17F}' | '\u{1F18E}'
        | '\u{1F191}'..='\u{1F19A}' | '\u{1F1E6}'..='\u{1F1FF}'
        | '\u{1F201}'..='\u{1F202}' | '\u{1F21A}' | '\u{1F22F}'
        | '\u{1F232}'..='\u{1F23A}' | '\u{1F250}'..='\u{1F251}'
        | '\u{1F300}'..='\u{1F5FF}'
        | '\u{1F600}'..='\u{1F64F}'
        | '\u{1F680}'..='\u{1F6FF}'
        | '\u{1F7E0}'..='\u{1F7F0}'
        | '\u{1F900}'..='\u{1F9FF}'
        | '\u{1FA00}'..='\u{1FAFF}'
    )
}

/// Heuristic check that a string is a single emoji grapheme.
///
/// Unicode marks some plain characters (like '1' or '#') emoji-capable
/// because a following modifier can force emoji presentation. A bare scalar
/// only counts once it is past the legacy symbol range; anything built from
/// several scalars (keycaps, flags, skin tones, ZWJ sequences) counts as
/// long as it starts emoji-capable.
pub fn is_emoji(text: &str) -> bool {
    let mut scalars = text.chars();
    let first = match scalars.next() {
        Some(c) => c,
        None => return false,
    };
    if !has_emoji_property(first) {
        return false;
    }
    first as u32 >= 0x238D || scalars.next().is_some()
}
