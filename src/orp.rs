/// Length bucket upper bounds and their fixation index.
const ORP_BUCKETS: [(usize, usize); 4] = [(1, 0), (5, 1), (9, 2), (13, 3)];
const ORP_LONG: usize = 4;

/// A word split around its fixation character
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrpSplit {
    pub left: String,
    pub center: String,
    pub right: String,
}

/// Fixation index for a word of `len` characters.
pub fn orp_index(len: usize) -> usize {
    ORP_BUCKETS
        .iter()
        .find(|(max_len, _)| len <= *max_len)
        .map(|&(_, orp)| orp)
        .unwrap_or(ORP_LONG)
}

pub fn split(text: &str) -> OrpSplit {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return OrpSplit::default();
    }
    let orp = orp_index(chars.len());

    OrpSplit {
        left: chars[..orp].iter().collect(),
        center: chars[orp..orp + 1].iter().collect(),
        right: chars[orp + 1..].iter().collect(),
    }
}
