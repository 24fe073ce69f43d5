use sha2::{Digest, Sha256};

/// Content fingerprint of a display-string corpus.
///
/// Covers the learner parameters, the row count and every string in order,
/// so any vocabulary or parameter change yields a different value.
pub fn corpus_fingerprint<'a, I>(texts: I, min_support: usize, cap: usize) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut hasher = Sha256::new();
    hasher.update(format!("min_support={min_support};cap={cap};").as_bytes());
    let mut count: u64 = 0;
    for text in texts {
        hasher.update(text.as_bytes());
        hasher.update([0u8]);
        count += 1;
    }
    hasher.update(count.to_le_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_separates_strings_and_params() {
        let base = corpus_fingerprint(["ab", "c"], 3, 10);
        assert_eq!(base.len(), 64);
        assert_ne!(base, corpus_fingerprint(["a", "bc"], 3, 10));
        assert_ne!(base, corpus_fingerprint(["ab", "c"], 4, 10));
        assert_eq!(base, corpus_fingerprint(vec!["ab", "c"], 3, 10));
    }
}
