use super::Rendered;
use crate::core::alignment::AlignmentSet;

/// Projects word alignments onto tokens.
///
/// Every word pair becomes the cross product of the two words' tokens.
/// Pairs that name a word outside either rendering are skipped. The result
/// is sorted by (src, trg) without duplicates.
pub fn project_alignment(
    alignment: &AlignmentSet,
    source: &Rendered,
    target: &Rendered,
) -> AlignmentSet {
    let mut projected = AlignmentSet::new();

    for pair in alignment.pairs() {
        let (Some(src_tokens), Some(trg_tokens)) = (
            source.word_tokens.get(pair.src),
            target.word_tokens.get(pair.trg),
        ) else {
            continue;
        };
        for &s in src_tokens {
            for &t in trg_tokens {
                projected.push(s, t);
            }
        }
    }

    projected.sorted_unique()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::{RuleDetokenizer, SpaceTokenizer, TextCodec, VocabTokenizer};

    #[test]
    fn test_identity_for_spaces() {
        let codec = TextCodec::spaces();
        let src = codec.render(&["Hello", "world"]).unwrap();
        let trg = codec.render(&["Hallo", "Welt"]).unwrap();
        let alignment = AlignmentSet::parse("1-1 0-0").unwrap();
        assert_eq!(project_alignment(&alignment, &src, &trg).to_string(), "0-0 1-1");
    }

    #[test]
    fn test_cross_product_over_subwords() {
        let codec = TextCodec::new(
            Box::new(RuleDetokenizer::new("en")),
            Box::new(VocabTokenizer::from_pieces(["sim", "ple", "▁test"])),
        );
        let src = codec.render(&["simple", "test"]).unwrap();
        let trg = TextCodec::spaces().render(&["einfach", "Test"]).unwrap();
        let alignment = AlignmentSet::parse("0-0 1-1").unwrap();
        assert_eq!(
            project_alignment(&alignment, &src, &trg).to_string(),
            "0-0 1-0 2-1"
        );
    }

    #[test]
    fn test_words_sharing_a_token() {
        let zh = TextCodec::new(Box::new(RuleDetokenizer::new("zh")), Box::new(SpaceTokenizer));
        let src = TextCodec::spaces().render(&["This", "is", "fun"]).unwrap();
        let trg = zh.render(&["这", "是", "好玩"]).unwrap();
        let alignment = AlignmentSet::parse("0-0 1-1 2-2").unwrap();
        // "这是好玩" is a single token
        assert_eq!(
            project_alignment(&alignment, &src, &trg).to_string(),
            "0-0 1-0 2-0"
        );
    }

    #[test]
    fn test_out_of_range_pairs_skipped() {
        let codec = TextCodec::spaces();
        let src = codec.render(&["a"]).unwrap();
        let trg = codec.render(&["b"]).unwrap();
        let alignment = AlignmentSet::parse("0-0 3-0").unwrap();
        assert_eq!(project_alignment(&alignment, &src, &trg).to_string(), "0-0");
    }
}
