//! Property tests for run-aware substitution

use doc_model::{Cell, CellValue, FormatHandle, Paragraph, Run};
use fill_engine::{redistribute, CellReplacer, RunAwareReplacer, TokenMapping};
use proptest::prelude::*;
use proptest::sample::Index;

const TOKENS: [(&str, &str); 3] = [
    ("[nom]", "Alice Martin"),
    ("[ville]", "Arles"),
    ("[date]", ""),
];

fn mapping() -> TokenMapping {
    TokenMapping::from_pairs(TOKENS).unwrap()
}

/// Literal text never contains brackets, so tokens only come from `Just` pieces
fn piece() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zé ,.]{0,8}",
        Just("[nom]".to_string()),
        Just("[ville]".to_string()),
        Just("[date]".to_string()),
    ]
}

/// Split `text` at the given character positions into a paragraph
fn fragment(text: &str, cuts: &[Index]) -> Paragraph {
    let chars: Vec<char> = text.chars().collect();
    let mut positions: Vec<usize> = cuts.iter().map(|c| c.index(chars.len() + 1)).collect();
    positions.sort_unstable();

    let mut runs = Vec::new();
    let mut start = 0;
    for pos in positions.into_iter().chain(std::iter::once(chars.len())) {
        let text: String = chars[start..pos].iter().collect();
        runs.push(Run::with_format(text, FormatHandle::from(runs.len())));
        start = pos;
    }
    Paragraph::from_runs(runs)
}

fn plain_replace(text: &str) -> String {
    TOKENS
        .iter()
        .fold(text.to_string(), |acc, (token, value)| acc.replace(token, value))
}

proptest! {
    #[test]
    fn concatenation_equals_flat_replacement(
        pieces in prop::collection::vec(piece(), 0..10),
        cuts in prop::collection::vec(any::<Index>(), 0..6),
    ) {
        let text = pieces.concat();
        let mut paragraph = fragment(&text, &cuts);
        RunAwareReplacer::new().replace(&mut paragraph, &mapping());
        prop_assert_eq!(paragraph.text(), plain_replace(&text));
    }

    #[test]
    fn run_count_and_formats_preserved(
        pieces in prop::collection::vec(piece(), 0..10),
        cuts in prop::collection::vec(any::<Index>(), 0..6),
    ) {
        let text = pieces.concat();
        let mut paragraph = fragment(&text, &cuts);
        let formats: Vec<FormatHandle> = paragraph.runs().iter().map(|r| r.format()).collect();

        RunAwareReplacer::new().replace(&mut paragraph, &mapping());

        let after: Vec<FormatHandle> = paragraph.runs().iter().map(|r| r.format()).collect();
        prop_assert_eq!(formats, after);
    }

    #[test]
    fn paragraphs_without_tokens_untouched(
        text in "[a-zé ,.]{0,40}",
        cuts in prop::collection::vec(any::<Index>(), 0..6),
    ) {
        let mut paragraph = fragment(&text, &cuts);
        let before = paragraph.clone();
        RunAwareReplacer::new().replace(&mut paragraph, &mapping());
        prop_assert_eq!(paragraph, before);
    }

    #[test]
    fn redistribution_shares_follow_proportions(
        new_text in "[a-z]{0,60}",
        lengths in prop::collection::vec(0usize..20, 1..6),
    ) {
        let total: usize = lengths.iter().sum();
        prop_assume!(total > 0);

        let slices = redistribute(&new_text, &lengths).unwrap();
        prop_assert_eq!(slices.len(), lengths.len());
        prop_assert_eq!(slices.concat(), new_text.clone());

        let n = new_text.chars().count();
        for (slice, len) in slices.iter().zip(&lengths).take(lengths.len() - 1) {
            prop_assert_eq!(slice.chars().count(), n * len / total);
        }
    }

    #[test]
    fn cells_equal_sequential_replace(text in "([a-z ]|\\[nom\\]|\\[ville\\]){0,12}") {
        let mut cell = Cell::new(CellValue::Text(text.clone()));
        CellReplacer::new().replace(&mut cell, &mapping());
        let expected = plain_replace(&text);
        if expected == text {
            prop_assert!(!cell.is_dirty());
        }
        prop_assert_eq!(cell.value, CellValue::Text(expected));
    }
}

#[test]
fn fragmented_placeholder_example() {
    let mut paragraph = Paragraph::from_texts(["Bonjour ", "[no", "m], bienvenue"]);
    let mapping = TokenMapping::from_pairs([("[nom]", "Alice")]).unwrap();
    RunAwareReplacer::new().replace(&mut paragraph, &mapping);

    assert_eq!(paragraph.text(), "Bonjour Alice, bienvenue");
    assert_eq!(paragraph.run_count(), 3);
}

#[test]
fn shrinking_replacement_example() {
    // "Hello [x]!" over runs of 3/4/3 chars, replaced to "Hello !"
    let mut paragraph = Paragraph::from_texts(["Hel", "lo [", "x]!"]);
    let mapping = TokenMapping::from_pairs([("[x]", "")]).unwrap();
    RunAwareReplacer::new().replace(&mut paragraph, &mapping);

    // 7 chars: floor(7*3/10)=2, floor(7*4/10)=2, remainder 3
    assert_eq!(paragraph.run_texts(), vec!["He", "ll", "o !"]);
}
