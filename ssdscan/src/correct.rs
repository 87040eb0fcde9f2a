//! Edit-distance based correction of OCR'd ship name tokens.

use crate::dict::Dictionary;

/// Classic edit distance between two strings: single-character
/// insertions, deletions and substitutions at unit cost, no
/// transpositions.  Iterative, one row of state at a time.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut current = Vec::with_capacity(b.len() + 1);
        current.push(i + 1);
        for (j, cb) in b.iter().enumerate() {
            let insertion = previous[j + 1] + 1;
            let deletion = current[j] + 1;
            let substitution = previous[j] + usize::from(ca != cb);
            current.push(insertion.min(deletion).min(substitution));
        }
        previous = current;
    }
    previous[b.len()]
}

/// Correct a single OCR'd token against a dictionary.
///
/// In order: a known misreading is replaced by its substitution phrase
/// outright; a token within the distance budget of any forbidden word
/// is rejected (empty result); otherwise the token snaps to the closest
/// allowed word if that word is within budget, and passes through
/// unchanged if not (or if there are no allowed words at all).  The
/// budget is `token length x max_distance_ratio`, and distance ties
/// between allowed words go to the earliest dictionary entry.
pub fn correct_word(word: &str, dict: &Dictionary, max_distance_ratio: f64) -> String {
    if word.is_empty() {
        return String::new();
    }
    if let Some(substitution) = dict.substitution(word) {
        return substitution.to_owned();
    }

    let upper = word.to_uppercase();
    // 'as' is safe here because token lengths are tiny.
    let budget = word.chars().count() as f64 * max_distance_ratio;

    for forbidden in dict.forbidden() {
        if edit_distance(&upper, forbidden) as f64 <= budget {
            return String::new();
        }
    }

    if dict.allowed().is_empty() {
        return word.to_owned();
    }

    let mut best: Option<(&str, usize)> = None;
    for candidate in dict.allowed() {
        let distance = edit_distance(&upper, candidate);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }
    match best {
        Some((candidate, distance)) if distance as f64 <= budget => candidate.to_owned(),
        _ => word.to_owned(),
    }
}

/// Correct a token sequence and truncate it at the first stop word.
///
/// Each token is corrected independently; rejected tokens are dropped.
/// Accumulation halts after the first corrected entry that is a stop
/// word, keeping the stop word itself.
pub fn correct_tokens(tokens: &[String], dict: &Dictionary, max_distance_ratio: f64) -> Vec<String> {
    let mut corrected = vec![];
    for token in tokens {
        let word = correct_word(token, dict, max_distance_ratio);
        if word.is_empty() {
            continue;
        }
        let stop = dict.is_stop(&word);
        corrected.push(word);
        if stop {
            break;
        }
    }
    corrected
}

#[cfg(test)]
mod test {
    use crate::dict::DictLine;

    use super::*;

    fn dict_with(lines: &[DictLine]) -> Dictionary {
        let mut dict = Dictionary::new();
        for line in lines {
            dict.insert(line.clone());
        }
        dict
    }

    fn allowed(word: &str) -> DictLine {
        DictLine::Allowed(word.to_owned())
    }

    #[test]
    fn distance_counts_single_character_edits() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("", "ABC"), 3);
        assert_eq!(edit_distance("ABC", ""), 3);
        assert_eq!(edit_distance("KITTEN", "SITTING"), 3);
        assert_eq!(edit_distance("FEDRATION", "FEDERATION"), 1);
    }

    #[test]
    fn close_tokens_snap_to_the_nearest_allowed_word() {
        let dict = dict_with(&[allowed("FEDERATION")]);
        assert_eq!(correct_word("FEDRATION", &dict, 0.4), "FEDERATION");
    }

    #[test]
    fn far_tokens_pass_through_unchanged() {
        let dict = dict_with(&[allowed("FEDERATION")]);
        assert_eq!(correct_word("XYZXYZXYZ", &dict, 0.4), "XYZXYZXYZ");
    }

    #[test]
    fn empty_dictionary_passes_everything_through() {
        let dict = Dictionary::new();
        assert_eq!(correct_word("ANYTHING", &dict, 0.4), "ANYTHING");
    }

    #[test]
    fn forbidden_proximity_wins_over_an_allowed_match() {
        let dict = dict_with(&[
            allowed("CHARGE"),
            DictLine::Forbidden("CHART".to_owned()),
        ]);
        // CHARX is one edit from CHART and two from CHARGE; the
        // forbidden check runs first and rejects the token outright.
        assert_eq!(correct_word("CHARX", &dict, 0.4), "");
    }

    #[test]
    fn substitutions_bypass_distance_matching() {
        let dict = dict_with(&[DictLine::Substitution {
            wrong: "VESSEI".to_owned(),
            correct: "USS Enterprise".to_owned(),
        }]);
        assert_eq!(correct_word("vessei", &dict, 0.4), "USS Enterprise");
    }

    #[test]
    fn distance_ties_go_to_the_earliest_dictionary_entry() {
        // BAT is one edit from both BAR and BAD.
        let dict = dict_with(&[allowed("BAR"), allowed("BAD")]);
        assert_eq!(correct_word("BAT", &dict, 0.4), "BAR");
    }

    #[test]
    fn sequences_truncate_inclusively_at_the_stop_word() {
        let dict = dict_with(&[
            allowed("USS"),
            allowed("ENTERPRISE"),
            DictLine::Stop("NCC-1701".to_owned()),
            allowed("CLASS"),
        ]);
        let tokens = ["USS", "ENTERPRISE", "NCC-1701", "CLASS"]
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            correct_tokens(&tokens, &dict, 0.4),
            ["USS", "ENTERPRISE", "NCC-1701"]
        );
    }

    #[test]
    fn correction_is_idempotent_on_dictionary_words() {
        let dict = dict_with(&[allowed("FEDERATION"), allowed("HEAVY"), allowed("CRUISER")]);
        let tokens = ["FEDERATION", "HEAVY", "CRUISER"]
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>();
        let once = correct_tokens(&tokens, &dict, 0.4);
        let twice = correct_tokens(&once, &dict, 0.4);
        assert_eq!(once, tokens);
        assert_eq!(twice, once);
    }
}
