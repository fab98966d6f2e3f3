/// Capability of the host's spell checker
pub trait SpellChecker {
    fn has_problem(&self, word: &str) -> bool;
    fn suggestions(&self, word: &str) -> Vec<String>;
}

/// Upper bound on the spelling cross-product; later combinations are dropped
pub const MAX_SPELLING_COMBINATIONS: usize = 256;

fn is_alphanumeric(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_alphanumeric)
}

/// Alphanumeric runs and punctuation runs; whitespace only separates
fn tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, bool)> = None;

    for (i, c) in text.char_indices() {
        let class = if c.is_whitespace() {
            None
        } else {
            Some(c.is_alphanumeric())
        };
        match (start, class) {
            (Some((_, alnum)), Some(cls)) if alnum == cls => {}
            (Some((s, _)), _) => {
                tokens.push(&text[s..i]);
                start = class.map(|cls| (i, cls));
            }
            (None, _) => {
                start = class.map(|cls| (i, cls));
            }
        }
    }
    if let Some((s, _)) = start {
        tokens.push(&text[s..]);
    }
    tokens
}

fn join_choice(choices: &[Vec<String>], counters: &[usize]) -> String {
    let mut out = String::new();
    let mut prev_alnum = false;
    for (options, &index) in choices.iter().zip(counters) {
        let choice = &options[index];
        let alnum = is_alphanumeric(choice);
        if alnum && prev_alnum {
            out.push(' ');
        }
        out.push_str(choice);
        prev_alnum = alnum;
    }
    out
}

/// Every spelling of `text` obtained by replacing each misspelled word with
/// one of the checker's suggestions.
///
/// The first word varies slowest. At most [`MAX_SPELLING_COMBINATIONS`]
/// results are produced.
pub fn words_with_spelling_suggestions(text: &str, checker: &dyn SpellChecker) -> Vec<String> {
    let choices: Vec<Vec<String>> = tokens(text)
        .into_iter()
        .map(|token| {
            if is_alphanumeric(token) && checker.has_problem(token) {
                let suggestions = checker.suggestions(token);
                if !suggestions.is_empty() {
                    return suggestions;
                }
            }
            vec![token.to_string()]
        })
        .collect();

    if choices.is_empty() {
        return vec![];
    }

    let total = choices
        .iter()
        .fold(1usize, |acc, options| acc.saturating_mul(options.len()));
    if total > MAX_SPELLING_COMBINATIONS {
        log::warn!(
            "spelling: {} combinations for {:?}, keeping the first {}",
            total,
            text,
            MAX_SPELLING_COMBINATIONS
        );
    }

    let mut counters = vec![0usize; choices.len()];
    let mut results = Vec::with_capacity(total.min(MAX_SPELLING_COMBINATIONS));
    loop {
        results.push(join_choice(&choices, &counters));
        if results.len() >= MAX_SPELLING_COMBINATIONS {
            return results;
        }

        // odometer, last position fastest
        let mut i = choices.len();
        loop {
            if i == 0 {
                return results;
            }
            i -= 1;
            counters[i] += 1;
            if counters[i] < choices[i].len() {
                break;
            }
            counters[i] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct Dictionary(HashMap<&'static str, Vec<&'static str>>);

    impl SpellChecker for Dictionary {
        fn has_problem(&self, word: &str) -> bool {
            self.0.contains_key(word)
        }

        fn suggestions(&self, word: &str) -> Vec<String> {
            self.0
                .get(word)
                .map(|s| s.iter().map(|w| w.to_string()).collect())
                .unwrap_or_default()
        }
    }

    fn dictionary() -> Dictionary {
        Dictionary(HashMap::from([
            ("teh", vec!["the", "ten"]),
            ("pgae", vec!["page", "pga"]),
            ("nothing", vec![]),
        ]))
    }

    #[test]
    fn test_tokens_keep_punctuation_runs() {
        assert_eq!(tokens("my--page name"), vec!["my", "--", "page", "name"]);
        assert_eq!(tokens("  "), Vec::<&str>::new());
    }

    #[test]
    fn test_cross_product_of_suggestions() {
        let result = words_with_spelling_suggestions("teh pgae", &dictionary());
        assert_eq!(
            result,
            vec!["the page", "the pga", "ten page", "ten pga"]
        );
    }

    #[test]
    fn test_punctuation_is_glued_without_spaces() {
        let result = words_with_spelling_suggestions("my-teh", &dictionary());
        assert_eq!(result, vec!["my-the", "my-ten"]);
    }

    #[test]
    fn test_flagged_word_without_suggestions_keeps_spelling() {
        let result = words_with_spelling_suggestions("nothing here", &dictionary());
        assert_eq!(result, vec!["nothing here"]);
    }

    #[test]
    fn test_empty_text_has_no_suggestions() {
        assert!(words_with_spelling_suggestions("", &dictionary()).is_empty());
    }

    #[test]
    fn test_expansion_is_bounded() {
        let text = vec!["teh"; 9].join(" ");
        let result = words_with_spelling_suggestions(&text, &dictionary());

        assert_eq!(result.len(), MAX_SPELLING_COMBINATIONS);
        assert_eq!(result[0], vec!["the"; 9].join(" "));
    }
}
