//! Acceptance planning: the exact text to splice at the caret when the user
//! takes the suggestion.

use scribe_core::collapse_whitespace;

/// The text to insert at the caret, and whether a separating space must be
/// inserted in front of it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InsertionPlan {
    pub text: String,
    pub space_before: bool,
}

impl InsertionPlan {
    /// The full string to splice, spacing included.
    pub fn splice_text(&self) -> String {
        if self.space_before {
            format!(" {}", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Plan the insertion of `prediction` after `typed_tail` (the text between
/// the sentence start and the caret).
///
/// When the user has partially typed the word the model also produced, the
/// shared prefix is stripped from the prediction so the word is not
/// duplicated. Otherwise spacing follows from whether the typed text ends
/// with whitespace and whether the prediction starts with it.
pub fn plan_insertion(typed_tail: &str, prediction: &str) -> InsertionPlan {
    let typed = collapse_whitespace(typed_tail);
    let predicted = collapse_whitespace(prediction);

    if predicted.trim().is_empty() {
        return InsertionPlan {
            text: String::new(),
            space_before: false,
        };
    }

    let last_typed = typed.split_whitespace().next_back().unwrap_or("");
    let first_predicted = predicted.split_whitespace().next().unwrap_or("");

    if !last_typed.is_empty()
        && last_typed.len() <= first_predicted.len()
        && first_predicted.is_char_boundary(last_typed.len())
        && first_predicted[..last_typed.len()].eq_ignore_ascii_case(last_typed)
    {
        let trimmed = predicted.trim_start();
        return InsertionPlan {
            text: trimmed[last_typed.len()..].to_string(),
            space_before: false,
        };
    }

    let typed_ends_with_space = typed.ends_with(' ');
    let predicted_starts_with_space = predicted.starts_with(' ');

    match (typed_ends_with_space, predicted_starts_with_space) {
        (true, true) => InsertionPlan {
            text: predicted.trim_start_matches(' ').to_string(),
            space_before: false,
        },
        (false, false) => InsertionPlan {
            text: predicted,
            space_before: true,
        },
        _ => InsertionPlan {
            text: predicted,
            space_before: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_word_prefix_is_stripped() {
        let plan = plan_insertion("Hel", "Hello there");
        assert_eq!(plan.text, "lo there");
        assert!(!plan.space_before);
        assert_eq!(plan.splice_text(), "lo there");
    }

    #[test]
    fn partial_word_check_is_case_insensitive() {
        let plan = plan_insertion("They said hel", "Hello there");
        assert_eq!(plan.text, "lo there");
    }

    #[test]
    fn repeated_word_keeps_its_space() {
        let plan = plan_insertion("I went to the", "the store");
        assert_eq!(plan.text, " store");
        assert!(!plan.space_before);
        assert_eq!(plan.splice_text(), " store");
    }

    #[test]
    fn space_is_added_between_words() {
        let plan = plan_insertion("The cat sat on the", "mat and looked around.");
        assert_eq!(plan.text, "mat and looked around.");
        assert!(plan.space_before);
        assert_eq!(plan.splice_text(), " mat and looked around.");
    }

    #[test]
    fn double_space_is_avoided() {
        let plan = plan_insertion("Hello ", " world");
        assert_eq!(plan.text, "world");
        assert!(!plan.space_before);
    }

    #[test]
    fn single_existing_space_is_kept() {
        let typed_side = plan_insertion("Hello ", "world");
        assert_eq!(typed_side.text, "world");
        assert!(!typed_side.space_before);

        let predicted_side = plan_insertion("Hello", " world");
        assert_eq!(predicted_side.text, " world");
        assert!(!predicted_side.space_before);
    }

    #[test]
    fn empty_typed_tail_skips_partial_word_rule() {
        let plan = plan_insertion("", "mat");
        assert_eq!(plan.text, "mat");
        assert!(plan.space_before);
    }

    #[test]
    fn newlines_in_typed_tail_count_as_spaces() {
        let plan = plan_insertion("Hello\n", "world");
        assert_eq!(plan.text, "world");
        assert!(!plan.space_before);
    }

    #[test]
    fn empty_prediction_yields_empty_plan() {
        let plan = plan_insertion("Hello", "   ");
        assert_eq!(plan.text, "");
        assert!(!plan.space_before);
    }
}
