use scribe_core::ContextWindow;

/// A deterministic prompt builder for sentence continuations.
///
/// The wording here is a deployment concern; embedders that want different
/// instructions construct their own builder or swap the template wholesale.
/// The inputs and their caps are fixed by the context extractor.
#[derive(Clone, Debug)]
pub struct PromptBuilder {
    pub max_prompt_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl PromptBuilder {
    pub fn new(max_prompt_chars: usize) -> Self {
        Self { max_prompt_chars }
    }

    /// Build the instruction prompt for one continuation request.
    pub fn build(&self, window: &ContextWindow) -> String {
        // Keep the formatting stable for tests and provider caching.
        let mut prompt = String::new();
        prompt.push_str("<purpose>\n");
        prompt.push_str(
            "You are an expert writing assistant. Help the user complete the sentence in the <current_sentence> tag.\n",
        );
        prompt.push_str("</purpose>\n");
        prompt.push('\n');
        prompt.push_str("<instructions>\n");
        prompt.push_str("- Do not include any formatting or quotes in your response.\n");
        prompt.push_str("- Respond with at most ONE sentence.\n");
        prompt.push_str(
            "- If the cursor is in the middle of an uncompleted word, complete the word.\n",
        );
        prompt.push_str("- Keep your response concise; do not include any additional information.\n");
        prompt.push_str(
            "- If the <current_sentence> tag is empty, the user has not typed anything yet; predict the next few words to help them get started.\n",
        );
        prompt.push_str(
            "- Make sure your response is coherent with the <previous_context> and <following_context>.\n",
        );
        prompt.push_str("- Never repeat a sentence that is in the <previous_context>.\n");
        prompt.push_str("</instructions>\n");
        prompt.push('\n');
        prompt.push_str("<content>\n");
        push_tag(&mut prompt, "previous_context", &window.previous_context);
        push_tag(&mut prompt, "following_context", &window.following_context);
        push_tag(&mut prompt, "current_sentence", &window.current_sentence);
        prompt.push_str("</content>\n");
        prompt.push('\n');
        prompt.push_str("Continuation:");

        // Cap size defensively to avoid accidentally sending huge prompts.
        if self.max_prompt_chars > 0 && prompt.len() > self.max_prompt_chars {
            let mut end = self.max_prompt_chars;
            while !prompt.is_char_boundary(end) {
                end -= 1;
            }
            prompt.truncate(end);
        }

        prompt
    }
}

fn push_tag(prompt: &mut String, tag: &str, content: &str) {
    prompt.push('<');
    prompt.push_str(tag);
    prompt.push_str(">\n");
    prompt.push_str(content);
    prompt.push('\n');
    prompt.push_str("</");
    prompt.push_str(tag);
    prompt.push_str(">\n");
}
