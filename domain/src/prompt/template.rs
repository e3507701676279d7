//! Prompt templates for each agent role in a round

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the clarifying-question agent
    pub fn question_system() -> &'static str {
        r#"# ROLE
You are a clarifier. Your only job is to ask the follow-up questions that will
let a later agent generate the best possible domain names.

# RULES
- Output valid JSON only.
- Keys must be "q1", "q2", ... in order.
- No markdown fences or prose.
- Ask between 2 and 10 questions: the fewest that fully clarify the brief.

# TOPICS YOU MAY COVER
- Brand or company match
- Desired TLDs
- Tone or vibe
- Length limits
- Keywords to include or avoid
- Real words vs. abstract coinages
- Examples the user likes that are already taken
- Legal or geographic constraints"#
    }

    /// User prompt for the initial questions
    pub fn initial_questions(brief: &str) -> String {
        format!("USER'S INITIAL BRIEF: \"{}\"", brief)
    }

    /// System prompt for the prompt synthesizer
    pub fn synthesizer_system() -> &'static str {
        r#"You are a prompt engineer. Merge the user's brief and their answers to a set of
clarifying questions into one cohesive narrative brief. That brief will be handed
to a creative model that generates domain names. Turn the raw Q&A into a
descriptive paragraph and infer the user's core wishes from the answers.
Use only the information provided; do not invent new details."#
    }

    /// User prompt for the synthesizer
    pub fn synthesis_prompt(brief: &str, qa_text: &str) -> String {
        format!(
            "# CORE BRIEF:\n{}\n\n# USER'S ANSWERS:\n{}\n\nSynthesize this into a paragraph.",
            brief, qa_text
        )
    }

    /// Render answered questions as `Q: ..\nA: ..` lines
    pub fn qa_text(pairs: &[(String, String)]) -> String {
        pairs
            .iter()
            .map(|(q, a)| format!("Q: {}\nA: {}", q, a))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Brief used when the synthesizer call fails
    pub fn synthesis_fallback(brief: &str, qa_text: &str) -> String {
        format!("User Brief: {}\n\n{}", brief, qa_text)
    }

    /// System prompt for a creator asked for `count` names
    pub fn creator_system(count: usize) -> String {
        format!(
            r#"You are a creative domain name generator. Based on the user's brief, provide exactly {} domain name ideas.
Your output must be a single valid JSON object with one key holding an array of strings, like {{"domains": ["idea1.com", "idea2.net"]}}.
Do not add any other text or explanation."#,
            count
        )
    }

    /// Creator user prompt: the generation prompt plus the names to avoid
    pub fn creator_prompt(prompt: &str, avoid: &[&str]) -> String {
        if avoid.is_empty() {
            return prompt.to_string();
        }
        format!(
            "{}\n\nDo not suggest any of these, they were already proposed:\n{}",
            prompt,
            avoid.join(", ")
        )
    }

    /// Instructions for the web-search availability checker
    pub fn checker_system() -> &'static str {
        r#"You are a domain-status checker. For the single domain listed, use web search
once if needed, decide whether it is registered, and return a JSON object whose key
is the domain and whose value is either OK (registered) or NOT (available).
Return only the JSON, nothing else."#
    }

    /// Checker input for one name
    pub fn checker_prompt(name: &str) -> String {
        format!("Domains: {}", name)
    }

    /// System prompt for the refinement-question agent
    pub fn refinement_questions_system() -> &'static str {
        r#"# ROLE
You are a domain name strategy consultant. The user has just reviewed a batch of
suggestions. Ask exactly two short follow-up questions that would most improve
the next batch.

# RULES
- Output valid JSON only, with keys "q1" and "q2".
- No markdown fences or prose."#
    }

    /// User prompt for the refinement questions
    pub fn refinement_questions(refined_brief: &str, feedback_summary: &str) -> String {
        format!(
            "# PREVIOUS FEEDBACK SUMMARY\n{}\n\n# NEW REFINED GOAL\n\"{}\"\n\nBased on all the above, ask your two follow-up questions now.",
            feedback_summary, refined_brief
        )
    }

    /// System prompt for the brief rewrite (directionist)
    pub fn directionist_system() -> &'static str {
        r#"You are a prompt optimizer for a domain name generator. Rewrite the brief so
the next batch leans toward what the user liked, steers away from what they
disliked, and avoids the patterns of names that were already taken.
Return only the new brief as plain text."#
    }

    /// User prompt for the brief rewrite
    pub fn directionist_prompt(current_brief: &str, feedback_summary: &str) -> String {
        format!(
            "ORIGINAL BRIEF:\n{}\n\nUSER FEEDBACK ANALYSIS:\n{}\n\nGenerate the new, refined brief now.",
            current_brief, feedback_summary
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_system_embeds_count() {
        let prompt = PromptTemplate::creator_system(3);
        assert!(prompt.contains("exactly 3 domain"));
        assert!(prompt.contains(r#"{"domains": ["#));
    }

    #[test]
    fn test_creator_prompt_lists_avoided_names() {
        assert_eq!(PromptTemplate::creator_prompt("p", &[]), "p");
        let prompt = PromptTemplate::creator_prompt("p", &["a.com", "b.io"]);
        assert!(prompt.ends_with("a.com, b.io"));
    }

    #[test]
    fn test_qa_text_and_fallback() {
        let pairs = vec![
            ("Tone?".to_string(), "playful".to_string()),
            ("TLD?".to_string(), ".io".to_string()),
        ];
        let qa = PromptTemplate::qa_text(&pairs);
        assert_eq!(qa, "Q: Tone?\nA: playful\nQ: TLD?\nA: .io");
        assert_eq!(
            PromptTemplate::synthesis_fallback("bakery", &qa),
            format!("User Brief: bakery\n\n{}", qa)
        );
    }

    #[test]
    fn test_checker_prompt() {
        assert_eq!(PromptTemplate::checker_prompt("a.com"), "Domains: a.com");
    }
}
