//! Prompt templates for the AI checks.
//!
//! Every request is a shared system prompt plus one check-specific user
//! prompt. Templates use `{name}` placeholders filled by [`render`].
//!
//! Checks that can come back clean tell the model what to say in that case.
//! The concern heuristic in [`crate::analyzers`] relies on those phrasings.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER_PATTERN: Regex = Regex::new(r"\{([a-z_]+)\}").unwrap();
}

/// System prompt shared by every check.
pub const SYSTEM_PROMPT: &str = r#"
You are a review assistant for authors publishing through Kindle Direct Publishing (KDP).

You check book metadata and manuscript excerpts against KDP's content and
metadata guidelines before the author submits.

## Ground Rules
1. Judge only the text you are given; say so when an excerpt is too small to be sure
2. Quote the exact words you are commenting on
3. Keep feedback short and actionable, as bullet points
4. Do not invent KDP rules; when unsure, recommend the author check the guideline
5. When you find nothing to flag, say so plainly using the wording you are asked to use
"#;

/// Metadata auto-fill. Expects a single JSON object back.
pub const AUTOFILL_PROMPT: &str = r#"
Read the opening of this manuscript (about {chars} characters) and infer its KDP metadata.

Answer with ONE JSON object and nothing else, using exactly these keys.
Use "" or [] when something cannot be determined with confidence.

- "title_suggestion": the book title (title page text, or a line like "Title: ...")
- "author_suggestion": the primary author (look for "By ..." near the title)
- "language_suggestion": the main language of the text, e.g. "English"
- "description_draft_suggestion": a 2-4 sentence (75-100 word) draft description of the premise
- "keyword_suggestions": 3-5 short keyword phrases (2-3 words) on setting, characters, themes or tone
- "category_suggestions": 1-2 KDP-style categories, e.g. "Romance > Contemporary"
- "series_title_suggestion": the series name, only if the text clearly says it belongs to one
- "series_number_suggestion": the number in that series, digits only
- "is_translation_hint": true only with cues like "translated by" or "original title"
- "original_author_hint": the original author, if this is a translation
- "translator_hint": the translator, if named

Prefer what appears early: title page, copyright page, first paragraphs.

Manuscript:
---
{text}
---
"#;

/// Description quality against KDP description practices.
pub const DESCRIPTION_QUALITY_PROMPT: &str = r#"
Review this KDP book description.

A good description is simple (premise or theme, about 150 words of prose),
compelling (a strong opening line, obvious genre) and professional (no
spelling or grammar errors). KDP supports only these HTML tags: <br>, <p>,
<b>, <em>, <i>, <u>, <h4>, <h5>, <h6>, <ol>/<ul> with <li>. Headings <h1>-<h3>
are not allowed. The limit is 4000 characters.

Description:
---
{description}
---

Give short feedback under these headings: Overall Impression, Opening,
Genre Cues, Professionalism (list corrections), HTML Usage (every tag used;
flag any unsupported tag or broken markup), Suggestions.
"#;

/// Keyword ideas.
pub const KEYWORD_PROMPT: &str = r#"
Suggest KDP search keywords for this book.

Title: "{title}"
Description (start): "{description}"
Current keywords: "{keywords}"

Suggest 5-7 keyword phrases of 2-3 words that describe setting, characters,
plot or tone the way a reader would search. Do not repeat words already in
the title or current keywords. Avoid terms KDP disallows in keywords (other
authors' names, "free", "bestseller", time-limited promotions, Amazon program
names). Give a bulleted list with one line on why each fits. If the current
keywords are already strong, say so.
"#;

/// Category ideas.
pub const CATEGORY_PROMPT: &str = r#"
Suggest KDP categories for this book.

Title: "{title}"
Description (start): "{description}"
Current categories: "{categories}"

1. Suggest 1-3 specific KDP-style categories, e.g. "Fiction > Science Fiction > Space Opera".
2. Explain each choice in one line.
3. If the current categories fit, confirm them. If there is a mismatch, say
   which one and offer alternatives.
"#;

/// Does the description promise something the manuscript does not deliver?
pub const MISLEADING_DESCRIPTION_PROMPT: &str = r#"
Compare this book description with the opening of the manuscript.

Description:
---
{description}
---

Manuscript (first {chars} characters):
---
{text}
---

Does the description misrepresent the content, genre or scope of the book?
If it does, describe the mismatch and recommend review. If not, answer
"No obvious mismatch between the description and the manuscript excerpt."
"#;

/// Typos, placeholders and accessibility over the opening of the manuscript.
pub const SNIPPET_TYPOS_PROMPT: &str = r#"
Review the first {chars} characters of this manuscript for:

1. Typos and grammar: list up to 7 errors as "original -> correction".
2. Placeholder text: leftover template text such as "Lorem ipsum", "[INSERT]",
   "TK", "Chapter X" or "Author Name".
3. Accessibility: images without descriptions, lists or tables that will not
   reflow, or other elements that need attention, with a suggested fix.

For any category with nothing to report, write "No potential issues noted in this excerpt."

Manuscript:
---
{text}
---
"#;

/// Links and duplicated passages.
pub const SNIPPET_LINKS_PROMPT: &str = r#"
Review the first {chars} characters of this manuscript.
{urls}
1. Links: if URLs were detected, remind the author that links must work and
   be relevant, that KDP prohibits some link targets (other stores, pages that
   collect customer data, adult content), that link text should be
   descriptive, and that every link must be tested. If none were detected, say so.
2. Duplicated text: look for long passages repeated word for word, which
   usually come from copy-paste mistakes. Quote up to 3 examples of
   unintentional duplication. If there are none, say so.

Manuscript:
---
{text}
---
"#;

/// Disappointing content: short, poorly translated, advertising, bonus placement.
pub const DISAPPOINTING_CONTENT_PROMPT: &str = r#"
Review this book for KDP "disappointing content" problems.

Description (start): "{description}"
Manuscript (first {chars} characters): "{text}"
Is a translation: {is_translation}

1. Too short: from this excerpt and description only, does the book seem
   much shorter than the description promises? If so, ask the author to
   check the full length.
2. Translation quality: if this is a translation, does the text read as
   poorly translated (awkward phrasing, unnatural grammar)? Quote an example.
3. Solicitation: is the text mostly advertising or soliciting rather than content?
4. Bonus content: remind the author that previews and other bonus material
   must come after the main content.

For any point with nothing to report, write "No potential issues noted for this point."
"#;

/// Offensive content screen.
pub const OFFENSIVE_CONTENT_PROMPT: &str = r#"
Screen this excerpt for content KDP does not allow: hate speech, sexual
content involving minors, pornography, content glorifying rape or
pedophilia, or terrorism.

If you find any, quote the passage, name the category and explain briefly
why it is problematic. If not, answer "No potential issues: no offensive content found in this excerpt."

Excerpt:
---
{text}
---
"#;

/// Likelihood that sample sentences are freely available online.
pub const FREELY_AVAILABLE_PROMPT: &str = r#"
Sentences from the manuscript:
{sentences}
For each sentence, rate how likely it is to appear verbatim on the public
web (Low, Medium or High) with a one-line reason, formatted as
"* Sentence N: [Likelihood] - [Reason]".

End with: "KDP does not accept content that is freely available on the web
unless you own the rights, or it is public domain and clearly differentiated."
"#;

/// Unauthorized companion works (summaries, study guides).
pub const INFRINGING_COMPANION_PROMPT: &str = r#"
Title: "{title}"
Manuscript (start): "{text}"

Does this look like an unauthorized summary, study guide, analysis,
workbook or other companion to a known copyrighted work (for example
"Summary of [Famous Book]")?

If there are strong signs, explain why it might be seen that way and
recommend review: companion content usually needs written permission from
the rights holder. If not, answer "This excerpt does not immediately raise
concerns as an infringing companion work."
"#;

/// Public-domain differentiation statement.
pub const PUBLIC_DOMAIN_PROMPT: &str = r#"
The author says this book is public domain and gives this differentiation statement:

"{statement}"

KDP requires public-domain books to be substantially differentiated when a
free edition exists: original annotations or analysis, a new translation,
original illustrations, or a curated collection with original commentary.
Formatting or cover changes alone are not enough.

Does the statement describe substantial differentiation, or is it unclear
or only minor repackaging? Give a short assessment and 1-2 ways to
strengthen it if it is weak. If it is strong, say so.
"#;

/// Language detection. The answer is a bare language name.
pub const LANGUAGE_PROMPT: &str = r#"
What is the main language of this excerpt? Answer with the language name
only, for example "English". If several languages appear, name the dominant one.

Excerpt:
---
{text}
---
"#;

/// Fill `{name}` placeholders in a template.
///
/// Substitution is a single pass, so braces inside values are never
/// expanded. Unknown placeholders are left as they are; the result is trimmed.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(template.trim(), |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// The first `max_chars` characters of `text`.
pub fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_fills_placeholders() {
        let prompt = render(KEYWORD_PROMPT, &[
            ("title", "The Lighthouse Keeper"),
            ("description", "A storm."),
            ("keywords", "island"),
        ]);
        assert!(prompt.contains("Title: \"The Lighthouse Keeper\""));
        assert!(prompt.contains("Current keywords: \"island\""));
        assert!(!prompt.contains("{title}"));
        assert!(!prompt.starts_with('\n'));
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{a} and {b}", &[("a", "x")]), "x and {b}");
    }

    #[test]
    fn test_render_does_not_expand_values() {
        assert_eq!(render("{a}|{b}", &[("a", "{b}"), ("b", "y")]), "{b}|y");
    }

    #[test]
    fn test_clip_counts_chars() {
        assert_eq!(clip("ünïcode", 3), "ünï");
        assert_eq!(clip("short", 100), "short");
    }

    #[test]
    fn test_every_template_has_text_slot_where_needed() {
        for template in [
            AUTOFILL_PROMPT,
            MISLEADING_DESCRIPTION_PROMPT,
            SNIPPET_TYPOS_PROMPT,
            SNIPPET_LINKS_PROMPT,
            DISAPPOINTING_CONTENT_PROMPT,
            OFFENSIVE_CONTENT_PROMPT,
            INFRINGING_COMPANION_PROMPT,
            LANGUAGE_PROMPT,
        ] {
            assert!(template.contains("{text}"));
        }
    }
}
