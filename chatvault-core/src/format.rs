use crate::types::ConversationTurn;

/// Title line of every archived document.
pub const DOCUMENT_TITLE: &str = "# Archived Conversation - ChatGPT";

/// Render an ordered turn sequence as a Markdown document.
///
/// Deterministic and total: an empty sequence still yields the title and
/// separator. Each turn becomes a speaker heading followed by a block
/// quote; every line of the turn's text is individually prefixed so
/// multi-line turns stay inside one quote. Empty turns are the caller's
/// problem; nothing is filtered here.
pub fn render(turns: &[ConversationTurn]) -> String {
    let mut out = String::new();
    out.push_str(DOCUMENT_TITLE);
    out.push_str("\n\n---\n\n");

    for turn in turns {
        out.push_str("## ");
        out.push_str(&turn.speaker.to_string());
        out.push_str(":\n");
        let content = sanitize(&turn.text);
        out.push_str(&quote_block(content.trim()));
        out.push_str("\n\n");
    }

    out
}

/// Prefix every line with `> `, keeping blank interior lines inside the
/// quote.
fn quote_block(text: &str) -> String {
    let mut quoted = String::new();
    let mut lines = text.lines();
    match lines.next() {
        Some(first) => {
            quoted.push_str("> ");
            quoted.push_str(first);
            for line in lines {
                quoted.push_str("\n> ");
                quoted.push_str(line);
            }
        }
        None => quoted.push_str("> "),
    }
    quoted
}

/// Drop control characters that would corrupt the quote structure.
/// Newlines and tabs survive; carriage returns and the rest do not.
fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Speaker;

    fn turn(speaker: Speaker, text: &str) -> ConversationTurn {
        ConversationTurn {
            speaker,
            text: text.to_string(),
        }
    }

    #[test]
    fn render_is_deterministic() {
        let turns = vec![
            turn(Speaker::User, "Hi"),
            turn(Speaker::Assistant, "Hello there"),
        ];
        assert_eq!(render(&turns), render(&turns));
    }

    #[test]
    fn empty_sequence_yields_header_only() {
        let doc = render(&[]);
        assert_eq!(doc, format!("{DOCUMENT_TITLE}\n\n---\n\n"));
        assert!(!doc.contains("##"));
    }

    #[test]
    fn multiline_text_stays_inside_one_quote() {
        let doc = render(&[turn(Speaker::Assistant, "a\nb")]);
        assert!(doc.contains("> a\n> b"));
    }

    #[test]
    fn blank_interior_lines_stay_quoted() {
        let doc = render(&[turn(Speaker::Assistant, "a\n\nb")]);
        assert!(doc.contains("> a\n> \n> b"));
    }

    #[test]
    fn control_characters_are_stripped() {
        let doc = render(&[turn(Speaker::User, "be\u{0}fore\rafter")]);
        assert!(doc.contains("> beforeafter"));
    }

    #[test]
    fn three_turns_render_in_order() {
        let doc = render(&[
            turn(Speaker::User, "Hi"),
            turn(Speaker::Assistant, "Hello"),
            turn(Speaker::User, "Bye"),
        ]);
        let hi = doc.find("## User:\n> Hi").expect("first turn");
        let hello = doc.find("## Assistant:\n> Hello").expect("second turn");
        let bye = doc.rfind("## User:\n> Bye").expect("third turn");
        assert!(hi < hello && hello < bye);
        assert_eq!(doc.matches("## ").count(), 3);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let doc = render(&[turn(Speaker::User, "  hi  \n")]);
        assert!(doc.contains("## User:\n> hi\n\n"));
    }
}
