//! Note collection from qualitative sections of an offer page.
//!
//! Lines under a known section heading (guarantees, prepayment penalty, ...)
//! are kept as free-text notes, since no structured field captures them.

use tracing::debug;

use super::patterns::{GREEN_DISCOUNT, GREEN_MENTION};

/// Lower-cased prefixes that open a note section.
pub const SECTION_HEADINGS: &[&str] = &[
    "destinatari",
    "finalità",
    "garanzi",
    "penale estinzione",
    "note",
    "assicurazion",
    "spese periodiche",
    "calcolo tasso",
];

/// Marker in front of a section heading fragment.
pub const SECTION_MARKER: &str = "📌";

/// Marker in front of the green discount fragment.
pub const GREEN_MARKER: &str = "🌿";

/// Single-pass state over the offer lines.
#[derive(Debug, Default)]
struct NoteAccumulator<'a> {
    section: Option<&'a str>,
    fragments: Vec<String>,
}

impl<'a> NoteAccumulator<'a> {
    fn push_line(mut self, line: &'a str, min_chars: usize) -> Self {
        let lower = line.to_lowercase();

        if SECTION_HEADINGS.iter().any(|h| lower.starts_with(h)) {
            debug!("Opening note section: {}", line);
            self.section = Some(line);
            self.fragments.push(format!("\n{} {}", SECTION_MARKER, line));
        } else if self.section.is_some() && line.chars().count() > min_chars {
            self.fragments.push(line.to_string());
        }

        self
    }
}

/// Collect note fragments from the offer lines, within `budget` characters.
pub fn collect_notes(text: &str, lines: &[&str], min_chars: usize, budget: usize) -> Vec<String> {
    let mut fragments = lines
        .iter()
        .fold(NoteAccumulator::default(), |acc, line| {
            acc.push_line(line, min_chars)
        })
        .fragments;

    if let Some(discount) = green_discount(text) {
        fragments.push(format!("\n{} Green discount: {}", GREEN_MARKER, discount));
    }

    truncate_notes(fragments, budget)
}

/// Find a green mortgage discount (e.g. "-0,20% per immobili in classe A").
pub fn green_discount(text: &str) -> Option<String> {
    if !GREEN_MENTION.is_match(text) {
        return None;
    }

    GREEN_DISCOUNT
        .captures(text)
        .map(|caps| caps[1].to_string())
}

/// Keep whole fragments while their newline-joined length stays within `budget`.
pub fn truncate_notes(fragments: Vec<String>, budget: usize) -> Vec<String> {
    let joined_len = fragments.iter().map(|f| f.chars().count()).sum::<usize>()
        + fragments.len().saturating_sub(1);
    if joined_len <= budget {
        return fragments;
    }

    debug!("Truncating notes from {} to {} characters", joined_len, budget);

    let mut total = 0;
    let mut kept = Vec::new();
    for fragment in fragments {
        let len = fragment.chars().count();
        if total + len + 1 > budget {
            break;
        }
        total += len + 1;
        kept.push(fragment);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &str) -> Vec<&str> {
        text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
    }

    #[test]
    fn test_sections_collect_following_lines() {
        let text = "Importo mutuo: € 100.000\n\
                    Garanzie\n\
                    Ipoteca di primo grado pari al 150%\n\
                    ok\n\
                    Penale estinzione anticipata\n\
                    Nessuna penale per estinzione anticipata";

        let notes = collect_notes(text, &lines(text), 10, 4500);

        assert_eq!(
            notes,
            vec![
                "\n📌 Garanzie".to_string(),
                "Ipoteca di primo grado pari al 150%".to_string(),
                "\n📌 Penale estinzione anticipata".to_string(),
                "Nessuna penale per estinzione anticipata".to_string(),
            ]
        );
    }

    #[test]
    fn test_lines_before_any_section_are_ignored() {
        let text = "Una riga abbastanza lunga ma senza sezione";
        assert!(collect_notes(text, &lines(text), 10, 4500).is_empty());
    }

    #[test]
    fn test_heading_is_case_insensitive() {
        let text = "FINALITÀ\nAcquisto prima casa e surroga";
        let notes = collect_notes(text, &lines(text), 10, 4500);

        assert_eq!(notes[0], "\n📌 FINALITÀ");
        assert_eq!(notes[1], "Acquisto prima casa e surroga");
    }

    #[test]
    fn test_green_discount() {
        let text = "Mutuo Green\nSconto -0,20% per immobili in classe energetica A";

        assert_eq!(green_discount(text), Some("-0,20%".to_string()));
        assert_eq!(
            collect_notes(text, &lines(text), 10, 4500),
            vec!["\n🌿 Green discount: -0,20%".to_string()]
        );
    }

    #[test]
    fn test_green_discount_needs_mention() {
        assert_eq!(green_discount("Sconto -0,20% per nuovi clienti"), None);
    }

    #[test]
    fn test_truncate_keeps_whole_lines() {
        let fragments: Vec<String> = (0..100)
            .map(|i| format!("{:03} {}", i, "x".repeat(96)))
            .collect();

        let kept = truncate_notes(fragments.clone(), 4500);

        assert!(kept.join("\n").chars().count() <= 4500);
        assert_eq!(kept.len(), 44);
        assert_eq!(kept, fragments[..44].to_vec());
    }

    #[test]
    fn test_truncate_within_budget_is_untouched() {
        let fragments = vec!["a".repeat(10), "b".repeat(10)];
        assert_eq!(truncate_notes(fragments.clone(), 21), fragments);
    }
}
